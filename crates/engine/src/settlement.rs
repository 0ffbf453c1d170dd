//! The settlement planner.
//!
//! Reduces a set of net balances into an ordered list of suggested payments
//! that, if all executed, zero out every balance. The greedy matching is not
//! guaranteed to find the theoretical minimum number of payments (that
//! problem is NP-hard), but it is deterministic, terminates, and never emits
//! more than `creditors + debtors - 1` entries.

use uuid::Uuid;

use crate::MoneyCents;

/// A member's aggregate position across all unpaid debts in a group.
///
/// Positive = net creditor, negative = net debtor, zero = settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetBalance {
    pub user_id: Uuid,
    pub username: String,
    pub balance: MoneyCents,
}

/// One suggested payment of a settlement plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedPayment {
    pub from_id: Uuid,
    pub from_username: String,
    pub to_id: Uuid,
    pub to_username: String,
    pub amount: MoneyCents,
}

/// Produces a settlement plan from net balances.
///
/// Members with a zero balance are omitted entirely. Creditors are matched
/// against debtors largest-first; ties break on ascending user id, so the
/// plan is stable across calls for the same balance snapshot.
pub fn plan(balances: &[NetBalance]) -> Vec<PlannedPayment> {
    let mut creditors: Vec<(&NetBalance, MoneyCents)> = Vec::new();
    let mut debtors: Vec<(&NetBalance, MoneyCents)> = Vec::new();

    for entry in balances {
        if entry.balance.is_positive() {
            creditors.push((entry, entry.balance));
        } else if entry.balance.is_negative() {
            debtors.push((entry, entry.balance));
        }
    }

    creditors.sort_by(|(a, bal_a), (b, bal_b)| {
        bal_b.cmp(bal_a).then_with(|| a.user_id.cmp(&b.user_id))
    });
    debtors.sort_by(|(a, bal_a), (b, bal_b)| {
        bal_a.cmp(bal_b).then_with(|| a.user_id.cmp(&b.user_id))
    });

    let mut payments = Vec::new();
    let mut i = 0; // debtor index
    let mut j = 0; // creditor index

    while i < debtors.len() && j < creditors.len() {
        let (debtor, debtor_balance) = &mut debtors[i];
        let (creditor, creditor_balance) = &mut creditors[j];
        let payment = (*creditor_balance).min(debtor_balance.abs());

        if payment.is_positive() {
            payments.push(PlannedPayment {
                from_id: debtor.user_id,
                from_username: debtor.username.clone(),
                to_id: creditor.user_id,
                to_username: creditor.username.clone(),
                amount: payment,
            });
            *debtor_balance += payment;
            *creditor_balance -= payment;
        }

        if debtors[i].1.is_zero() {
            i += 1;
        }
        if creditors[j].1.is_zero() {
            j += 1;
        }
    }

    payments
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn balance(user_id: Uuid, name: &str, cents: i64) -> NetBalance {
        NetBalance {
            user_id,
            username: name.to_string(),
            balance: MoneyCents::new(cents),
        }
    }

    fn apply(balances: &[NetBalance], payments: &[PlannedPayment]) -> HashMap<Uuid, i64> {
        let mut remaining: HashMap<Uuid, i64> = balances
            .iter()
            .map(|b| (b.user_id, b.balance.cents()))
            .collect();
        for payment in payments {
            *remaining.get_mut(&payment.from_id).unwrap() += payment.amount.cents();
            *remaining.get_mut(&payment.to_id).unwrap() -= payment.amount.cents();
        }
        remaining
    }

    #[test]
    fn settled_group_yields_empty_plan() {
        let balances = vec![
            balance(Uuid::new_v4(), "p", 0),
            balance(Uuid::new_v4(), "q", 0),
        ];
        assert!(plan(&balances).is_empty());
    }

    #[test]
    fn two_creditors_one_debtor() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let balances = vec![
            balance(a, "a", -15050),
            balance(b, "b", 7525),
            balance(c, "c", 7525),
        ];

        let payments = plan(&balances);
        assert_eq!(payments.len(), 2);
        assert_eq!(
            payments.iter().map(|p| p.amount.cents()).sum::<i64>(),
            15050
        );
        assert!(payments.iter().all(|p| p.from_id == a));

        let remaining = apply(&balances, &payments);
        assert!(remaining.values().all(|&cents| cents == 0));
    }

    #[test]
    fn plan_zeroes_out_arbitrary_balances() {
        let users: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let cents = [-4200, 1300, -800, 2900, 800];
        let balances: Vec<NetBalance> = users
            .iter()
            .zip(cents)
            .map(|(id, c)| balance(*id, "m", c))
            .collect();

        let payments = plan(&balances);
        let remaining = apply(&balances, &payments);
        assert!(remaining.values().all(|&c| c == 0));
    }

    #[test]
    fn plan_length_is_bounded() {
        let users: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
        let cents = [-1000, -2000, -3000, 1500, 1500, 3000];
        let balances: Vec<NetBalance> = users
            .iter()
            .zip(cents)
            .map(|(id, c)| balance(*id, "m", c))
            .collect();

        let creditors = cents.iter().filter(|&&c| c > 0).count();
        let debtors = cents.iter().filter(|&&c| c < 0).count();
        let payments = plan(&balances);
        assert!(payments.len() <= creditors + debtors - 1);
    }

    #[test]
    fn plan_is_deterministic_for_equal_balances() {
        let mut users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        users.sort_unstable();
        let balances = vec![
            balance(users[0], "a", 500),
            balance(users[1], "b", 500),
            balance(users[2], "c", -500),
            balance(users[3], "d", -500),
        ];

        let first = plan(&balances);
        let second = plan(&balances);
        assert_eq!(first, second);
        // Equal balances break ties by ascending user id.
        assert_eq!(first[0].from_id, users[2]);
        assert_eq!(first[0].to_id, users[0]);
    }

    #[test]
    fn zero_balance_members_are_omitted() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let balances = vec![
            balance(a, "a", -1000),
            balance(b, "b", 0),
            balance(c, "c", 1000),
        ];

        let payments = plan(&balances);
        assert_eq!(payments.len(), 1);
        assert!(payments.iter().all(|p| p.from_id != b && p.to_id != b));
    }
}
