//! Share computation for expense splitting.
//!
//! Equal splits use a largest-remainder rule over integer cents: each member
//! gets `total / n` cents and the first `total % n` members in ascending
//! member-id order get one extra cent. The shares always sum to the total
//! exactly, so debt conservation holds by construction.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Custom splits may deviate from the total by at most one cent
/// (0.01 currency units).
pub const SPLIT_TOLERANCE_CENTS: i64 = 1;

/// Computes the equal share of every member.
///
/// The returned list is ordered by ascending member id; the remainder cents
/// go to the first `total % n` entries. Callers must pass a non-empty member
/// list and a positive total.
pub fn equal_shares(total: MoneyCents, member_ids: &[Uuid]) -> Vec<(Uuid, MoneyCents)> {
    let mut ids: Vec<Uuid> = member_ids.to_vec();
    ids.sort_unstable();

    let n = ids.len() as i64;
    let base = total.cents() / n;
    let remainder = total.cents() % n;

    ids.into_iter()
        .enumerate()
        .map(|(idx, id)| {
            let extra = i64::from((idx as i64) < remainder);
            (id, MoneyCents::new(base + extra))
        })
        .collect()
}

/// Validates custom splits and resolves them into per-member shares.
///
/// Rules:
/// - every split key must be a current member of the group
/// - every share must be > 0
/// - the shares must sum to the total within [`SPLIT_TOLERANCE_CENTS`]
///
/// Members not present in `splits` carry an implicit share of 0 and are
/// omitted from the result.
pub fn resolve_custom_shares(
    total: MoneyCents,
    splits: &HashMap<Uuid, MoneyCents>,
    member_ids: &[Uuid],
) -> ResultEngine<Vec<(Uuid, MoneyCents)>> {
    if splits.is_empty() {
        return Err(EngineError::SplitMismatch(
            "splits must not be empty".to_string(),
        ));
    }

    let mut sum = MoneyCents::ZERO;
    for (member_id, share) in splits {
        if !member_ids.contains(member_id) {
            return Err(EngineError::SplitMismatch(format!(
                "split for non-member {member_id}"
            )));
        }
        if !share.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "split share for {member_id} must be > 0"
            )));
        }
        sum = sum
            .checked_add(*share)
            .ok_or_else(|| EngineError::InvalidAmount("split sum overflow".to_string()))?;
    }

    if (sum - total).abs().cents() > SPLIT_TOLERANCE_CENTS {
        return Err(EngineError::SplitMismatch(format!(
            "splits sum to {sum}, expected {total}"
        )));
    }

    let mut shares: Vec<(Uuid, MoneyCents)> =
        splits.iter().map(|(id, share)| (*id, *share)).collect();
    shares.sort_unstable_by_key(|(id, _)| *id);
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn equal_split_divides_exactly() {
        let members = ids(3);
        let shares = equal_shares(MoneyCents::new(9000), &members);
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|(_, s)| s.cents() == 3000));
    }

    #[test]
    fn equal_split_assigns_remainder_to_lowest_ids() {
        let members = ids(3);
        let shares = equal_shares(MoneyCents::new(100), &members);
        let cents: Vec<i64> = shares.iter().map(|(_, s)| s.cents()).collect();
        assert_eq!(cents, vec![34, 33, 33]);
        assert_eq!(cents.iter().sum::<i64>(), 100);

        // Ordered by ascending member id.
        let mut sorted = members.clone();
        sorted.sort_unstable();
        let share_ids: Vec<Uuid> = shares.iter().map(|(id, _)| *id).collect();
        assert_eq!(share_ids, sorted);
    }

    #[test]
    fn equal_split_is_deterministic() {
        let members = ids(7);
        let first = equal_shares(MoneyCents::new(12345), &members);
        let second = equal_shares(MoneyCents::new(12345), &members);
        assert_eq!(first, second);
    }

    #[test]
    fn custom_split_accepts_exact_sum() {
        let members = ids(2);
        let splits: HashMap<Uuid, MoneyCents> = [
            (members[0], MoneyCents::new(3000)),
            (members[1], MoneyCents::new(7000)),
        ]
        .into();
        let shares = resolve_custom_shares(MoneyCents::new(10000), &splits, &members).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(
            shares.iter().map(|(_, s)| s.cents()).sum::<i64>(),
            10000
        );
    }

    #[test]
    fn custom_split_rejects_mismatched_sum() {
        let members = ids(2);
        let splits: HashMap<Uuid, MoneyCents> = [
            (members[0], MoneyCents::new(3000)),
            (members[1], MoneyCents::new(7000)),
        ]
        .into();
        let err = resolve_custom_shares(MoneyCents::new(9900), &splits, &members).unwrap_err();
        assert!(matches!(err, EngineError::SplitMismatch(_)));
    }

    #[test]
    fn custom_split_rejects_non_member() {
        let members = ids(2);
        let outsider = Uuid::new_v4();
        let splits: HashMap<Uuid, MoneyCents> = [
            (members[0], MoneyCents::new(5000)),
            (outsider, MoneyCents::new(5000)),
        ]
        .into();
        let err = resolve_custom_shares(MoneyCents::new(10000), &splits, &members).unwrap_err();
        assert!(matches!(err, EngineError::SplitMismatch(_)));
    }

    #[test]
    fn custom_split_tolerates_one_cent() {
        let members = ids(3);
        let splits: HashMap<Uuid, MoneyCents> = [
            (members[0], MoneyCents::new(3333)),
            (members[1], MoneyCents::new(3333)),
            (members[2], MoneyCents::new(3333)),
        ]
        .into();
        // 99.99 against a 100.00 total is within the 1-cent tolerance.
        assert!(resolve_custom_shares(MoneyCents::new(10000), &splits, &members).is_ok());
    }
}
