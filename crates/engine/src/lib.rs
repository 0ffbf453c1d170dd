//! The debt ledger and settlement engine.
//!
//! Groups of people log shared expenses; the engine records one debt per
//! owing member, aggregates unpaid debts into net balances, and reduces the
//! balances into a minimal list of peer-to-peer payments. All state lives in
//! the store; every operation runs as an independent unit of work.

pub use commands::{MarkPaidCmd, RecordExpenseCmd};
pub use debts::{Debt, DebtStatus};
pub use error::EngineError;
pub use expenses::Expense;
pub use groups::Group;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, GroupMember, PaymentOutcome};
pub use settlement::{NetBalance, PlannedPayment};

mod commands;
pub mod debts;
mod error;
pub mod expenses;
pub mod group_members;
pub mod groups;
mod money;
mod ops;
pub mod settlement;
pub mod split;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
