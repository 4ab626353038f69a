pub mod balances;
pub mod documents;
pub mod transactions;
pub mod users;
