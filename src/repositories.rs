pub mod balances;
pub mod documents;
pub mod transactions;
pub mod users;

#[cfg(test)]
pub mod memory;
