pub mod catalog;
pub mod database;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod migration;
pub mod registration;
pub mod session;
#[cfg(test)]
pub mod testing;
