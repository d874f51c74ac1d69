pub mod auth;
pub mod categories;
pub mod items;
pub mod reports;
pub mod transactions;
pub mod users;
