pub mod account;
pub mod admin;
pub mod health;
pub mod profile;
