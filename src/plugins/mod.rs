pub mod albums;
pub mod auth;
pub mod health;
pub mod metrics;
pub mod stories;
pub mod users;
