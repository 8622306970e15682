pub mod handlers;
pub mod models;
pub mod plugin;
pub mod repo;

pub use handlers::AuthUser;
pub use plugin::AuthPlugin;
