pub mod countries;
pub mod handlers;
pub mod models;
mod plugin;
pub mod policy;
pub mod repo;

pub use plugin::StoriesPlugin;
