//! Renders blog posts from a hosted content store and forwards reader
//! comments to the moderation endpoint.

pub mod blog;
pub mod comment;
pub mod config;
pub mod loader;
pub mod paths;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;
