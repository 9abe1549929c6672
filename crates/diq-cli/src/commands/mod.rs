pub mod auth;
pub mod decisions;
mod render;
