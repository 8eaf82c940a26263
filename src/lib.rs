// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

// Re-export specific items for convenience if needed
pub use routes::create_router;
