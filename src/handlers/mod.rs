// src/handlers/mod.rs

pub mod dashboard;
pub mod extract;
