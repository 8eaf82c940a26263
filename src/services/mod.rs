// src/services/mod.rs

pub mod dashboard;
