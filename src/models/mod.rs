// src/models/mod.rs

pub mod attempt;
pub mod dashboard;
pub mod quiz;
pub mod student;
