// src/models/mod.rs

pub mod match_record;
pub mod profile;
pub mod user;
