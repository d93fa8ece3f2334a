// src/application/ports/mod.rs
pub mod accounts;
pub mod embedding;
pub mod tags;
pub mod time;
pub mod util;
