// src/utils/mod.rs

pub mod coerce;
