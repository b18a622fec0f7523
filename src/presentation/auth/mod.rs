//! Authentication HTTP surface

pub mod controller;
pub mod extractors;
pub mod models;
