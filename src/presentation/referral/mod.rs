//! Referral HTTP surface

pub mod controller;
