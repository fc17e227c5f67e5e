//! Data Transfer Objects for API request and response serialization.

pub mod health;
pub mod shorten;
