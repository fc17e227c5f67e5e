//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`NewLink`] - Insert payload for a link
//! - [`ShortenOutcome`] - Whether a shorten call created or reused a link

pub mod link;

pub use link::{Link, NewLink, ShortenOutcome};
