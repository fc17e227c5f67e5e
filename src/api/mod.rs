//! HTTP API layer.
//!
//! Translates HTTP requests into [`crate::application::services::LinkService`]
//! calls and formats responses according to the API contract.
//!
//! - [`docs`] - OpenAPI document
//! - [`dto`] - Request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - CORS and tracing middleware
//! - [`routes`] - Route table

pub mod docs;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
