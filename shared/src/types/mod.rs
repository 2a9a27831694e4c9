//! Type definitions shared between the HTTP layer and its tests

pub mod response;

pub use response::{ApiResponse, ErrorResponse, HealthResponse};
