//! HTTP surface of the MiloKhelo authentication service
//!
//! The binary in `main.rs` wires MySQL-backed repositories into
//! [`app::create_app`]; the integration tests wire in-memory ones.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
