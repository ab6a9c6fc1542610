//! Hearth - minimal static file server
//!
//! Core library for request parsing, web-root confinement, static file and
//! directory-listing responses, and form echo.

pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod router;
pub mod serve;
pub mod server;
