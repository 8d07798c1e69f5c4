//! # Pawsit API Server Library
//!
//! HTTP surface of the Pawsit marketplace: request decoding, validation,
//! authentication and the mapping of service errors to status codes.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating extractors
//! - `middleware`: Rate limiting and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
