//! # mikra
//!
//! Library target of the Mikra binary, exposing the HTTP API and the
//! configuration layer to integration tests.

pub mod api;
pub mod config;
