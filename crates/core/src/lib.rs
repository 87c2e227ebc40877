#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Variable resolution and prompt-format conversion engine.
//!
//! - [`vars`]: placeholder scanning, extraction and the persisted custom
//!   variable namespace.
//! - [`convert`]: detection and conversion between the internal schema,
//!   OpenAI requests, LangFuse traces and plain conversations.
//! - [`templates`]: deriving, validating and filling prompt templates.
//! - [`transfer`]: file and clipboard import/export.

pub mod config;
pub mod convert;
pub mod store;
pub mod templates;
pub mod transfer;
pub mod vars;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn doctor_stub() -> String {
    format!("promptvars-core v{} on {}", version(), std::env::consts::OS)
}
