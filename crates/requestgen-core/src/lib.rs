//! Core library for generating typed API request builders.
//!
//! Given a declaration set — struct-like type declarations with annotated
//! fields — this crate generates companion Rust source: fluent setters,
//! checked parameter-map builders, slug substitution helpers and an async
//! dispatch method targeting the `requestgen-client` runtime crate.
//!
//! The pipeline runs per type: [`introspect`](introspect::introspect) →
//! [`classify`](classify::classify) → [`resolve`](rules::resolve) →
//! [`CodeEmitter`](emit::CodeEmitter), orchestrated by
//! [`generate`](generate::generate).

pub mod classify;
pub mod config;
pub mod declaration;
pub mod emit;
pub mod error;
pub mod field;
pub mod generate;
pub mod imports;
pub mod introspect;
pub mod rules;
pub mod utils;

pub use config::Config;
pub use declaration::{DeclarationSet, Registry};
pub use error::{Error, Result};
pub use generate::{generate, GenerationReport, TypeFailure};
