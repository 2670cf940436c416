//! Core types and trait definitions for the Rink match pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate depends on it: the extractors produce its records, the
//! stores persist its documents, and the pipeline talks to the outside world
//! through the traits in [`source`].

pub mod document;
pub mod error;
pub mod record;
pub mod report;
pub mod source;

pub use error::{Error, Result};
