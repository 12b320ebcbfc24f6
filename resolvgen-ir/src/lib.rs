//! Object/field model for the resolvgen resolver generator.
//!
//! This crate holds the types handed to the generator by the schema compiler.
//! The generator never parses the schema itself; it only reads these types.
//!
//! # Architecture
//!
//! ```text
//! schema (GraphQL) → schema compiler → resolvgen-ir (objects, fields) → resolvgen-codegen
//! ```

mod model;

pub use model::{Arg, Field, Object, Position, Schema};
