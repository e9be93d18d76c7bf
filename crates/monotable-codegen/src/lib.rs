//! Compiles a declarative single-table schema into Rust source text: the
//! discriminant enum, one record type and constructor helper per entity
//! variant, and a table definition wired with pk/sk/gsi key derivations.
//!
//! The input is an already-parsed schema tree. Output is deterministic:
//! identical trees generate byte-identical source.

mod component;
pub use component::KeyComponent;

mod error;
pub use error::SchemaError;

mod generate;
pub use generate::generate;

mod schema;
pub use schema::{GsiDef, ModelDef, Schema, TableDef};
