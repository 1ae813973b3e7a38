//! Local persistence for Swap & Share.
//!
//! Items are kept in SQLite so listings can be previewed offline and mock
//! data can be seeded without touching the hosted backend.

pub mod schema;

pub use schema::{ItemStore, PREVIEW_ITEM_COUNT};
