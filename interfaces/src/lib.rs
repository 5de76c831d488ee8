//! Data contract shared by the catalog loader, engine and presentation layer.

pub mod de;
pub mod defs;

pub use defs::*;
