//! Library crate root: profile store, execution preparer, and CLI surface.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod cli;
pub mod launcher;
pub mod store;
