//! SINT: a sorted container driven by a small line-oriented command language.
//!
//! The container is a plain binary search tree of [`Record`]s (an integer key
//! plus a short label) supporting insert, erase and membership queries. The
//! [`Interpreter`] reads commands such as `i 10 aap` from untrusted input,
//! parses them with bounded, checked parsing and applies them to the tree.
//!
//! The public modules expose each stage on its own: [`record`] and [`tree`]
//! for the container, [`line_reader`] and [`parser`] for input handling,
//! [`command`] for dispatch and [`io_adapters`] for line sources.

pub mod command;
mod interpreter;
pub mod io_adapters;
pub mod line_reader;
pub mod parser;
pub mod record;
pub mod selftest;
pub mod tree;

/// Just a convenient re-export of the command loop.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
pub use record::{Label, Record};
pub use tree::{InsertOutcome, Tree};
