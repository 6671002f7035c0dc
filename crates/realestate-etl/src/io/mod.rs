//! Loading source files and persisting cleaned datasets.
//!
//! - [`load_csv`] reads a delimited file into a `DataFrame`
//! - [`write_csv`] writes the cleaned dataset next to its source
//! - [`TableSink`] replace-loads a dataset into a relational table

mod file_sink;
mod loader;
pub mod table;

pub use file_sink::{cleaned_path, write_csv};
pub use loader::{INFER_SCHEMA_ROWS, load_csv};
pub use table::{Dialect, TableSink};
