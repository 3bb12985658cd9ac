mod data_db;
mod dataset;

// Re-exports.
pub use data_db::{DataDB, DEFAULT_DELIMITER};
pub use dataset::{Column, DataSet, Value};
