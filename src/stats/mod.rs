// Stats module entry
// Loads the player statistics CSV and answers the query operations over it.

pub mod dataset;
pub mod query;

pub use dataset::{DatasetError, Table, Value};
