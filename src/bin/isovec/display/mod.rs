mod error;
mod tables;

pub use error::print_error;
pub use tables::{write_kv_table, write_substance_table, write_vector_table};
