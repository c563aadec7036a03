pub mod adapters;
pub mod source;
pub mod types;
