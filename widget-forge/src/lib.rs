// Generation pipeline module
pub mod generation;

// Key-value storage module
pub mod store;
