pub mod action;
pub mod config;
pub mod graph;
pub mod label;
pub mod plan;
pub mod render;
pub mod summary;
#[doc(hidden)]
pub mod test_support;
