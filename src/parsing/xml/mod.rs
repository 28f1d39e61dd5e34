pub mod namespaces;
pub mod observations;
pub mod tree;
