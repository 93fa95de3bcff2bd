//! Map states: the resolver table and the built-in US map.

pub mod directory;
mod usa;

pub use directory::{DirectoryError, StateDirectory, StateInfo};
pub use usa::usa_states;
