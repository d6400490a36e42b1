//! Libris application library
//!
//! The lending catalog, its terminal desk, and its HTTP module.

pub mod bootstrap;
pub mod modules;
pub mod utils;

pub use modules::catalog;
