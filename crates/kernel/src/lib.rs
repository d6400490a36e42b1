//! Settings, module lifecycle, and the module registry shared by every Libris binary.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
