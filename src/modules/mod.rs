pub mod catalog;

use libris_kernel::{settings::Settings, ModuleRegistry};

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    registry.register(catalog::create_module(&settings.catalog))?;
    Ok(())
}
