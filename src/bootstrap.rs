use anyhow::Context;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Build a registry holding every application module.
pub fn registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings).context("failed to register modules")?;
    Ok(registry)
}

/// Run the module lifecycle around the HTTP server until shutdown.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        host = %settings.server.host,
        port = settings.server.port,
        "libris bootstrap starting"
    );

    let registry = registry(settings)?;
    let ctx = InitCtx { settings };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(modules = registry.module_count(), "libris bootstrap complete");

    let served = libris_http::start_server(&registry, settings).await;

    registry.stop_modules().await?;
    served
}
