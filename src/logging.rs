use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging based on verbosity level
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("lower_bounds=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("lower_bounds=info,warn,error"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if verbose {
        tracing::info!("Verbose logging enabled");
    }

    Ok(())
}

/// Log the outcome of a lower-bound synchronization check
pub fn log_sync_check(target_runtime: &str, errors: usize) {
    if errors == 0 {
        tracing::info!(
            target_runtime = target_runtime,
            "Constraint file in sync with declared lower bounds"
        );
    } else {
        tracing::error!(
            target_runtime = target_runtime,
            errors = errors,
            "Constraint file out of sync with declared lower bounds"
        );
    }
}

/// Log a constraint file load
pub fn log_file_loaded(path: &str, entries: usize) {
    tracing::info!(path = path, entries = entries, "Constraint file loaded");
}
