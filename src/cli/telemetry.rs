use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

fn filter(verbosity_level: Level) -> Result<EnvFilter> {
    Ok(EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=warn".parse()?))
}

/// Initialize logging on stderr; stdout is reserved for navigation output.
///
/// # Errors
///
/// Returns an error if a filter directive is invalid or a global subscriber
/// is already installed.
pub fn init(verbosity_level: Option<Level>, json: bool) -> Result<()> {
    let filter = filter(verbosity_level.unwrap_or(Level::ERROR))?;

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if json {
        let subscriber = Registry::default()
            .with(fmt_layer.json().flatten_event(true))
            .with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_level() -> Result<()> {
        temp_env::with_var("RUST_LOG", None::<String>, || -> Result<()> {
            let rendered = filter(Level::DEBUG)?.to_string().to_lowercase();
            assert!(rendered.contains("debug"));
            assert!(rendered.contains("hyper=error"));
            assert!(rendered.contains("reqwest=warn"));
            Ok(())
        })
    }

    #[test]
    fn test_filter_honors_rust_log() -> Result<()> {
        temp_env::with_var("RUST_LOG", Some("pingate=trace"), || -> Result<()> {
            let rendered = filter(Level::ERROR)?.to_string().to_lowercase();
            assert!(rendered.contains("pingate=trace"));
            Ok(())
        })
    }
}
