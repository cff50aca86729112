//! Diagnostic logging for the `expmod` binary.

use tracing_subscriber::EnvFilter;

/// Filter directives for a `-v` count, used when `RUST_LOG` is unset.
fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,expmod=info,expmod_core=info",
        _ => "warn,expmod=debug,expmod_core=debug",
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_crate_levels() {
        assert_eq!(default_directives(0), "warn");
        assert!(default_directives(1).contains("expmod_core=info"));
        assert!(default_directives(2).contains("expmod=debug"));
        assert_eq!(default_directives(7), default_directives(2));
    }

    #[test]
    fn directives_parse() {
        for level in 0..3 {
            EnvFilter::try_new(default_directives(level)).unwrap();
        }
    }
}
