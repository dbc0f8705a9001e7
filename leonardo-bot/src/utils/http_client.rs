use std::{sync::OnceLock, time::Duration};

use tracing::{debug, warn};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("leonardo-bot/", env!("CARGO_PKG_VERSION"));

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Safe to ignore: can happen if another crate installed it first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Build the shared `reqwest::Client` used for the plan API and Discord.
///
/// `request_timeout` bounds each request end to end; `Duration::ZERO` leaves
/// reqwest's default (no timeout) in place.
pub fn build_client(request_timeout: Duration) -> reqwest::Client {
    install_rustls_provider();

    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

    if request_timeout > Duration::ZERO {
        builder = builder.timeout(request_timeout);
    }

    builder.build().unwrap_or_else(|error| {
        warn!(
            error = %error,
            "Failed to create configured HTTP client; falling back to reqwest defaults"
        );
        reqwest::Client::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("leonardo-bot/"));
        assert!(USER_AGENT.len() > "leonardo-bot/".len());
    }

    #[test]
    fn test_install_provider_is_idempotent() {
        install_rustls_provider();
        install_rustls_provider();
    }
}
