//! Startup configuration.
//!
//! Every setting can be given as a command line flag or through the matching
//! `LEONARDO_*` environment variable (a `.env` file is loaded first). The
//! configuration is read once at startup and never changes afterwards.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::notification::{ChannelId, DiscordConfig, channels::DEFAULT_API_BASE};
use crate::{Error, Result};

/// Watches a substitution plan API and keeps a single up-to-date Discord notification.
#[derive(Parser, Clone)]
#[command(name = "leonardo-bot", version, about, args_override_self = true)]
pub struct BotConfig {
    /// URL of the plan API endpoint (e.g. https://host/get/10b)
    #[arg(long, env = "LEONARDO_SOURCE_URL")]
    pub source_url: String,

    /// Discord bot token
    #[arg(long, env = "LEONARDO_DISCORD_TOKEN", hide_env_values = true)]
    pub discord_token: String,

    /// Channel receiving the plan notification
    #[arg(long = "main-channel", env = "LEONARDO_MAIN_CHANNEL_ID")]
    pub main_channel_id: u64,

    /// Channel receiving error reports
    #[arg(long = "error-channel", env = "LEONARDO_ERROR_CHANNEL_ID")]
    pub error_channel_id: u64,

    /// Seconds to wait between two polls
    #[arg(long = "interval", env = "LEONARDO_INTERVAL_SECONDS", default_value_t = 300)]
    pub interval_secs: u64,

    /// Timeout in seconds for every request to the plan API or Discord
    #[arg(
        long = "request-timeout",
        env = "LEONARDO_REQUEST_TIMEOUT_SECONDS",
        default_value_t = 30
    )]
    pub request_timeout_secs: u64,

    /// Discord API base URL
    #[arg(long, env = "LEONARDO_DISCORD_API_BASE", default_value = DEFAULT_API_BASE)]
    pub discord_api_base: String,

    /// Directory for daily rotated log files (console only when unset)
    #[arg(long, env = "LEONARDO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl BotConfig {
    /// Check the values clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.source_url()?;

        if self.discord_token.trim().is_empty() {
            return Err(Error::config("Discord token must not be empty"));
        }
        if self.main_channel_id == 0 {
            return Err(Error::config("main channel id must not be 0"));
        }
        if self.error_channel_id == 0 {
            return Err(Error::config("error channel id must not be 0"));
        }
        if self.interval_secs == 0 {
            return Err(Error::config("poll interval must be at least one second"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::config("request timeout must be at least one second"));
        }
        Url::parse(&self.discord_api_base)
            .map_err(|e| Error::config(format!("invalid Discord API base URL: {e}")))?;

        Ok(())
    }

    /// The plan API endpoint, which must be an http(s) URL.
    pub fn source_url(&self) -> Result<Url> {
        let url = Url::parse(&self.source_url).map_err(|e| {
            Error::config(format!("invalid source URL {:?}: {e}", self.source_url))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::config(format!(
                "source URL must use http or https, got {other:?}"
            ))),
        }
    }

    pub fn main_channel(&self) -> ChannelId {
        ChannelId(self.main_channel_id)
    }

    pub fn error_channel(&self) -> ChannelId {
        ChannelId(self.error_channel_id)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn discord(&self) -> DiscordConfig {
        DiscordConfig {
            token: self.discord_token.clone(),
            api_base: self.discord_api_base.clone(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("source_url", &self.source_url)
            .field("discord_token", &"<redacted>")
            .field("main_channel_id", &self.main_channel_id)
            .field("error_channel_id", &self.error_channel_id)
            .field("interval_secs", &self.interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("discord_api_base", &self.discord_api_base)
            .field("log_dir", &self.log_dir)
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(extra: &[&str]) -> BotConfig {
        let mut args = vec![
            "leonardo-bot",
            "--source-url",
            "https://plan.example.org/get/10b",
            "--discord-token",
            "token",
            "--main-channel",
            "111",
            "--error-channel",
            "222",
        ];
        args.extend_from_slice(extra);
        BotConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);

        config.validate().unwrap();
        assert_eq!(config.interval(), Duration::from_secs(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.main_channel(), ChannelId(111));
        assert_eq!(config.error_channel(), ChannelId(222));
        assert_eq!(config.discord().api_base, DEFAULT_API_BASE);
        assert!(config.log_dir.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&["--interval", "60", "--request-timeout", "5", "-v"]);

        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.verbose);
    }

    #[rstest]
    #[case::bad_url(&["--source-url", "not a url"], "invalid source URL")]
    #[case::bad_scheme(&["--source-url", "ftp://plan.example.org/plan"], "http or https")]
    #[case::empty_token(&["--discord-token", " "], "token")]
    #[case::zero_main_channel(&["--main-channel", "0"], "main channel")]
    #[case::zero_error_channel(&["--error-channel", "0"], "error channel")]
    #[case::zero_interval(&["--interval", "0"], "interval")]
    #[case::zero_timeout(&["--request-timeout", "0"], "timeout")]
    #[case::bad_api_base(&["--discord-api-base", "::"], "API base")]
    fn test_validate_rejects(#[case] extra: &[&str], #[case] expected: &str) {
        // Later flags override the defaults passed by `parse`.
        let err = parse(extra).validate().unwrap_err();

        assert!(matches!(err, Error::Configuration(_)), "unexpected error: {err:?}");
        assert!(err.to_string().contains(expected), "{err} should mention {expected}");
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", parse(&["--discord-token", "very-secret"]));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_missing_required_flag_is_rejected() {
        assert!(BotConfig::try_parse_from(["leonardo-bot", "--main-channel", "1"]).is_err());
    }
}
