//! Discord REST API client.
//!
//! Authenticates with a bot token and talks to the v10 HTTP API directly.
//! Rate limit handling follows Discord's recommendations:
//! - No hardcoded rate limits
//! - Retries on 429 responses respecting `Retry-After` / `X-RateLimit-Reset-After`
//!   or the `retry_after` field of the JSON body

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{ChannelId, ChatClient, MessageHandle, MessageId};
use crate::notification::document::NotificationDocument;
use crate::utils::text::truncate_chars;
use crate::{Error, Result};

/// Default Discord API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Maximum number of retries for rate-limited requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

// Embed limits, in characters.
const TITLE_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;
const FIELD_COUNT_LIMIT: usize = 25;
const FIELD_NAME_LIMIT: usize = 256;
const FIELD_VALUE_LIMIT: usize = 1024;
const EMBED_TOTAL_LIMIT: usize = 6000;
const FOOTER_RESERVE: usize = 64;
const CONTENT_LIMIT: usize = 2000;

/// Discord rejects empty field names and values.
const BLANK: &str = "\u{200B}";

/// Default embed color (blue).
const DEFAULT_COLOR: u32 = 0x3498db;

/// Discord client configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token, sent as `Authorization: Bot <token>`.
    pub token: String,
    /// API base URL without trailing slash.
    pub api_base: String,
    /// Embed side color.
    pub color: u32,
}

impl DiscordConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            color: DEFAULT_COLOR,
        }
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("color", &format_args!("{:#08x}", self.color))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    username: String,
}

/// Discord chat client.
pub struct DiscordClient {
    config: DiscordConfig,
    client: Client,
}

impl DiscordClient {
    /// Create a new Discord client on top of a shared HTTP client.
    pub fn new(config: DiscordConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Build the message payload carrying `doc` as a single rich embed.
    ///
    /// Discord's embed limits are applied here: oversized texts are
    /// truncated and fields beyond the count or total-size budget are
    /// dropped, with a footer saying how many were left out.
    fn build_payload(&self, doc: &NotificationDocument) -> Value {
        let title = truncate_chars(doc.title(), TITLE_LIMIT);
        let description = truncate_chars(doc.description(), DESCRIPTION_LIMIT);

        let mut budget = EMBED_TOTAL_LIMIT
            .saturating_sub(title.chars().count())
            .saturating_sub(description.chars().count())
            .saturating_sub(FOOTER_RESERVE);

        let mut fields = Vec::new();
        for field in doc.fields() {
            if fields.len() >= FIELD_COUNT_LIMIT {
                break;
            }
            let name = non_blank(truncate_chars(&field.name, FIELD_NAME_LIMIT));
            let value = non_blank(truncate_chars(&field.value, FIELD_VALUE_LIMIT));
            let size = name.chars().count() + value.chars().count();
            if size > budget {
                break;
            }
            budget -= size;
            fields.push(json!({
                "name": name,
                "value": value,
                "inline": field.inline,
            }));
        }

        let mut embed = json!({
            "type": "rich",
            "title": title,
            "description": description,
            "color": self.config.color,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "fields": fields,
        });

        let omitted = doc.fields().len() - fields.len();
        if omitted > 0 {
            embed["footer"] = json!({ "text": format!("{omitted} more entries not shown") });
        }

        json!({ "embeds": [embed] })
    }

    /// Send a request, retrying on 429 responses.
    ///
    /// Any other response, successful or not, is returned to the caller.
    async fn send_with_retry(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Response> {
        let url = self.url(path);
        let mut attempts = 0;

        loop {
            attempts += 1;

            let mut request = self
                .client
                .request(method.clone(), &url)
                .header(AUTHORIZATION, format!("Bot {}", self.config.token));
            if let Some(payload) = payload {
                request = request.json(payload);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::discord(format!("{} {} failed: {}", method, path, e)))?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let retry_after = parse_retry_after(response).await;

            if attempts > MAX_RATE_LIMIT_RETRIES {
                warn!(
                    "Discord rate limit: max retries ({}) exceeded, last retry_after was {:?}",
                    MAX_RATE_LIMIT_RETRIES, retry_after
                );
                return Err(Error::discord(format!(
                    "rate limit exceeded after {} retries",
                    MAX_RATE_LIMIT_RETRIES
                )));
            }

            let wait_duration = retry_after.unwrap_or(Duration::from_secs(1));
            debug!(
                "Discord rate limited (429), waiting {:?} before retry {}/{}",
                wait_duration, attempts, MAX_RATE_LIMIT_RETRIES
            );
            tokio::time::sleep(wait_duration).await;
        }
    }

    async fn post_message(&self, channel_id: ChannelId, payload: &Value) -> Result<MessageHandle> {
        let path = format!("/channels/{}/messages", channel_id);
        let response = self.send_with_retry(Method::POST, &path, Some(payload)).await?;
        let response = ensure_success(response, "send message").await?;
        let message: MessageResponse = decode(response).await?;

        Ok(MessageHandle {
            channel_id: ChannelId(parse_snowflake(&message.channel_id)?),
            message_id: MessageId(parse_snowflake(&message.id)?),
        })
    }
}

#[async_trait]
impl ChatClient for DiscordClient {
    async fn current_user(&self) -> Result<String> {
        let response = self.send_with_retry(Method::GET, "/users/@me", None).await?;
        let response = ensure_success(response, "authenticate").await?;
        let user: UserResponse = decode(response).await?;
        Ok(user.username)
    }

    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<ChannelId> {
        let path = format!("/channels/{}", channel_id);
        let response = self.send_with_retry(Method::GET, &path, None).await?;
        let response = ensure_success(response, "resolve channel").await?;
        let channel: ChannelResponse = decode(response).await?;
        Ok(ChannelId(parse_snowflake(&channel.id)?))
    }

    async fn send_document(
        &self,
        channel_id: ChannelId,
        doc: &NotificationDocument,
    ) -> Result<MessageHandle> {
        let payload = self.build_payload(doc);
        let handle = self.post_message(channel_id, &payload).await?;
        debug!(message = %handle, fields = doc.fields().len(), "Discord embed sent");
        Ok(handle)
    }

    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<MessageHandle> {
        let payload = json!({ "content": truncate_chars(text, CONTENT_LIMIT) });
        let handle = self.post_message(channel_id, &payload).await?;
        debug!(message = %handle, "Discord message sent");
        Ok(handle)
    }

    async fn delete_message(&self, handle: &MessageHandle) -> Result<()> {
        let path = format!("/channels/{}/messages/{}", handle.channel_id, handle.message_id);
        let response = self.send_with_retry(Method::DELETE, &path, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(message = %handle, "Discord message already gone");
            return Ok(());
        }

        ensure_success(response, "delete message").await?;
        debug!(message = %handle, "Discord message deleted");
        Ok(())
    }
}

fn non_blank(text: String) -> String {
    if text.trim().is_empty() {
        BLANK.to_string()
    } else {
        text
    }
}

/// Turn a non-success response into an error carrying status and body.
async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Discord {} failed: {} - {}", action, status, body);
    Err(Error::discord(format!("{} failed: {} - {}", action, status, body)))
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| Error::discord(format!("unexpected response body: {}", e)))
}

fn parse_snowflake(id: &str) -> Result<u64> {
    id.parse()
        .map_err(|_| Error::discord(format!("invalid snowflake {:?}", id)))
}

/// Parse the retry delay from a 429 response.
async fn parse_retry_after(response: Response) -> Option<Duration> {
    let headers = response.headers();

    // Try Retry-After header first (Discord sets this)
    for name in ["Retry-After", "X-RateLimit-Reset-After"] {
        if let Some(value) = headers.get(name)
            && let Some(secs) = value.to_str().ok().and_then(|v| v.parse::<f64>().ok())
        {
            return retry_delay(secs);
        }
    }

    // Fallback: the JSON body also carries `retry_after` in seconds
    let body: Value = response.json().await.ok()?;
    body.get("retry_after")
        .and_then(Value::as_f64)
        .and_then(retry_delay)
}

/// Convert a server supplied delay in seconds. Values that do not fit a
/// `Duration` (NaN, infinite, overflowing) are ignored.
fn retry_delay(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs.max(0.0)).ok()
}
