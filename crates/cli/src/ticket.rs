//! Issue tracker client used by the `ticket` command.
//!
//! Items are read from `GET {base}/api/items/{id}` with HTTP Basic auth. The
//! title and description of the returned issue become the search query.

use anyhow::{anyhow, Context as AnyhowContext, Result};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
pub const USERNAME_ENV: &str = "GEMINI_USERNAME";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, PartialEq, Eq)]
pub struct TicketConfig {
    pub base_url: String,
    pub username: String,
    pub api_key: String,
}

impl std::fmt::Debug for TicketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TicketConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// All three values must be present and non-empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let base_url = read(BASE_URL_ENV).map(|url| url.trim_end_matches('/').to_string());

        match (base_url, read(USERNAME_ENV), read(API_KEY_ENV)) {
            (Some(base_url), Some(username), Some(api_key)) if !base_url.is_empty() => Ok(Self {
                base_url,
                username,
                api_key,
            }),
            _ => Err(anyhow!(
                "{BASE_URL_ENV} / {USERNAME_ENV} / {API_KEY_ENV} must all be set"
            )),
        }
    }
}

/// HTTP client for single issue lookups
pub struct TicketClient {
    config: TicketConfig,
    http: reqwest::Client,
}

impl TicketClient {
    pub fn new(config: TicketConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, http })
    }

    pub fn item_url(&self, item_id: u64) -> String {
        format!("{}/api/items/{item_id}", self.config.base_url)
    }

    /// Fetch one issue as raw JSON. Non-2xx responses are errors.
    pub async fn get_item(&self, item_id: u64) -> Result<Value> {
        let url = self.item_url(item_id);
        log::debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.api_key))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Ticket {item_id} could not be fetched"))?;

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response from {url}"))?;
        serde_json::from_slice(&body).with_context(|| format!("Response from {url} is not JSON"))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TicketEntity {
    #[serde(rename = "Title", default)]
    title: Value,
    #[serde(rename = "Description", default)]
    description: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IssuePayload {
    Wrapped {
        #[serde(rename = "Entity")]
        entity: TicketEntity,
    },
    Flat(TicketEntity),
}

/// `"{title}\n\n{description}"`, trimmed. Missing fields count as empty.
///
/// Issues normally carry their fields under `Entity`; a flat object is accepted
/// too but logged.
pub fn extract_ticket_text(payload: &Value) -> String {
    let entity = match IssuePayload::deserialize(payload) {
        Ok(IssuePayload::Wrapped { entity }) => entity,
        Ok(IssuePayload::Flat(entity)) => {
            log::warn!("Ticket payload has no Entity object; reading fields from the top level");
            entity
        }
        Err(e) => {
            log::warn!("Unrecognised ticket payload: {e}");
            TicketEntity::default()
        }
    };

    format!(
        "{}\n\n{}",
        field_text(&entity.title),
        field_text(&entity.description)
    )
    .trim()
    .to_string()
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
