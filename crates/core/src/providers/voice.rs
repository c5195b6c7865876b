use crate::config::Settings;
use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "http://api.voicerss.org";
const LANGUAGE: &str = "en-us";

#[derive(Debug, Clone)]
pub struct VoiceRssClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VoiceRssClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        let http = super::build_http_client("VOICERSS_TIMEOUT_SECS")?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        let Some(api_key) = settings.voicerss_api_key.clone() else {
            return Ok(None);
        };

        let base_url =
            std::env::var("VOICERSS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, base_url).map(Some)
    }

    // The provider's URL contract puts the key in the query string, so the key
    // is visible to whoever receives this URL.
    // TODO: proxy the audio fetch server-side instead of handing the key to clients.
    pub fn synthesis_url(&self, text: &str) -> String {
        format!(
            "{}/?key={}&hl={}&src={}",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            LANGUAGE,
            urlencoding::encode(text)
        )
    }

    // Live health check. The provider answers 200 with an "ERROR ..." body for
    // bad keys, so both the status and the body text matter.
    pub async fn probe(&self) -> Result<bool> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("hl", LANGUAGE),
                ("src", "test"),
            ])
            .send()
            .await
            .context("voice synthesis probe request failed")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("failed to read voice synthesis probe body")?;

        Ok(status.is_success() && !body.contains("ERROR"))
    }
}
