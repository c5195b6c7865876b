use crate::config::Settings;
use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalQuote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: i64,
}

#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    // Ok(None) means the provider answered but had nothing for the symbol.
    async fn global_quote(&self, symbol: &str) -> Result<Option<GlobalQuote>>;

    // Formatted market capitalization, e.g. "$2.5B"; "N/A" for unparseable values.
    async fn market_cap(&self, symbol: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        let Some(api_key) = settings.alphavantage_api_key.clone() else {
            return Ok(None);
        };

        let base_url = std::env::var("ALPHAVANTAGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let http = super::build_http_client("ALPHAVANTAGE_TIMEOUT_SECS")?;

        Ok(Some(Self {
            http,
            base_url,
            api_key,
        }))
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        function: &str,
        symbol: &str,
    ) -> Result<T> {
        let url = format!("{}/query", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(url)
            .query(&[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}");
        }

        res.json::<T>()
            .await
            .context("failed to parse market data response")
    }
}

#[async_trait::async_trait]
impl MarketDataSource for AlphaVantageClient {
    async fn global_quote(&self, symbol: &str) -> Result<Option<GlobalQuote>> {
        let body: GlobalQuoteResponse = self.query("GLOBAL_QUOTE", symbol).await?;
        Ok(parse_global_quote(body))
    }

    async fn market_cap(&self, symbol: &str) -> Result<Option<String>> {
        let body: OverviewResponse = self.query("OVERVIEW", symbol).await?;
        Ok(body
            .market_capitalization
            .filter(|raw| !raw.is_empty())
            .map(|raw| format_market_cap(&raw)))
    }
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: Option<RawQuote>,
}

// The provider speaks strings, field names included.
#[derive(Debug, Default, Deserialize)]
struct RawQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl RawQuote {
    fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.change.is_none()
            && self.change_percent.is_none()
            && self.volume.is_none()
            && self.extra.is_empty()
    }
}

fn parse_global_quote(body: GlobalQuoteResponse) -> Option<GlobalQuote> {
    let raw = body.quote?;
    // Unknown symbols come back as an empty quote object.
    if raw.is_empty() {
        return None;
    }
    Some(numeric_quote(&raw))
}

// One malformed numeric field zeroes the whole quote rather than failing it.
fn numeric_quote(raw: &RawQuote) -> GlobalQuote {
    let parsed = (|| {
        let price = raw.price.as_deref().unwrap_or("0").parse::<f64>().ok()?;
        let change = raw.change.as_deref().unwrap_or("0").parse::<f64>().ok()?;
        let change_percent = raw
            .change_percent
            .as_deref()
            .unwrap_or("0%")
            .trim_end_matches('%')
            .parse::<f64>()
            .ok()?;
        let volume = raw.volume.as_deref().unwrap_or("0").parse::<i64>().ok()?;
        Some(GlobalQuote {
            price,
            change,
            change_percent,
            volume,
        })
    })();

    parsed.unwrap_or(GlobalQuote {
        price: 0.0,
        change: 0.0,
        change_percent: 0.0,
        volume: 0,
    })
}

#[derive(Debug, Deserialize)]
struct OverviewResponse {
    #[serde(rename = "MarketCapitalization", default)]
    market_capitalization: Option<String>,
}

fn format_market_cap(raw: &str) -> String {
    match raw.parse::<f64>() {
        Ok(value) => format!("${:.1}B", value / 1e9),
        Err(_) => "N/A".to_string(),
    }
}
