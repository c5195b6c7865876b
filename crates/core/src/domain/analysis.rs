use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

const POSITIVE_THRESHOLD: f64 = 0.2;
const NEGATIVE_THRESHOLD: f64 = -0.2;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    pub company: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub company: String,
    pub ticker: String,
    pub sentiment: Sentiment,
    #[serde(flatten)]
    pub financial: Option<FinancialData>,
    pub prediction: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

// Partial shapes are allowed: a quote without an overview keeps marketCap at
// "N/A", an overview without a quote carries marketCap alone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub current: f64,
    pub change: f64,
    pub change_percent: f64,
}

// Scores sitting exactly on a threshold stay neutral.
pub fn classify(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

// First four characters of the company name, uppercased. Shorter names pass
// through without padding.
pub fn ticker_symbol(company: &str) -> String {
    company.chars().take(4).collect::<String>().to_uppercase()
}

pub fn prediction_text(label: SentimentLabel, company: &str, rng: &dyn RandomSource) -> String {
    let pair = match label {
        SentimentLabel::Positive => [
            format!("The outlook for {company} is bright with significant growth expected."),
            format!("{company} is poised for success with positive market momentum."),
        ],
        SentimentLabel::Neutral => [
            format!("{company} is expected to remain stable with moderate changes."),
            format!("Balanced conditions suggest steady performance for {company}."),
        ],
        SentimentLabel::Negative => [
            format!("Challenges lie ahead for {company}, with a potential decline in performance."),
            format!("{company} may face setbacks and downturns in the near future."),
        ],
    };
    pair[rng.pick_index(pair.len())].clone()
}
