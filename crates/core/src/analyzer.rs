use crate::domain::analysis::{
    classify, prediction_text, ticker_symbol, AnalysisReport, FinancialData, PriceQuote, Sentiment,
};
use crate::providers::market::MarketDataSource;
use crate::providers::news::NewsSource;
use crate::rng::RandomSource;
use crate::{sentiment, time};
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::sync::Arc;

const HEADLINE_LIMIT: usize = 5;

// Composes the analysis pipeline over whichever providers are configured.
// Provider failures degrade to fallbacks; they never fail the analysis.
pub struct CompanyAnalyzer {
    news: Option<Arc<dyn NewsSource>>,
    market: Option<Arc<dyn MarketDataSource>>,
    rng: Arc<dyn RandomSource>,
}

impl CompanyAnalyzer {
    pub fn new(
        news: Option<Arc<dyn NewsSource>>,
        market: Option<Arc<dyn MarketDataSource>>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self { news, market, rng }
    }

    pub async fn analyze<Tz>(&self, company: &str, now: &DateTime<Tz>) -> AnalysisReport
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let headlines = self.collect_headlines(company).await;
        let score = sentiment::average_compound(&headlines);
        let label = classify(score);

        let ticker = ticker_symbol(company);
        let financial = self.collect_financial(&ticker).await;
        let prediction = prediction_text(label, company, self.rng.as_ref());

        AnalysisReport {
            company: company.to_string(),
            ticker,
            sentiment: Sentiment { score, label },
            financial,
            prediction,
            last_updated: time::human_stamp(now),
        }
    }

    async fn collect_headlines(&self, company: &str) -> Vec<String> {
        let fetched = match &self.news {
            Some(news) => match news.headlines(company, HEADLINE_LIMIT).await {
                Ok(titles) => titles,
                Err(err) => {
                    tracing::warn!(error = %err, company, "news lookup failed; using fallback headlines");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if fetched.is_empty() {
            sentiment::fallback_headlines(company)
        } else {
            fetched
        }
    }

    async fn collect_financial(&self, ticker: &str) -> Option<FinancialData> {
        let market = self.market.as_ref()?;

        let quote = match market.global_quote(ticker).await {
            Ok(quote) => quote,
            Err(err) => {
                tracing::warn!(error = %err, ticker, "quote lookup failed");
                None
            }
        };
        let market_cap = match market.market_cap(ticker).await {
            Ok(cap) => cap,
            Err(err) => {
                tracing::warn!(error = %err, ticker, "overview lookup failed");
                None
            }
        };

        match (quote, market_cap) {
            (Some(quote), market_cap) => Some(FinancialData {
                price: Some(PriceQuote {
                    current: quote.price,
                    change: quote.change,
                    change_percent: quote.change_percent,
                }),
                volume: Some(quote.volume),
                market_cap: Some(market_cap.unwrap_or_else(|| "N/A".to_string())),
            }),
            (None, Some(market_cap)) => Some(FinancialData {
                price: None,
                volume: None,
                market_cap: Some(market_cap),
            }),
            (None, None) => None,
        }
    }
}
