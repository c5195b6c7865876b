use vader_sentiment::SentimentIntensityAnalyzer;

// Average compound polarity over a batch of headlines. The compound score is
// the analyzer's single [-1, 1] summary per snippet. Empty input scores 0.0.
pub fn average_compound(headlines: &[String]) -> f64 {
    if headlines.is_empty() {
        return 0.0;
    }

    let analyzer = SentimentIntensityAnalyzer::new();
    let total: f64 = headlines
        .iter()
        .map(|headline| {
            analyzer
                .polarity_scores(headline)
                .get("compound")
                .copied()
                .unwrap_or(0.0)
        })
        .sum();

    total / headlines.len() as f64
}

// Synthesized stand-ins when the news provider is unconfigured or dry.
pub fn fallback_headlines(company: &str) -> Vec<String> {
    vec![
        format!("{company} announces new developments"),
        format!("Latest update on {company}"),
    ]
}
