pub mod analyzer;
pub mod domain;
pub mod providers;
pub mod rng;
pub mod sentiment;
pub mod time;

pub mod config {
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub news_api_key: Option<String>,
        pub alphavantage_api_key: Option<String>,
        pub voicerss_api_key: Option<String>,
        pub wit_ai_token: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                news_api_key: read_key("NEWS_API_KEY"),
                alphavantage_api_key: read_key("ALPHAVANTAGE_API_KEY"),
                voicerss_api_key: read_key("VOICERSS_API_KEY"),
                wit_ai_token: read_key("WIT_AI_TOKEN"),
                sentry_dsn: read_key("SENTRY_DSN"),
            })
        }
    }

    // A key set to an empty string counts as unset.
    fn read_key(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    #[cfg(test)]
    mod tests {
        use super::read_key;

        #[test]
        fn blank_keys_count_as_unset() {
            std::env::set_var("AUGUR_TEST_BLANK_KEY", "   ");
            assert_eq!(read_key("AUGUR_TEST_BLANK_KEY"), None);

            std::env::set_var("AUGUR_TEST_SET_KEY", "abc");
            assert_eq!(read_key("AUGUR_TEST_SET_KEY"), Some("abc".to_string()));
        }
    }
}
