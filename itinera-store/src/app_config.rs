use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub mock: MockConfig,
    pub log: LogConfig,
}

/// Busy window of the mutation gate
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub lower_limit_ms: u64,
    pub upper_limit_ms: u64,
}

impl UiConfig {
    pub fn lower_limit(&self) -> Duration {
        Duration::from_millis(self.lower_limit_ms)
    }

    pub fn upper_limit(&self) -> Duration {
        Duration::from_millis(self.upper_limit_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            lower_limit_ms: 350,
            upper_limit_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MockConfig {
    pub seed: Option<u64>,
    pub points: usize,
    pub min_destinations: usize,
    pub max_destinations: usize,
    pub offers_per_type: usize,
    pub latency_ms: u64,
    pub fail_mutations: bool,
    pub fail_catalogs: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            seed: None,
            points: 4,
            min_destinations: 3,
            max_destinations: 8,
            offers_per_type: 5,
            latency_ms: 200,
            fail_mutations: false,
            fail_catalogs: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "itinera_cli=info,itinera_presenter=info,itinera_store=info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `ITINERA__UI__LOWER_LIMIT_MS=500`
            .add_source(
                config::Environment::with_prefix("ITINERA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
