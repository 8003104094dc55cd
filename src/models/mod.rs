use std::path::PathBuf;

use csv::StringRecord;

pub const DEFAULT_HTML_SOURCE_PATH: &str =
    "src/test/resources/mocks/yahoofinance/yahoo-finance-spy.html";
pub const DEFAULT_HTML_CLEAN_PATH: &str =
    "src/test/resources/mocks/yahoofinance/yahoo-finance-spy_clean.html";
pub const DEFAULT_TICKERS_PATH: &str = "../src/main/resources/data/supported_tickers.csv";

/// Column holding the exchange name in the supported tickers file
pub const EXCHANGE_FIELD: usize = 1;

/// One row of the supported tickers file, ragged rows allowed
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRow {
    record: StringRecord,
}

impl TickerRow {
    pub fn new(record: StringRecord) -> Self {
        Self { record }
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.record.get(index)
    }

    pub fn exchange(&self) -> Option<&str> {
        self.field(EXCHANGE_FIELD)
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    pub fn into_record(self) -> StringRecord {
        self.record
    }
}

impl From<StringRecord> for TickerRow {
    fn from(record: StringRecord) -> Self {
        Self::new(record)
    }
}

/// Outcome of rewriting the supported tickers file
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    /// Rows written, header included
    pub retained: usize,
    pub path: PathBuf,
}

/// File locations used by the fixture tools
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub html_source_path: PathBuf,
    pub html_clean_path: PathBuf,
    pub tickers_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            html_source_path: PathBuf::from(DEFAULT_HTML_SOURCE_PATH),
            html_clean_path: PathBuf::from(DEFAULT_HTML_CLEAN_PATH),
            tickers_path: PathBuf::from(DEFAULT_TICKERS_PATH),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup, falling back to the fixed fixture paths
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path_or = |key: &str, fallback: PathBuf| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };

        Config {
            html_source_path: path_or("HTML_SOURCE_PATH", defaults.html_source_path),
            html_clean_path: path_or("HTML_CLEAN_PATH", defaults.html_clean_path),
            tickers_path: path_or("SUPPORTED_TICKERS_PATH", defaults.tickers_path),
        }
    }
}
