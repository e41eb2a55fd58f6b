use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SEARCH_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupSource {
    #[default]
    Local,
    Remote,
    LocalThenRemote,
}

impl LookupSource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "remote" => Some(Self::Remote),
            "local-then-remote" | "local_then_remote" | "both" => Some(Self::LocalThenRemote),
            _ => None,
        }
    }

    pub fn uses_remote(self) -> bool {
        self != Self::Local
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub lookup_source: LookupSource,
    pub search_url: String,
    pub search_timeout: Duration,
    pub fold_accents: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            lookup_source: LookupSource::Local,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            fold_accents: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; unparsable values keep
    /// their defaults.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = parse_or("PORT", var("PORT"), defaults.port, |v| v.parse().ok());
        let data_dir = var("APP_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let lookup_source = parse_or(
            "FOOD_LOOKUP_SOURCE",
            var("FOOD_LOOKUP_SOURCE"),
            defaults.lookup_source,
            LookupSource::parse,
        );
        let search_url = var("FOOD_SEARCH_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.search_url);
        let search_timeout = parse_or(
            "FOOD_SEARCH_TIMEOUT_SECS",
            var("FOOD_SEARCH_TIMEOUT_SECS"),
            defaults.search_timeout,
            |v| v.parse::<u64>().ok().filter(|secs| *secs > 0).map(Duration::from_secs),
        );
        let fold_accents = parse_or(
            "FOOD_LOOKUP_FOLD_ACCENTS",
            var("FOOD_LOOKUP_FOLD_ACCENTS"),
            defaults.fold_accents,
            parse_flag,
        );

        Self {
            port,
            data_dir,
            lookup_source,
            search_url,
            search_timeout,
            fold_accents,
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match parse(raw.trim()) {
        Some(value) => value,
        None => {
            warn!("ignoring invalid {key}={raw:?}, using the default");
            default
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
