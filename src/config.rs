//! Configuration of an export job.
//!
//! Configuration comes from environment variables prefixed with `LEDGER_`,
//! optionally loaded from a `.env` file first:
//! - `LEDGER_NETWORK`: `pubnet` (default), `testnet` or `futurenet`
//! - `LEDGER_NETWORK_PASSPHRASE`: passphrase of a custom network
//! - `LEDGER_ARCHIVE_URLS`: comma-separated history archive URLs
//! - `LEDGER_START_LEDGER`, `LEDGER_END_LEDGER`: ledger range to export
//! - `LEDGER_LIMIT`: maximum number of transactions, negative for all

use url::Url;

use crate::{
    Network,
    error::FetchError,
    types::{LedgerRange, LedgerSequence},
};

const ENV_PREFIX: &str = "LEDGER_";

/// Well-known network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkName {
    #[default]
    Pubnet,
    Testnet,
    Futurenet,
}

/// Environment configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct EnvConfig {
    /// Network to read ledgers of (default: pubnet)
    #[serde(default)]
    pub network: NetworkName,

    /// Passphrase of a custom network, takes precedence over `network`
    pub network_passphrase: Option<String>,

    /// History archives, overriding the network's well-known ones
    #[serde(default)]
    pub archive_urls: Vec<Url>,

    /// First ledger of the range
    pub start_ledger: LedgerSequence,

    /// Last ledger of the range (default: start ledger)
    pub end_ledger: Option<LedgerSequence>,

    /// Maximum number of transactions (default: unlimited)
    pub limit: Option<i64>,
}

impl EnvConfig {
    /// Load configuration from `.env` (if present) and environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    /// Load configuration from `(name, value)` pairs, names including the prefix.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    pub fn network(&self) -> Result<Network, ConfigError> {
        if let Some(passphrase) = &self.network_passphrase {
            if self.archive_urls.is_empty() {
                return Err(ConfigError::MissingArchiveUrls);
            }
            return Ok(Network::custom(passphrase.clone(), self.archive_urls.clone()));
        }

        let network = match self.network {
            NetworkName::Pubnet => Network::pubnet(),
            NetworkName::Testnet => Network::testnet(),
            NetworkName::Futurenet => Network::futurenet(),
        };
        if self.archive_urls.is_empty() {
            Ok(network)
        } else {
            Ok(Network::custom(network.passphrase(), self.archive_urls.clone()))
        }
    }

    pub fn range(&self) -> Result<LedgerRange, ConfigError> {
        LedgerRange::new(
            self.start_ledger,
            self.end_ledger.unwrap_or(self.start_ledger),
        )
        .map_err(ConfigError::InvalidRange)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(-1)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Custom network requires archive URLs")]
    MissingArchiveUrls,

    #[error(transparent)]
    InvalidRange(FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = EnvConfig::from_vars(vars(&[("LEDGER_START_LEDGER", "100")])).unwrap();

        assert_eq!(config.network, NetworkName::Pubnet);
        assert_eq!(config.network().unwrap(), Network::pubnet());
        assert_eq!(config.range().unwrap(), LedgerRange::single(100));
        assert_eq!(config.limit(), -1);
    }

    #[test]
    fn test_named_network_with_range_and_limit() {
        let config = EnvConfig::from_vars(vars(&[
            ("LEDGER_NETWORK", "testnet"),
            ("LEDGER_START_LEDGER", "100"),
            ("LEDGER_END_LEDGER", "200"),
            ("LEDGER_LIMIT", "10"),
        ]))
        .unwrap();

        assert_eq!(config.network().unwrap(), Network::testnet());
        assert_eq!(config.range().unwrap(), LedgerRange::new(100, 200).unwrap());
        assert_eq!(config.limit(), 10);
    }

    #[test]
    fn test_archive_urls_override() {
        let config = EnvConfig::from_vars(vars(&[
            ("LEDGER_NETWORK", "futurenet"),
            (
                "LEDGER_ARCHIVE_URLS",
                "https://a.example.com/,https://b.example.com/",
            ),
            ("LEDGER_START_LEDGER", "1"),
        ]))
        .unwrap();

        let network = config.network().unwrap();
        assert_eq!(network.passphrase(), Network::futurenet().passphrase());
        assert_eq!(network.archive_urls().len(), 2);
        assert_eq!(network.archive_urls()[1].host_str(), Some("b.example.com"));
    }

    #[test]
    fn test_custom_network_requires_archives() {
        let config = EnvConfig::from_vars(vars(&[
            ("LEDGER_NETWORK_PASSPHRASE", "Standalone Network ; February 2017"),
            ("LEDGER_START_LEDGER", "1"),
        ]))
        .unwrap();
        assert!(matches!(
            config.network(),
            Err(ConfigError::MissingArchiveUrls)
        ));

        let config = EnvConfig::from_vars(vars(&[
            ("LEDGER_NETWORK_PASSPHRASE", "Standalone Network ; February 2017"),
            ("LEDGER_ARCHIVE_URLS", "http://localhost:1570/"),
            ("LEDGER_START_LEDGER", "1"),
        ]))
        .unwrap();
        let network = config.network().unwrap();
        assert_eq!(network.passphrase(), "Standalone Network ; February 2017");
        assert_eq!(network.archive_urls().len(), 1);
    }

    #[test]
    fn test_invalid_range() {
        let config = EnvConfig::from_vars(vars(&[
            ("LEDGER_START_LEDGER", "10"),
            ("LEDGER_END_LEDGER", "5"),
        ]))
        .unwrap();
        assert!(matches!(
            config.range(),
            Err(ConfigError::InvalidRange(FetchError::InvalidRange {
                start: 10,
                end: 5
            }))
        ));
    }

    #[test]
    fn test_missing_start_ledger() {
        assert!(matches!(
            EnvConfig::from_vars(vars(&[("LEDGER_NETWORK", "testnet")])),
            Err(ConfigError::Env(_))
        ));
    }
}
