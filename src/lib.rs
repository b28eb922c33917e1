//! Ledger trade extraction.
//!
//! # Overview
//!
//! Extracts trades from the results of historical ledger transactions, for
//! downstream analytical storage.
//!
//! Use [`fetch::fetch`] (or [`stream::transactions`]) to read transactions of
//! a ledger range from a [`provider::LedgerDataProvider`], then
//! [`trade::extract_trades`] per offer crossing operation, or
//! [`trade::transaction_trades`] per transaction, to get the
//! [`trade::TradeOutput`]s.
//!
//! # Limitations/follow-ups
//!
//! * Liquidity pool claims are rejected rather than turned into trades.
//!
//! * The counter account of a trade is the transaction source account, even
//!   when the operation overrides its source.
//!
//! # Testing
//!
//! [`testing`] module provides an in-memory Ledger Data Provider along with
//! builders for ledgers, transactions and operation results.

pub mod config;
pub mod error;
pub mod fetch;
pub mod provider;
pub mod stream;
pub mod testing;
pub mod toid;
pub mod trade;
pub mod types;
pub mod xdr;

use url::Url;

const PUBNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

const PUBNET_ARCHIVES: &[&str] = &[
    "https://history.stellar.org/prd/core-live/core_live_001/",
    "https://history.stellar.org/prd/core-live/core_live_002/",
    "https://history.stellar.org/prd/core-live/core_live_003/",
];
const TESTNET_ARCHIVES: &[&str] = &[
    "https://history.stellar.org/prd/core-testnet/core_testnet_001/",
    "https://history.stellar.org/prd/core-testnet/core_testnet_002/",
    "https://history.stellar.org/prd/core-testnet/core_testnet_003/",
];
const FUTURENET_ARCHIVES: &[&str] = &["https://history-futurenet.stellar.org/"];

#[derive(Clone, Debug, PartialEq, Eq)]
/// Network the ledgers are read from.
pub struct Network {
    passphrase: String,
    archive_urls: Vec<Url>,
}

impl Network {
    pub fn pubnet() -> Self {
        Self::well_known(PUBNET_PASSPHRASE, PUBNET_ARCHIVES)
    }

    pub fn testnet() -> Self {
        Self::well_known(TESTNET_PASSPHRASE, TESTNET_ARCHIVES)
    }

    pub fn futurenet() -> Self {
        Self::well_known(FUTURENET_PASSPHRASE, FUTURENET_ARCHIVES)
    }

    pub fn custom(passphrase: impl Into<String>, archive_urls: Vec<Url>) -> Self {
        Self {
            passphrase: passphrase.into(),
            archive_urls,
        }
    }

    fn well_known(passphrase: &str, archives: &[&str]) -> Self {
        Self {
            passphrase: passphrase.to_string(),
            archive_urls: archives
                .iter()
                .map(|url| Url::parse(url).expect("well-known archive URL"))
                .collect(),
        }
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn archive_urls(&self) -> &[Url] {
        &self.archive_urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_networks() {
        let pubnet = Network::pubnet();
        assert_eq!(pubnet.passphrase(), PUBNET_PASSPHRASE);
        assert_eq!(pubnet.archive_urls().len(), 3);

        let testnet = Network::testnet();
        assert_eq!(testnet.passphrase(), TESTNET_PASSPHRASE);
        assert_eq!(
            testnet.archive_urls()[0].host_str(),
            Some("history.stellar.org")
        );

        assert_eq!(Network::futurenet().archive_urls().len(), 1);
    }
}
