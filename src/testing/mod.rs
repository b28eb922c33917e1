//! In-memory Ledger Data Provider and test utilities.
//!
//! [`MemoryProvider`] serves ledgers registered with [`MemoryProvider::with_ledger`] and records
//! every backend, reader open and reader close, so tests can check that readers are released and
//! ledgers past a limit are never touched. Failures can be injected per backend or per transaction.
//!
//! [`TransactionBuilder`] provides a convenient way to create transactions with controlled
//! operation results, while the free functions build claims, offers and operation results.
//!

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use thiserror::Error;
use url::Url;

use crate::{
    provider::{LedgerBackend, LedgerDataProvider, TransactionReader},
    types::{LedgerRange, LedgerSequence, TransactionRecord},
    xdr::{
        AccountId, Asset, ClaimAtom, ClaimLiquidityAtom, ClaimOfferAtom, ClaimOfferAtomV0, Hash,
        LedgerHeader, LedgerTransaction, ManageOfferEffect, ManageOfferResult,
        ManageOfferSuccessResult, MuxedAccount, OfferEntry, Operation, OperationResult,
        OperationResultTr, OperationType, PathPaymentResult, PathPaymentSuccess, Price,
        PublicKey, SimplePaymentResult, TransactionEnvelope, TransactionOutcome,
    },
};

const PROTOCOL_VERSION: u32 = 19;
const BASE_FEE: i64 = 100;
const ISSUER: [u8; 32] = [9; 32];
const DESTINATION: [u8; 32] = [8; 32];

/// Ledger served by [`MemoryProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryLedger {
    pub header: LedgerHeader,
    pub transactions: Vec<LedgerTransaction>,
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("no archive URLs given")]
    NoArchives,

    #[error("backend unavailable")]
    BackendUnavailable,

    #[error("ledger {0} is outside of the backend range")]
    OutOfRange(LedgerSequence),

    #[error("ledger {0} is not in the archive")]
    MissingLedger(LedgerSequence),

    #[error("transaction at position {position} of ledger {sequence} is corrupted")]
    CorruptTransaction {
        sequence: LedgerSequence,
        position: usize,
    },
}

#[derive(Debug, Default)]
struct ActivityLog {
    backends: Vec<LedgerRange>,
    passphrases: Vec<String>,
    opened: Vec<LedgerSequence>,
    closed: Vec<LedgerSequence>,
}

/// Ledger Data Provider serving ledgers from memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    ledgers: BTreeMap<LedgerSequence, MemoryLedger>,
    read_failures: HashMap<LedgerSequence, usize>,
    backend_failure: bool,
    log: Arc<Mutex<ActivityLog>>,
}

/// Backend of [`MemoryProvider`], optionally bound to a ledger range.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    range: Option<LedgerRange>,
    ledgers: BTreeMap<LedgerSequence, MemoryLedger>,
    read_failures: HashMap<LedgerSequence, usize>,
    log: Arc<Mutex<ActivityLog>>,
}

#[derive(Debug)]
pub struct MemoryReader {
    header: LedgerHeader,
    transactions: Vec<LedgerTransaction>,
    position: usize,
    fail_at: Option<usize>,
    log: Arc<Mutex<ActivityLog>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a ledger. Ledgers never added are missing from the archive.
    pub fn with_ledger(mut self, ledger: MemoryLedger) -> Self {
        self.ledgers.insert(ledger.header.sequence, ledger);
        self
    }

    /// Makes reading the transaction at `position` (0-based) of the ledger fail.
    pub fn with_read_failure(mut self, sequence: LedgerSequence, position: usize) -> Self {
        self.read_failures.insert(sequence, position);
        self
    }

    /// Makes opening a backend fail.
    pub fn failing_backend(mut self) -> Self {
        self.backend_failure = true;
        self
    }

    /// Backend serving every registered ledger, without opening it through the provider.
    pub fn backend(&self) -> MemoryBackend {
        self.backend_for(None)
    }

    fn backend_for(&self, range: Option<LedgerRange>) -> MemoryBackend {
        MemoryBackend {
            range,
            ledgers: self.ledgers.clone(),
            read_failures: self.read_failures.clone(),
            log: self.log.clone(),
        }
    }

    /// Ranges of the backends opened so far.
    pub fn backends(&self) -> Vec<LedgerRange> {
        self.log.lock().unwrap().backends.clone()
    }

    /// Network passphrases readers were opened with.
    pub fn passphrases(&self) -> Vec<String> {
        self.log.lock().unwrap().passphrases.clone()
    }

    /// Ledgers readers were opened for, in opening order.
    pub fn opened(&self) -> Vec<LedgerSequence> {
        self.log.lock().unwrap().opened.clone()
    }

    /// Ledgers readers were closed for, in closing order.
    pub fn closed(&self) -> Vec<LedgerSequence> {
        self.log.lock().unwrap().closed.clone()
    }
}

impl LedgerDataProvider for MemoryProvider {
    type Backend = MemoryBackend;
    type Error = MemoryError;

    async fn open_backend(
        &self,
        archive_urls: &[Url],
        range: LedgerRange,
    ) -> Result<Self::Backend, Self::Error> {
        if archive_urls.is_empty() {
            return Err(MemoryError::NoArchives);
        }
        self.log.lock().unwrap().backends.push(range);
        if self.backend_failure {
            return Err(MemoryError::BackendUnavailable);
        }
        Ok(self.backend_for(Some(range)))
    }
}

impl LedgerBackend for MemoryBackend {
    type Reader = MemoryReader;
    type Error = MemoryError;

    async fn transaction_reader(
        &self,
        network_passphrase: &str,
        sequence: LedgerSequence,
    ) -> Result<Self::Reader, Self::Error> {
        if self.range.is_some_and(|range| !range.contains(sequence)) {
            return Err(MemoryError::OutOfRange(sequence));
        }
        let ledger = self
            .ledgers
            .get(&sequence)
            .ok_or(MemoryError::MissingLedger(sequence))?;

        let mut log = self.log.lock().unwrap();
        log.passphrases.push(network_passphrase.to_string());
        log.opened.push(sequence);

        Ok(MemoryReader {
            header: ledger.header.clone(),
            transactions: ledger.transactions.clone(),
            position: 0,
            fail_at: self.read_failures.get(&sequence).copied(),
            log: self.log.clone(),
        })
    }
}

impl TransactionReader for MemoryReader {
    type Error = MemoryError;

    fn header(&self) -> &LedgerHeader {
        &self.header
    }

    async fn read(&mut self) -> Result<Option<LedgerTransaction>, Self::Error> {
        if self.fail_at == Some(self.position) {
            return Err(MemoryError::CorruptTransaction {
                sequence: self.header.sequence,
                position: self.position,
            });
        }
        let transaction = self.transactions.get(self.position).cloned();
        if transaction.is_some() {
            self.position += 1;
        }
        Ok(transaction)
    }

    fn close(&mut self) {
        self.log.lock().unwrap().closed.push(self.header.sequence);
    }
}

/// Header of ledger `sequence` closed at `close_time` (unix seconds).
pub fn header(sequence: LedgerSequence, close_time: u64) -> LedgerHeader {
    let mut hash = [0u8; 32];
    hash[..4].copy_from_slice(&sequence.to_be_bytes());
    LedgerHeader {
        hash: Hash(hash),
        sequence,
        protocol_version: PROTOCOL_VERSION,
        close_time,
    }
}

/// Ledger `sequence` with `transactions` successful sell offers, each claiming one offer.
///
/// Offer IDs are `sequence * 100 + index`, index being the 1-based application order.
pub fn ledger(sequence: LedgerSequence, transactions: u32) -> MemoryLedger {
    let header = header(sequence, 1_600_000_000 + u64::from(sequence) * 5);
    let transactions = (1..=transactions)
        .map(|index| {
            let offer_id = i64::from(sequence) * 100 + i64::from(index);
            let mut hash = [0u8; 32];
            hash[..4].copy_from_slice(&sequence.to_be_bytes());
            hash[4..8].copy_from_slice(&index.to_be_bytes());

            TransactionBuilder::new(MuxedAccount::Ed25519([7; 32]))
                .index(index)
                .hash(Hash(hash))
                .operation(
                    OperationType::ManageSellOffer,
                    manage_sell_result(
                        vec![claim(1, offer_id, 100, 200)],
                        ManageOfferEffect::Deleted,
                    ),
                )
                .build()
        })
        .collect();

    MemoryLedger {
        header,
        transactions,
    }
}

/// `USD` credit asset of a fixed issuer.
pub fn usd() -> Asset {
    Asset::credit("USD", AccountId::from_ed25519(ISSUER)).unwrap()
}

/// Order book claim of `seller` selling `amount_sold` USD for `amount_bought` native.
pub fn claim(seller: u8, offer_id: i64, amount_sold: i64, amount_bought: i64) -> ClaimAtom {
    ClaimAtom::OrderBook(ClaimOfferAtom {
        seller_id: AccountId::from_ed25519([seller; 32]),
        offer_id,
        asset_sold: usd(),
        amount_sold,
        asset_bought: Asset::Native,
        amount_bought,
    })
}

/// Same as [`claim`] in the pre-protocol 18 encoding.
pub fn v0_claim(seller: u8, offer_id: i64, amount_sold: i64, amount_bought: i64) -> ClaimAtom {
    ClaimAtom::V0(ClaimOfferAtomV0 {
        seller_ed25519: [seller; 32],
        offer_id,
        asset_sold: usd(),
        amount_sold,
        asset_bought: Asset::Native,
        amount_bought,
    })
}

pub fn pool_claim(amount_sold: i64, amount_bought: i64) -> ClaimAtom {
    ClaimAtom::LiquidityPool(ClaimLiquidityAtom {
        liquidity_pool_id: [5; 32],
        asset_sold: usd(),
        amount_sold,
        asset_bought: Asset::Native,
        amount_bought,
    })
}

/// Offer of `seller` resting on the book, selling USD for native.
pub fn offer_entry(seller: u8, offer_id: i64) -> OfferEntry {
    OfferEntry {
        seller_id: AccountId::from_ed25519([seller; 32]),
        offer_id,
        selling: usd(),
        buying: Asset::Native,
        amount: 1_000,
        price: Price { n: 2, d: 1 },
        flags: 0,
    }
}

pub fn manage_offer_success(
    claims: Vec<ClaimAtom>,
    effect: ManageOfferEffect,
) -> ManageOfferResult {
    ManageOfferResult::Success(ManageOfferSuccessResult {
        offers_claimed: claims,
        offer: effect,
    })
}

pub fn manage_sell_result(claims: Vec<ClaimAtom>, effect: ManageOfferEffect) -> OperationResult {
    OperationResult::Inner(OperationResultTr::ManageSellOffer(manage_offer_success(
        claims, effect,
    )))
}

pub fn path_payment_strict_send_result(claims: Vec<ClaimAtom>) -> OperationResult {
    OperationResult::Inner(OperationResultTr::PathPaymentStrictSend(path_payment_success(claims)))
}

pub fn path_payment_strict_receive_result(claims: Vec<ClaimAtom>) -> OperationResult {
    OperationResult::Inner(OperationResultTr::PathPaymentStrictReceive(
        path_payment_success(claims),
    ))
}

fn path_payment_success(claims: Vec<ClaimAtom>) -> PathPaymentResult {
    let amount = claims
        .iter()
        .map(|atom| match atom {
            ClaimAtom::V0(claim) => claim.amount_bought,
            ClaimAtom::OrderBook(claim) => claim.amount_bought,
            ClaimAtom::LiquidityPool(claim) => claim.amount_bought,
        })
        .sum();
    PathPaymentResult::Success(PathPaymentSuccess {
        offers: claims,
        last: SimplePaymentResult {
            destination: AccountId::from_ed25519(DESTINATION),
            asset: Asset::Native,
            amount,
        },
    })
}

/// Builder for test transactions.
///
/// # Example
///
/// ```
/// use trade_etl::testing::{self, TransactionBuilder};
/// use trade_etl::xdr::{ManageOfferEffect, MuxedAccount, OperationType};
///
/// let record = TransactionBuilder::new(MuxedAccount::Ed25519([7; 32]))
///     .index(2)
///     .operation(
///         OperationType::ManageSellOffer,
///         testing::manage_sell_result(
///             vec![testing::claim(1, 10, 100, 200)],
///             ManageOfferEffect::Deleted,
///         ),
///     )
///     .record(testing::header(50, 1_600_000_000));
/// assert_eq!(record.ledger_sequence(), 50);
/// ```
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    source_account: MuxedAccount,
    index: u32,
    hash: Option<Hash>,
    operations: Vec<Operation>,
    results: Vec<OperationResult>,
    failed: bool,
    fee_bump: bool,
}

impl TransactionBuilder {
    /// Successful transaction at index 1 with no operations.
    pub fn new(source_account: MuxedAccount) -> Self {
        Self {
            source_account,
            index: 1,
            hash: None,
            operations: Vec::new(),
            results: Vec::new(),
            failed: false,
            fee_bump: false,
        }
    }

    /// Set the 1-based application order within the ledger.
    pub fn index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    pub fn hash(mut self, hash: Hash) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Append an operation along with its result.
    pub fn operation(mut self, r#type: OperationType, result: OperationResult) -> Self {
        self.operations.push(Operation { r#type });
        self.results.push(result);
        self
    }

    /// Mark the transaction failed; operation results are kept.
    pub fn failed(mut self) -> Self {
        self.failed = true;
        self
    }

    /// Wrap the transaction in a fee bump.
    pub fn fee_bump(mut self) -> Self {
        self.fee_bump = true;
        self
    }

    pub fn build(self) -> LedgerTransaction {
        let hash = self.hash.unwrap_or_else(|| {
            let AccountId(PublicKey::Ed25519(key)) = self.source_account.account_id();
            let mut hash = [0u8; 32];
            hash[..4].copy_from_slice(&self.index.to_be_bytes());
            hash[4..].copy_from_slice(&key[..28]);
            Hash(hash)
        });
        let results = self.results;
        let outcome = match (self.fee_bump, self.failed) {
            (false, false) => TransactionOutcome::Success(results),
            (false, true) => TransactionOutcome::Failed(results),
            (true, false) => TransactionOutcome::FeeBumpInnerSuccess(results),
            (true, true) => TransactionOutcome::FeeBumpInnerFailed(results),
        };
        let fee_charged = BASE_FEE * (self.operations.len().max(1) as i64);

        LedgerTransaction {
            index: self.index,
            hash,
            envelope: TransactionEnvelope {
                source_account: self.source_account,
                operations: self.operations,
            },
            fee_charged,
            outcome,
        }
    }

    /// Build the transaction as applied in the ledger of `header`.
    pub fn record(self, header: LedgerHeader) -> TransactionRecord {
        TransactionRecord::new(self.build(), header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reader_drains_ledger() {
        let provider = MemoryProvider::new().with_ledger(ledger(5, 2));
        let backend = provider.backend();

        let mut reader = backend.transaction_reader("passphrase", 5).await.unwrap();
        assert_eq!(reader.header().sequence, 5);
        assert_eq!(reader.read().await.unwrap().unwrap().index, 1);
        assert_eq!(reader.read().await.unwrap().unwrap().index, 2);
        assert!(reader.read().await.unwrap().is_none());
        reader.close();

        assert_eq!(provider.opened(), vec![5]);
        assert_eq!(provider.closed(), vec![5]);
        assert_eq!(provider.passphrases(), vec!["passphrase".to_string()]);
    }

    #[tokio::test]
    async fn test_backend_is_bound_to_range() {
        let provider = MemoryProvider::new()
            .with_ledger(ledger(5, 1))
            .with_ledger(ledger(6, 1));
        let urls = vec![Url::parse("https://archive.example.com/").unwrap()];
        let range = LedgerRange::single(5);

        let backend = provider.open_backend(&urls, range).await.unwrap();
        assert!(backend.transaction_reader("p", 5).await.is_ok());
        assert!(matches!(
            backend.transaction_reader("p", 6).await,
            Err(MemoryError::OutOfRange(6))
        ));
        assert!(matches!(
            provider.open_backend(&[], range).await,
            Err(MemoryError::NoArchives)
        ));
        assert_eq!(provider.backends(), vec![range]);
    }

    #[test]
    fn test_transaction_builder_outcomes() {
        let source = MuxedAccount::Ed25519([7; 32]);
        assert!(TransactionBuilder::new(source).build().outcome.successful());
        assert!(TransactionBuilder::new(source).fee_bump().build().outcome.successful());
        assert!(!TransactionBuilder::new(source).failed().build().outcome.successful());
        assert!(
            !TransactionBuilder::new(source)
                .fee_bump()
                .failed()
                .build()
                .outcome
                .successful()
        );
    }

    #[tokio::test]
    async fn test_reader_passes_wire_fields_through() {
        let provider = MemoryProvider::new().with_ledger(ledger(5, 1));
        let backend = provider.backend();

        let mut reader = backend.transaction_reader("passphrase", 5).await.unwrap();
        let header = reader.header().clone();
        assert_eq!(header.protocol_version, PROTOCOL_VERSION);
        assert_eq!(header.hash.0[..4], 5u32.to_be_bytes());

        let transaction = reader.read().await.unwrap().unwrap();
        assert_eq!(transaction.fee_charged, BASE_FEE);
        let record = TransactionRecord::new(transaction, header);
        assert_eq!(record.header.protocol_version, PROTOCOL_VERSION);
        assert_eq!(record.transaction.fee_charged, BASE_FEE);

        let offer = offer_entry(7, 10);
        assert_eq!((offer.price.n, offer.price.d, offer.flags), (2, 1, 0));
    }
}
