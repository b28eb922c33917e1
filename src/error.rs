use thiserror::Error;

use crate::{
    toid::ToidError,
    types::LedgerSequence,
    xdr::{ClaimAtomType, Hash, OperationType},
};

/// Boxed error coming from a Ledger Data Provider implementation.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error fetching transactions from the Ledger Data Provider.
///
/// Fatal to the whole fetch; nothing is retried internally.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid ledger range: start {start} is after end {end}")]
    InvalidRange {
        start: LedgerSequence,
        end: LedgerSequence,
    },

    #[error("failed to open ledger backend for {start}..={end}: {source}")]
    Backend {
        start: LedgerSequence,
        end: LedgerSequence,
        source: ProviderError,
    },

    #[error("failed to open transaction reader for ledger {sequence}: {source}")]
    OpenReader {
        sequence: LedgerSequence,
        source: ProviderError,
    },

    #[error("failed to read transaction from ledger {sequence}: {source}")]
    Read {
        sequence: LedgerSequence,
        source: ProviderError,
    },
}

/// Claim failing the trade sanity checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimViolation {
    #[error("offer ID is negative ({0})")]
    NegativeOfferId(i64),

    #[error("amount sold is negative ({0})")]
    NegativeAmountSold(i64),

    #[error("amount bought is negative ({0})")]
    NegativeAmountBought(i64),

    #[error("both base and counter amount are 0")]
    ZeroAmounts,
}

/// Claim atom of a variant the normalizer has no canonical mapping for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("claim {claim_index} has unsupported variant {variant}")]
pub struct UnknownClaimVariant {
    pub claim_index: usize,
    pub variant: ClaimAtomType,
}

/// Error extracting trades from a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    #[error("could not get any results from transaction {tx_hash} (ledger {ledger_sequence})")]
    NoResults {
        ledger_sequence: LedgerSequence,
        tx_hash: Hash,
    },

    #[error("transaction {tx_hash} (ledger {ledger_sequence}) failed; no trades")]
    TransactionFailed {
        ledger_sequence: LedgerSequence,
        tx_hash: Hash,
    },

    #[error("operation index {operation_index} is out of bounds ({len} {what})")]
    OperationOutOfRange {
        operation_index: usize,
        len: usize,
        what: &'static str,
    },

    #[error(
        "operation of type {operation_type} at index {operation_index} does not result in trades"
    )]
    UnsupportedOperation {
        operation_index: usize,
        operation_type: OperationType,
    },

    #[error("could not get {expected} for {operation_type} operation at index {operation_index}")]
    DecodeShape {
        operation_index: usize,
        operation_type: OperationType,
        expected: &'static str,
    },

    #[error("could not normalize claims of operation at index {operation_index}: {source}")]
    UnknownOfferVariant {
        operation_index: usize,
        source: UnknownClaimVariant,
    },

    #[error("invalid claim {claim_index} of operation at index {operation_index}: {violation}")]
    Validation {
        operation_index: usize,
        claim_index: usize,
        violation: ClaimViolation,
    },

    #[error("could not build TOID-based ID for operation at index {operation_index}: {source}")]
    Toid {
        operation_index: usize,
        source: ToidError,
    },
}

impl TradeError {
    /// Whether the error only means "no trades here" rather than bad data.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            TradeError::TransactionFailed { .. } | TradeError::UnsupportedOperation { .. }
        )
    }
}
