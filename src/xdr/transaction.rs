use std::fmt;

use super::{MuxedAccount, OperationResult, OperationType, ResultCode};

/// 32-byte SHA-256 hash (transaction or ledger).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash(pub [u8; 32]);

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Header of a closed ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerHeader {
    pub hash: Hash,
    pub sequence: u32,
    pub protocol_version: u32,
    /// Close time, unix seconds.
    pub close_time: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub r#type: OperationType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEnvelope {
    /// Source account of the (inner, for fee bumps) transaction.
    pub source_account: MuxedAccount,
    pub operations: Vec<Operation>,
}

/// Outcome of applying a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionOutcome {
    Success(Vec<OperationResult>),
    Failed(Vec<OperationResult>),
    FeeBumpInnerSuccess(Vec<OperationResult>),
    FeeBumpInnerFailed(Vec<OperationResult>),
    /// Rejected before operations were applied; no per-operation results.
    Rejected(ResultCode),
}

impl TransactionOutcome {
    /// Per-operation results, if the outcome carries them.
    pub fn operation_results(&self) -> Option<&[OperationResult]> {
        match self {
            TransactionOutcome::Success(results)
            | TransactionOutcome::Failed(results)
            | TransactionOutcome::FeeBumpInnerSuccess(results)
            | TransactionOutcome::FeeBumpInnerFailed(results) => Some(results),
            TransactionOutcome::Rejected(_) => None,
        }
    }

    pub fn successful(&self) -> bool {
        matches!(
            self,
            TransactionOutcome::Success(_) | TransactionOutcome::FeeBumpInnerSuccess(_)
        )
    }
}

/// Transaction as read from a ledger, along with its outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerTransaction {
    /// 1-based application order within the ledger.
    pub index: u32,
    pub hash: Hash,
    pub envelope: TransactionEnvelope,
    pub fee_charged: i64,
    pub outcome: TransactionOutcome,
}
