//! Typed view of the ledger's wire unions.
//!
//! The Ledger Data Provider hands transactions over already decoded into
//! these types; each tagged union of the ledger protocol maps onto a closed
//! Rust enum, so new protocol arms are added as new variants rather than by
//! loosening an existing one.
//!
//! Only the parts of the protocol the trade extraction reads are modelled in
//! detail. Operation results of types that never produce trades are kept as
//! an opaque [`OperationResultTr::Other`] arm.
//!
//! Some fields are carried without being read here: the ledger hash and
//! protocol version of [`LedgerHeader`], [`LedgerTransaction::fee_charged`],
//! and the price and flags of [`OfferEntry`]. They reach consumers of
//! [`crate::types::TransactionRecord`] unchanged.

mod account;
mod asset;
mod offer;
mod result;
pub mod strkey;
mod transaction;

pub use account::{AccountId, MuxedAccount, PublicKey};
pub use asset::{Asset, AssetTriple};
pub use offer::{
    ClaimAtom, ClaimAtomType, ClaimLiquidityAtom, ClaimOfferAtom, ClaimOfferAtomV0, OfferEntry,
    Price,
};
pub use result::{
    ManageOfferEffect, ManageOfferSuccessResult, ManageOfferResult, OperationResult,
    OperationResultTr, OperationType, PathPaymentResult, PathPaymentSuccess, ResultCode,
    SimplePaymentResult,
};
pub use transaction::{
    Hash, LedgerHeader, LedgerTransaction, Operation, TransactionEnvelope, TransactionOutcome,
};
