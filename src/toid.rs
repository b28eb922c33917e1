//! Total order IDs.
//!
//! A TOID packs the position of an operation in ledger history into a
//! single `i64`: ledger sequence in the high 32 bits, 1-based transaction
//! application order in the next 20 bits and operation order in the low 12
//! bits. Sorting by TOID sorts by history order.

use thiserror::Error;

const LEDGER_SHIFT: u32 = 32;
const TRANSACTION_SHIFT: u32 = 12;

const TRANSACTION_MASK: u32 = (1 << 20) - 1;
const OPERATION_MASK: u32 = (1 << 12) - 1;

/// The two high bits of an offer ID are reserved for [`OfferIdType`].
const OFFER_ID_TYPE_MASK: u64 = 0xC000_0000_0000_0000;
const OFFER_ID_TYPE_SHIFT: u32 = 62;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToidError {
    #[error("ledger sequence {0} does not fit into a TOID")]
    LedgerOutOfRange(u32),

    #[error("transaction order {0} does not fit into a TOID")]
    TransactionOutOfRange(u32),

    #[error("operation order {0} does not fit into a TOID")]
    OperationOutOfRange(u32),

    #[error("ID {0} overlaps offer ID type bits")]
    OfferIdOutOfRange(i64),

    #[error("operation ID {0} has no successor")]
    OperationIdOverflow(i64),
}

/// Position of an operation in ledger history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Toid {
    ledger_sequence: u32,
    transaction_order: u32,
    operation_order: u32,
}

impl Toid {
    pub fn new(
        ledger_sequence: u32,
        transaction_order: u32,
        operation_order: u32,
    ) -> Result<Self, ToidError> {
        if ledger_sequence > i32::MAX as u32 {
            return Err(ToidError::LedgerOutOfRange(ledger_sequence));
        }
        if transaction_order > TRANSACTION_MASK {
            return Err(ToidError::TransactionOutOfRange(transaction_order));
        }
        if operation_order > OPERATION_MASK {
            return Err(ToidError::OperationOutOfRange(operation_order));
        }
        Ok(Self {
            ledger_sequence,
            transaction_order,
            operation_order,
        })
    }

    pub fn ledger_sequence(&self) -> u32 {
        self.ledger_sequence
    }

    pub fn transaction_order(&self) -> u32 {
        self.transaction_order
    }

    pub fn operation_order(&self) -> u32 {
        self.operation_order
    }

    pub fn to_i64(&self) -> i64 {
        ((self.ledger_sequence as i64) << LEDGER_SHIFT)
            | ((self.transaction_order as i64) << TRANSACTION_SHIFT)
            | self.operation_order as i64
    }
}

impl From<Toid> for i64 {
    fn from(value: Toid) -> Self {
        value.to_i64()
    }
}

/// Origin of an offer ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OfferIdType {
    /// ID assigned by the ledger to an offer on the book.
    CoreOffer = 0,
    /// ID synthesized from the TOID of the operation.
    Toid = 1,
}

/// Tags `id` with its origin in the two high bits.
pub fn encode_offer_id(id: i64, r#type: OfferIdType) -> Result<i64, ToidError> {
    if id < 0 || (id as u64) & OFFER_ID_TYPE_MASK != 0 {
        return Err(ToidError::OfferIdOutOfRange(id));
    }
    Ok((id as u64 | (r#type as u64) << OFFER_ID_TYPE_SHIFT) as i64)
}

/// Splits an encoded offer ID into the original ID and its origin.
pub fn decode_offer_id(encoded: i64) -> (i64, OfferIdType) {
    let raw = encoded as u64;
    let r#type = if (raw & OFFER_ID_TYPE_MASK) >> OFFER_ID_TYPE_SHIFT == OfferIdType::Toid as u64 {
        OfferIdType::Toid
    } else {
        OfferIdType::CoreOffer
    };
    ((raw & !OFFER_ID_TYPE_MASK) as i64, r#type)
}
