//! Trade extraction from operation results.
//!
//! Offer crossing operations (manage buy/sell offers, passive sell offers
//! and path payments) record every offer they claimed in their result.
//! Each claim becomes one [`TradeOutput`].
//!
//! # Architecture
//!
//! - [`claim`] - Normalizes versioned claim atoms into [`ClaimedOffer`]
//! - [`decoder`] - Picks claims and the resting offer out of the result union
//! - [`extract_trades`] - Validates claims and builds trades for one operation
//! - [`transaction_trades`] - Runs the extraction over every operation of a transaction
//!
//! # Example
//!
//! ```ignore
//! use trade_etl::{fetch, trade, types::LedgerRange, Network};
//!
//! let range = LedgerRange::new(start, end)?;
//! let records = fetch::fetch(&provider, &Network::pubnet(), range, -1).await?;
//! for record in &records {
//!     for t in trade::transaction_trades(record)? {
//!         println!("{} {} for {} {}",
//!             t.base_amount, t.base_asset_code, t.counter_amount, t.counter_asset_code
//!         );
//!     }
//! }
//! ```

pub mod claim;
pub mod decoder;
mod extract;
mod types;

pub use extract::extract_trades;
pub use types::{ClaimedOffer, DecodedClaims, TradeOutput};

use itertools::Itertools;
use tracing::{trace, warn};

use crate::{error::TradeError, toid::Toid, types::TransactionRecord};

/// Extracts trades of every offer crossing operation of the transaction,
/// in operation then claim order.
///
/// Failed transactions produce no trades. Operations that fail to decode or
/// validate abort the extraction and are logged, as dropping them would
/// silently lose trades.
pub fn transaction_trades(record: &TransactionRecord) -> Result<Vec<TradeOutput>, TradeError> {
    let transaction = &record.transaction;
    let ledger_sequence = record.ledger_sequence();

    if !transaction.outcome.successful() {
        trace!(ledger_sequence, tx_hash = %transaction.hash, "skipping failed transaction");
        return Ok(Vec::new());
    }

    transaction
        .envelope
        .operations
        .iter()
        .enumerate()
        .filter(|(_, operation)| operation.r#type.can_trade())
        .map(|(operation_index, _)| {
            let operation_id = Toid::new(
                ledger_sequence,
                transaction.index,
                u32::try_from(operation_index).unwrap_or(u32::MAX),
            )
            .map_err(|source| TradeError::Toid {
                operation_index,
                source,
            })?;

            extract_trades(
                operation_index,
                operation_id.to_i64(),
                record,
                record.ledger_close_time(),
            )
            .inspect_err(|err| {
                warn!(
                    ledger_sequence,
                    tx_hash = %transaction.hash,
                    operation_index,
                    %err,
                    "failed to extract trades"
                )
            })
        })
        .flatten_ok()
        .collect()
}
