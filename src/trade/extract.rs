//! Trade extraction from a single operation.

use super::{
    decoder,
    types::{ClaimedOffer, TradeOutput},
};
use crate::{
    error::{ClaimViolation, TradeError},
    toid::{self, OfferIdType, ToidError},
    types::TransactionRecord,
};

/// Builds one [`TradeOutput`] per offer claimed by the operation at
/// `operation_index` of the transaction.
///
/// `operation_id` is the TOID of the operation; trades carry it incremented
/// by one as their history operation ID. Any invalid claim fails the whole
/// operation, no partial trade list is returned.
pub fn extract_trades(
    operation_index: usize,
    operation_id: i64,
    record: &TransactionRecord,
    ledger_close_time: u64,
) -> Result<Vec<TradeOutput>, TradeError> {
    let transaction = &record.transaction;

    let results = transaction
        .outcome
        .operation_results()
        .ok_or(TradeError::NoResults {
            ledger_sequence: record.ledger_sequence(),
            tx_hash: transaction.hash,
        })?;

    if !transaction.outcome.successful() {
        return Err(TradeError::TransactionFailed {
            ledger_sequence: record.ledger_sequence(),
            tx_hash: transaction.hash,
        });
    }

    let operations = &transaction.envelope.operations;
    let operation = operations
        .get(operation_index)
        .ok_or(TradeError::OperationOutOfRange {
            operation_index,
            len: operations.len(),
            what: "operations",
        })?;

    // Kept in sync with operation IDs of the history ingestion
    let history_operation_id = operation_id.checked_add(1).ok_or(TradeError::Toid {
        operation_index,
        source: ToidError::OperationIdOverflow(operation_id),
    })?;

    let decoded = decoder::decode(results, operation_index, operation.r#type)?;

    let counter_offer_id = match &decoded.counter_offer {
        Some(offer) => offer.offer_id,
        None => toid::encode_offer_id(operation_id, OfferIdType::Toid).map_err(|source| {
            TradeError::Toid {
                operation_index,
                source,
            }
        })?,
    };

    let counter_account_address = transaction.envelope.source_account.address();

    decoded
        .claimed_offers
        .iter()
        .enumerate()
        .map(|(claim_index, claim)| {
            let trade = TradeContext {
                order: claim_index as u32,
                ledger_close_time,
                counter_account_address: &counter_account_address,
                counter_offer_id,
                history_operation_id,
            };
            trade.build(claim).map_err(|violation| TradeError::Validation {
                operation_index,
                claim_index,
                violation,
            })
        })
        .collect()
}

/// Per-claim values resolved from the operation rather than the claim.
struct TradeContext<'a> {
    order: u32,
    ledger_close_time: u64,
    counter_account_address: &'a str,
    counter_offer_id: i64,
    history_operation_id: i64,
}

impl TradeContext<'_> {
    fn build(&self, claim: &ClaimedOffer) -> Result<TradeOutput, ClaimViolation> {
        if claim.offer_id < 0 {
            return Err(ClaimViolation::NegativeOfferId(claim.offer_id));
        }

        let base_asset = claim.asset_sold.triple();
        let base_amount = claim.amount_sold;
        if base_amount < 0 {
            return Err(ClaimViolation::NegativeAmountSold(base_amount));
        }

        let counter_asset = claim.asset_bought.triple();
        let counter_amount = claim.amount_bought;
        if counter_amount < 0 {
            return Err(ClaimViolation::NegativeAmountBought(counter_amount));
        }

        if base_amount == 0 && counter_amount == 0 {
            return Err(ClaimViolation::ZeroAmounts);
        }

        Ok(TradeOutput {
            order: self.order,
            ledger_closed_at: self.ledger_close_time,
            offer_id: claim.offer_id,
            base_account_address: claim.seller_id.address(),
            base_asset_type: base_asset.asset_type,
            base_asset_code: base_asset.code,
            base_asset_issuer: base_asset.issuer,
            base_amount,
            counter_account_address: self.counter_account_address.to_string(),
            counter_asset_type: counter_asset.asset_type,
            counter_asset_code: counter_asset.code,
            counter_asset_issuer: counter_asset.issuer,
            counter_amount,
            base_is_seller: true,
            // Price is bought over sold
            price_n: counter_amount,
            price_d: base_amount,
            base_offer_id: claim.offer_id,
            counter_offer_id: self.counter_offer_id,
            history_operation_id: self.history_operation_id,
        })
    }
}
