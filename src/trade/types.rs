//! Trade data structures.

use serde::Serialize;

use crate::xdr::{AccountId, Asset, OfferEntry};

/// Canonical claimed offer, whatever claim atom version it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimedOffer {
    pub seller_id: AccountId,
    pub offer_id: i64,
    pub asset_sold: Asset,
    pub amount_sold: i64,
    pub asset_bought: Asset,
    pub amount_bought: i64,
}

/// Claims of a single operation along with the offer it left on the book.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedClaims {
    /// Claims in the order the offers were crossed.
    pub claimed_offers: Vec<ClaimedOffer>,

    /// Remaining offer of a manage offer operation, if it rests on the book.
    pub counter_offer: Option<OfferEntry>,
}

/// A single trade, one per claimed offer.
///
/// Base side is the owner of the claimed offer, counter side is the source
/// account of the transaction that crossed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TradeOutput {
    /// Position of the claim within the operation.
    pub order: u32,

    /// Ledger close time, unix seconds.
    pub ledger_closed_at: u64,

    pub offer_id: i64,

    pub base_account_address: String,
    pub base_asset_type: String,
    pub base_asset_code: String,
    pub base_asset_issuer: String,
    pub base_amount: i64,

    pub counter_account_address: String,
    pub counter_asset_type: String,
    pub counter_asset_code: String,
    pub counter_asset_issuer: String,
    pub counter_amount: i64,

    /// Always `true`: the claimed offer's owner is recorded as the base side.
    pub base_is_seller: bool,

    /// Price numerator, the counter amount. Never reduced.
    pub price_n: i64,

    /// Price denominator, the base amount. Never reduced.
    pub price_d: i64,

    pub base_offer_id: i64,

    /// ID of the offer left on the book, or an ID synthesized from the
    /// operation TOID when none was left.
    pub counter_offer_id: i64,

    /// Operation TOID + 1.
    pub history_operation_id: i64,
}
