use std::fmt;

use super::{AccountId, Asset};

/// Offer price as an unreduced `n / d` ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

/// Offer resting on the order book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfferEntry {
    pub seller_id: AccountId,
    pub offer_id: i64,
    pub selling: Asset,
    pub buying: Asset,
    pub amount: i64,
    pub price: Price,
    pub flags: u32,
}

/// Claim against an order book offer, pre protocol 18 layout.
///
/// Seller is carried as a bare ed25519 key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimOfferAtomV0 {
    pub seller_ed25519: [u8; 32],
    pub offer_id: i64,
    pub asset_sold: Asset,
    pub amount_sold: i64,
    pub asset_bought: Asset,
    pub amount_bought: i64,
}

/// Claim against an order book offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimOfferAtom {
    pub seller_id: AccountId,
    pub offer_id: i64,
    pub asset_sold: Asset,
    pub amount_sold: i64,
    pub asset_bought: Asset,
    pub amount_bought: i64,
}

/// Claim against a liquidity pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimLiquidityAtom {
    pub liquidity_pool_id: [u8; 32],
    pub asset_sold: Asset,
    pub amount_sold: i64,
    pub asset_bought: Asset,
    pub amount_bought: i64,
}

/// Versioned claim record produced while crossing offers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimAtom {
    V0(ClaimOfferAtomV0),
    OrderBook(ClaimOfferAtom),
    LiquidityPool(ClaimLiquidityAtom),
}

/// Discriminant of [`ClaimAtom`], with its wire value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClaimAtomType {
    V0 = 0,
    OrderBook = 1,
    LiquidityPool = 2,
}

impl ClaimAtom {
    pub fn r#type(&self) -> ClaimAtomType {
        match self {
            ClaimAtom::V0(_) => ClaimAtomType::V0,
            ClaimAtom::OrderBook(_) => ClaimAtomType::OrderBook,
            ClaimAtom::LiquidityPool(_) => ClaimAtomType::LiquidityPool,
        }
    }
}

impl fmt::Display for ClaimAtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimAtomType::V0 => "claim_atom_type_v0",
            ClaimAtomType::OrderBook => "claim_atom_type_order_book",
            ClaimAtomType::LiquidityPool => "claim_atom_type_liquidity_pool",
        };
        write!(f, "{name}")
    }
}
