//! Claim atom normalization.
//!
//! Protocol 18 replaced the V0 claim layout, carrying a bare seller key, with
//! order book claims carrying a full account ID. Historical ledgers contain
//! both; they are collapsed here into [`ClaimedOffer`].

use super::types::ClaimedOffer;
use crate::{
    error::UnknownClaimVariant,
    xdr::{AccountId, ClaimAtom, ClaimAtomType, ClaimOfferAtom, ClaimOfferAtomV0},
};

/// Normalizes claim atoms, keeping their order.
pub fn normalize(atoms: &[ClaimAtom]) -> Result<Vec<ClaimedOffer>, UnknownClaimVariant> {
    atoms
        .iter()
        .enumerate()
        .map(|(claim_index, atom)| {
            ClaimedOffer::try_from(atom)
                .map_err(|variant| UnknownClaimVariant { claim_index, variant })
        })
        .collect()
}

impl TryFrom<&ClaimAtom> for ClaimedOffer {
    type Error = ClaimAtomType;

    fn try_from(value: &ClaimAtom) -> Result<Self, Self::Error> {
        match value {
            ClaimAtom::V0(atom) => Ok(atom.into()),
            ClaimAtom::OrderBook(atom) => Ok(atom.into()),
            // Pool claims have no seller or offer to attribute a trade to
            ClaimAtom::LiquidityPool(_) => Err(value.r#type()),
        }
    }
}

impl From<&ClaimOfferAtomV0> for ClaimedOffer {
    fn from(value: &ClaimOfferAtomV0) -> Self {
        Self {
            seller_id: AccountId::from_ed25519(value.seller_ed25519),
            offer_id: value.offer_id,
            asset_sold: value.asset_sold,
            amount_sold: value.amount_sold,
            asset_bought: value.asset_bought,
            amount_bought: value.amount_bought,
        }
    }
}

impl From<&ClaimOfferAtom> for ClaimedOffer {
    fn from(value: &ClaimOfferAtom) -> Self {
        Self {
            seller_id: value.seller_id,
            offer_id: value.offer_id,
            asset_sold: value.asset_sold,
            amount_sold: value.amount_sold,
            asset_bought: value.asset_bought,
            amount_bought: value.amount_bought,
        }
    }
}
