//! Operation result decoding.
//!
//! Each trading operation type maps to the list of result arms its result
//! may be tagged with, tried in order. The first arm matching the tag
//! present on the result wins; a new protocol arm is supported by adding a
//! new [`ResultShape`], never by widening an existing one.

use tracing::trace;

use super::{claim, types::DecodedClaims};
use crate::{
    error::TradeError,
    xdr::{
        ManageOfferResult, OperationResult, OperationResultTr, OperationType, PathPaymentResult,
    },
};

/// Result arm of [`OperationResultTr`] holding claimed offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResultShape {
    ManageSellOffer,
    ManageBuyOffer,
    CreatePassiveSellOffer,
    PathPaymentStrictReceive,
    PathPaymentStrictSend,
}

/// Payload of a matched [`ResultShape`].
enum ShapePayload<'a> {
    ManageOffer(&'a ManageOfferResult),
    PathPayment(&'a PathPaymentResult),
}

/// Result arms accepted for an operation type.
struct AcceptedShapes {
    /// Arm matching the operation type.
    canonical: ResultShape,
    /// Arms accepted on top of the canonical one, for historical data.
    compatibility: &'static [ResultShape],
}

const NO_COMPATIBILITY: &[ResultShape] = &[];

/// Compatibility shim for passive sell offers.
///
/// stellar-core has historically set the manage sell offer arm on results of
/// create passive sell offer operations, while other ledgers carry the
/// passive arm. Both shapes occur in history and are decoded the same way.
/// Drop this once history is reprocessed with the correct tag.
const PASSIVE_SELL_OFFER_COMPATIBILITY: &[ResultShape] = &[ResultShape::ManageSellOffer];

impl AcceptedShapes {
    fn for_operation(operation_type: OperationType) -> Option<Self> {
        let (canonical, compatibility) = match operation_type {
            OperationType::ManageSellOffer => (ResultShape::ManageSellOffer, NO_COMPATIBILITY),
            OperationType::ManageBuyOffer => (ResultShape::ManageBuyOffer, NO_COMPATIBILITY),
            OperationType::CreatePassiveSellOffer => (
                ResultShape::CreatePassiveSellOffer,
                PASSIVE_SELL_OFFER_COMPATIBILITY,
            ),
            OperationType::PathPaymentStrictReceive => {
                (ResultShape::PathPaymentStrictReceive, NO_COMPATIBILITY)
            }
            OperationType::PathPaymentStrictSend => {
                (ResultShape::PathPaymentStrictSend, NO_COMPATIBILITY)
            }
            _ => return None,
        };
        Some(Self {
            canonical,
            compatibility,
        })
    }

    /// First accepted shape matching the tag on `tr`, canonical first.
    fn find<'a>(&self, tr: &'a OperationResultTr) -> Option<(ResultShape, ShapePayload<'a>)> {
        std::iter::once(self.canonical)
            .chain(self.compatibility.iter().copied())
            .find_map(|shape| shape.try_match(tr).map(|payload| (shape, payload)))
    }
}

impl ResultShape {
    fn result_name(&self) -> &'static str {
        match self {
            ResultShape::ManageSellOffer => "ManageSellOfferResult",
            ResultShape::ManageBuyOffer => "ManageBuyOfferResult",
            ResultShape::CreatePassiveSellOffer => "CreatePassiveSellOfferResult",
            ResultShape::PathPaymentStrictReceive => "PathPaymentStrictReceiveResult",
            ResultShape::PathPaymentStrictSend => "PathPaymentStrictSendResult",
        }
    }

    fn success_name(&self) -> &'static str {
        match self {
            ResultShape::ManageSellOffer
            | ResultShape::ManageBuyOffer
            | ResultShape::CreatePassiveSellOffer => "ManageOfferSuccess",
            ResultShape::PathPaymentStrictReceive => "PathPaymentStrictReceiveSuccess",
            ResultShape::PathPaymentStrictSend => "PathPaymentStrictSendSuccess",
        }
    }

    /// Payload of `tr` if it is tagged with this shape.
    fn try_match<'a>(&self, tr: &'a OperationResultTr) -> Option<ShapePayload<'a>> {
        match (self, tr) {
            (ResultShape::ManageSellOffer, OperationResultTr::ManageSellOffer(r))
            | (ResultShape::ManageBuyOffer, OperationResultTr::ManageBuyOffer(r))
            | (
                ResultShape::CreatePassiveSellOffer,
                OperationResultTr::CreatePassiveSellOffer(r),
            ) => {
                Some(ShapePayload::ManageOffer(r))
            }
            (ResultShape::PathPaymentStrictReceive, OperationResultTr::PathPaymentStrictReceive(r))
            | (ResultShape::PathPaymentStrictSend, OperationResultTr::PathPaymentStrictSend(r)) => {
                Some(ShapePayload::PathPayment(r))
            }
            _ => None,
        }
    }
}

/// Extracts claimed offers and the resulting counter offer from the result
/// of the operation at `operation_index`.
pub fn decode(
    results: &[OperationResult],
    operation_index: usize,
    operation_type: OperationType,
) -> Result<DecodedClaims, TradeError> {
    let result = results
        .get(operation_index)
        .ok_or(TradeError::OperationOutOfRange {
            operation_index,
            len: results.len(),
            what: "operation results",
        })?;

    let shape_error = |expected| TradeError::DecodeShape {
        operation_index,
        operation_type,
        expected,
    };

    let tr = result.tr().ok_or_else(|| shape_error("result tr"))?;

    let accepted =
        AcceptedShapes::for_operation(operation_type).ok_or(TradeError::UnsupportedOperation {
            operation_index,
            operation_type,
        })?;

    let (shape, payload) = accepted
        .find(tr)
        .ok_or_else(|| shape_error(accepted.canonical.result_name()))?;

    if shape != accepted.canonical {
        trace!(
            operation_index,
            %operation_type,
            tag = %tr.operation_type(),
            "operation result decoded via compatibility shape"
        );
    }

    let (atoms, counter_offer) = match payload {
        ShapePayload::ManageOffer(ManageOfferResult::Success(success)) => {
            (&success.offers_claimed, success.offer_entry().cloned())
        }
        ShapePayload::PathPayment(PathPaymentResult::Success(success)) => (&success.offers, None),
        _ => return Err(shape_error(shape.success_name())),
    };

    let claimed_offers = claim::normalize(atoms).map_err(|source| {
        TradeError::UnknownOfferVariant {
            operation_index,
            source,
        }
    })?;

    Ok(DecodedClaims {
        claimed_offers,
        counter_offer,
    })
}
