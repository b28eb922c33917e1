use std::fmt;

use super::{AccountId, Asset, ClaimAtom, OfferEntry};

/// Type of a ledger operation, with its wire value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationType {
    CreateAccount = 0,
    Payment = 1,
    PathPaymentStrictReceive = 2,
    ManageSellOffer = 3,
    CreatePassiveSellOffer = 4,
    SetOptions = 5,
    ChangeTrust = 6,
    AllowTrust = 7,
    AccountMerge = 8,
    Inflation = 9,
    ManageData = 10,
    BumpSequence = 11,
    ManageBuyOffer = 12,
    PathPaymentStrictSend = 13,
    CreateClaimableBalance = 14,
    ClaimClaimableBalance = 15,
    BeginSponsoringFutureReserves = 16,
    EndSponsoringFutureReserves = 17,
    RevokeSponsorship = 18,
    Clawback = 19,
    ClawbackClaimableBalance = 20,
    SetTrustLineFlags = 21,
    LiquidityPoolDeposit = 22,
    LiquidityPoolWithdraw = 23,
    InvokeHostFunction = 24,
    ExtendFootprintTtl = 25,
    RestoreFootprint = 26,
}

impl OperationType {
    /// Whether successful operations of this type may cross offers.
    pub fn can_trade(&self) -> bool {
        matches!(
            self,
            OperationType::ManageBuyOffer
                | OperationType::ManageSellOffer
                | OperationType::CreatePassiveSellOffer
                | OperationType::PathPaymentStrictSend
                | OperationType::PathPaymentStrictReceive
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            OperationType::CreateAccount => "create_account",
            OperationType::Payment => "payment",
            OperationType::PathPaymentStrictReceive => "path_payment_strict_receive",
            OperationType::ManageSellOffer => "manage_sell_offer",
            OperationType::CreatePassiveSellOffer => "create_passive_sell_offer",
            OperationType::SetOptions => "set_options",
            OperationType::ChangeTrust => "change_trust",
            OperationType::AllowTrust => "allow_trust",
            OperationType::AccountMerge => "account_merge",
            OperationType::Inflation => "inflation",
            OperationType::ManageData => "manage_data",
            OperationType::BumpSequence => "bump_sequence",
            OperationType::ManageBuyOffer => "manage_buy_offer",
            OperationType::PathPaymentStrictSend => "path_payment_strict_send",
            OperationType::CreateClaimableBalance => "create_claimable_balance",
            OperationType::ClaimClaimableBalance => "claim_claimable_balance",
            OperationType::BeginSponsoringFutureReserves => "begin_sponsoring_future_reserves",
            OperationType::EndSponsoringFutureReserves => "end_sponsoring_future_reserves",
            OperationType::RevokeSponsorship => "revoke_sponsorship",
            OperationType::Clawback => "clawback",
            OperationType::ClawbackClaimableBalance => "clawback_claimable_balance",
            OperationType::SetTrustLineFlags => "set_trust_line_flags",
            OperationType::LiquidityPoolDeposit => "liquidity_pool_deposit",
            OperationType::LiquidityPoolWithdraw => "liquidity_pool_withdraw",
            OperationType::InvokeHostFunction => "invoke_host_function",
            OperationType::ExtendFootprintTtl => "extend_footprint_ttl",
            OperationType::RestoreFootprint => "restore_footprint",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw non-success result code of a result union.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResultCode(pub i32);

/// What happened to the submitted offer after crossing the book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManageOfferEffect {
    Created(OfferEntry),
    Updated(OfferEntry),
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManageOfferSuccessResult {
    pub offers_claimed: Vec<ClaimAtom>,
    pub offer: ManageOfferEffect,
}

impl ManageOfferSuccessResult {
    /// Offer left on the book, if any.
    pub fn offer_entry(&self) -> Option<&OfferEntry> {
        match &self.offer {
            ManageOfferEffect::Created(entry) | ManageOfferEffect::Updated(entry) => Some(entry),
            ManageOfferEffect::Deleted => None,
        }
    }
}

/// Result of manage buy/sell and passive sell offer operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManageOfferResult {
    Success(ManageOfferSuccessResult),
    Failure(ResultCode),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplePaymentResult {
    pub destination: AccountId,
    pub asset: Asset,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPaymentSuccess {
    pub offers: Vec<ClaimAtom>,
    pub last: SimplePaymentResult,
}

/// Result of strict send and strict receive path payments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathPaymentResult {
    Success(PathPaymentSuccess),
    NoIssuer(Asset),
    Failure(ResultCode),
}

/// Inner operation result, tagged with the operation type that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationResultTr {
    ManageSellOffer(ManageOfferResult),
    ManageBuyOffer(ManageOfferResult),
    CreatePassiveSellOffer(ManageOfferResult),
    PathPaymentStrictReceive(PathPaymentResult),
    PathPaymentStrictSend(PathPaymentResult),
    /// Result of an operation type that never crosses offers.
    Other(OperationType),
}

impl OperationResultTr {
    /// The tag actually present on the result.
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationResultTr::ManageSellOffer(_) => OperationType::ManageSellOffer,
            OperationResultTr::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            OperationResultTr::CreatePassiveSellOffer(_) => OperationType::CreatePassiveSellOffer,
            OperationResultTr::PathPaymentStrictReceive(_) => {
                OperationType::PathPaymentStrictReceive
            }
            OperationResultTr::PathPaymentStrictSend(_) => OperationType::PathPaymentStrictSend,
            OperationResultTr::Other(r#type) => *r#type,
        }
    }
}

/// Result of a single operation within a transaction result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation was applied; carries the type-specific result.
    Inner(OperationResultTr),
    /// Operation was rejected before being applied (bad auth, no account, ...).
    Failed(ResultCode),
}

impl OperationResult {
    pub fn tr(&self) -> Option<&OperationResultTr> {
        match self {
            OperationResult::Inner(tr) => Some(tr),
            OperationResult::Failed(_) => None,
        }
    }
}
