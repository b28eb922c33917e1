use super::strkey;

/// Public key of an account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, derive_more::Debug)]
pub enum PublicKey {
    #[debug("{}", strkey::encode_account_id(_0))]
    Ed25519([u8; 32]),
}

/// Account identity as stored in ledger entries and claim atoms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, derive_more::Debug)]
#[debug("{_0:?}")]
pub struct AccountId(pub PublicKey);

/// Transaction/operation source account, optionally multiplexed
/// with a 64-bit sub-account ID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, derive_more::Debug)]
pub enum MuxedAccount {
    #[debug("{}", strkey::encode_account_id(_0))]
    Ed25519([u8; 32]),

    #[debug("{}:{id}", strkey::encode_account_id(ed25519))]
    MuxedEd25519 { id: u64, ed25519: [u8; 32] },
}

impl AccountId {
    pub fn from_ed25519(key: [u8; 32]) -> Self {
        Self(PublicKey::Ed25519(key))
    }

    /// `G...` address of the account.
    pub fn address(&self) -> String {
        match &self.0 {
            PublicKey::Ed25519(key) => strkey::encode_account_id(key),
        }
    }
}

impl MuxedAccount {
    /// Underlying account, with the multiplexing ID dropped.
    pub fn account_id(&self) -> AccountId {
        match self {
            MuxedAccount::Ed25519(key) => AccountId::from_ed25519(*key),
            MuxedAccount::MuxedEd25519 { ed25519, .. } => AccountId::from_ed25519(*ed25519),
        }
    }

    /// `G...` address of the underlying account.
    pub fn address(&self) -> String {
        self.account_id().address()
    }
}

impl From<AccountId> for MuxedAccount {
    fn from(value: AccountId) -> Self {
        match value.0 {
            PublicKey::Ed25519(key) => MuxedAccount::Ed25519(key),
        }
    }
}
