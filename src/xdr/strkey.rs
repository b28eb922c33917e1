//! Strkey rendering of ed25519 account keys (`G...` addresses).

/// Encodes a raw ed25519 public key as an account address.
pub fn encode_account_id(key: &[u8; 32]) -> String {
    stellar_strkey::ed25519::PublicKey(*key).to_string()
}
