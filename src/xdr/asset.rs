use super::AccountId;

/// Asset traded on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Asset {
    Native,
    CreditAlphanum4 { code: [u8; 4], issuer: AccountId },
    CreditAlphanum12 { code: [u8; 12], issuer: AccountId },
}

/// Flattened `(type, code, issuer)` form of an [`Asset`].
///
/// Native assets have empty code and issuer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetTriple {
    pub asset_type: String,
    pub code: String,
    pub issuer: String,
}

impl Asset {
    /// Builds a credit asset picking the 4 or 12 character arm by code length.
    ///
    /// Returns `None` for empty or longer than 12 bytes codes.
    pub fn credit(code: &str, issuer: AccountId) -> Option<Self> {
        let bytes = code.as_bytes();
        match bytes.len() {
            1..=4 => {
                let mut padded = [0u8; 4];
                padded[..bytes.len()].copy_from_slice(bytes);
                Some(Asset::CreditAlphanum4 {
                    code: padded,
                    issuer,
                })
            }
            5..=12 => {
                let mut padded = [0u8; 12];
                padded[..bytes.len()].copy_from_slice(bytes);
                Some(Asset::CreditAlphanum12 {
                    code: padded,
                    issuer,
                })
            }
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Asset::Native => "native",
            Asset::CreditAlphanum4 { .. } => "credit_alphanum4",
            Asset::CreditAlphanum12 { .. } => "credit_alphanum12",
        }
    }

    pub fn triple(&self) -> AssetTriple {
        let (code, issuer) = match self {
            Asset::Native => (String::new(), String::new()),
            Asset::CreditAlphanum4 { code, issuer } => (trim_code(code), issuer.address()),
            Asset::CreditAlphanum12 { code, issuer } => (trim_code(code), issuer.address()),
        };
        AssetTriple {
            asset_type: self.type_name().to_string(),
            code,
            issuer,
        }
    }
}

fn trim_code(code: &[u8]) -> String {
    String::from_utf8_lossy(code)
        .trim_end_matches('\0')
        .to_string()
}
