//! Wallet address validation and normalization.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{StoreError, StoreResult};

static EVM_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid EVM address regex"));

/// Base58 alphabet (no 0, O, I, l); Solana public keys encode to 32-44 chars
static SOLANA_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("valid Solana address regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    Evm,
    Solana,
}

pub fn classify_wallet(address: &str) -> Option<WalletKind> {
    if EVM_ADDRESS.is_match(address) {
        Some(WalletKind::Evm)
    } else if SOLANA_ADDRESS.is_match(address) {
        Some(WalletKind::Solana)
    } else {
        None
    }
}

/// Validate and canonicalize a wallet address. EVM addresses are lowercased;
/// Solana addresses are case-sensitive and kept as-is.
pub fn normalize_wallet(address: &str) -> StoreResult<String> {
    let trimmed = address.trim();
    match classify_wallet(trimmed) {
        Some(WalletKind::Evm) => Ok(trimmed.to_lowercase()),
        Some(WalletKind::Solana) => Ok(trimmed.to_string()),
        None => Err(StoreError::bad_request(format!("Invalid wallet address: {}", trimmed))),
    }
}

/// Like `normalize_wallet`, treating a missing or blank value as "no wallet"
pub fn normalize_optional_wallet(address: Option<&str>) -> StoreResult<Option<String>> {
    match address.map(str::trim) {
        None | Some("") => Ok(None),
        Some(a) => normalize_wallet(a).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOL: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    #[test]
    fn classifies_addresses() {
        assert_eq!(
            classify_wallet("0x52908400098527886E0F7030069857D2E4169EE7"),
            Some(WalletKind::Evm)
        );
        assert_eq!(classify_wallet(SOL), Some(WalletKind::Solana));
        assert_eq!(classify_wallet("0x1234"), None);
        // '0' and 'l' are outside base58
        assert_eq!(classify_wallet("0lKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"), None);
    }

    #[test]
    fn lowercases_evm_only() {
        assert_eq!(
            normalize_wallet(" 0x52908400098527886E0F7030069857D2E4169EE7 ").unwrap(),
            "0x52908400098527886e0f7030069857d2e4169ee7"
        );
        assert_eq!(normalize_wallet(SOL).unwrap(), SOL);
        assert!(matches!(normalize_wallet("nope"), Err(StoreError::BadRequest(_))));
    }

    #[test]
    fn blank_optional_wallet_is_none() {
        assert_eq!(normalize_optional_wallet(None).unwrap(), None);
        assert_eq!(normalize_optional_wallet(Some("  ")).unwrap(), None);
        assert_eq!(normalize_optional_wallet(Some(SOL)).unwrap().as_deref(), Some(SOL));
        assert!(normalize_optional_wallet(Some("bad")).is_err());
    }
}
