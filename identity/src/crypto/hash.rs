//! # Hashing Utilities
//!
//! The identity layer hashes exactly one thing: the hex rendering of a
//! public key, to compute its mixed-case checksum. Transaction hashes are
//! the ledger's business and arrive here already computed.
//!
//! ## Checksummed hex
//!
//! Same trick as Ethereum's EIP-55, but with SHA3-256 instead of Keccak:
//!
//! ```text
//! lower = lowercase hex of the bytes (no prefix)
//! h     = hex(SHA3-256(lower as ASCII))
//! out   = "0x" + for each i: lower[i].to_upper() if h[i] > '7' else lower[i]
//! ```
//!
//! Digits have no case, so only letters carry checksum information. A single
//! mistyped letter flips the check with probability ~1/2 per letter, which
//! is enough to catch the classic copy-paste accident.

use sha3::{Digest, Sha3_256};

use crate::config::HEX_PREFIX;

/// Compute the SHA3-256 digest of the input.
///
/// # Example
///
/// ```
/// use convex_identity::crypto::hash::sha3_256;
///
/// let hash = sha3_256(b"convex");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Render bytes as `0x`-prefixed, case-checksummed hex.
pub fn to_checksum_hex(bytes: &[u8]) -> String {
    let lower = hex::encode(bytes);
    let digest = hex::encode(sha3_256(lower.as_bytes()));

    let mut out = String::with_capacity(HEX_PREFIX.len() + lower.len());
    out.push_str(HEX_PREFIX);
    for (c, h) in lower.chars().zip(digest.chars()) {
        // `digest` has 64 nibbles; anything longer than 32 bytes keeps its
        // tail lowercase, which the zip takes care of.
        if h > '7' {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out.push_str(&lower[digest.len().min(lower.len())..]);
    out
}

/// Returns `true` if `text` is valid checksummed hex for some byte string.
///
/// All-lowercase and all-uppercase input is accepted as "no checksum
/// supplied"; only mixed-case input is actually checked.
pub fn is_checksum_valid(text: &str) -> bool {
    let digits = text.strip_prefix(HEX_PREFIX).unwrap_or(text);
    let Ok(bytes) = hex::decode(digits) else {
        return false;
    };

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    to_checksum_hex(&bytes)[HEX_PREFIX.len()..] == *digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_known_vector() {
        // SHA3-256("") from FIPS 202.
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_checksum_known_vector() {
        // Public key of RFC 8032 TEST 1. The digest is taken over the ASCII
        // lowercase hex, not over the raw key bytes.
        let bytes =
            hex::decode("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a")
                .unwrap();
        let expected = "0xd75a980182B10AB7d54BFEd3c964073a0Ee172f3DAa62325aF021a68f707511a";
        assert_eq!(to_checksum_hex(&bytes), expected);
        assert!(is_checksum_valid(expected));
        // Hashing the raw bytes instead gives a different pattern; it must
        // not pass as a valid checksum.
        assert!(!is_checksum_valid(
            "0xd75A980182B10aB7d54bfED3c964073A0Ee172F3DAa62325AF021A68F707511A"
        ));
    }

    #[test]
    fn test_checksum_is_case_only() {
        let bytes = [0xABu8; 32];
        let checksum = to_checksum_hex(&bytes);
        assert!(checksum.starts_with("0x"));
        assert_eq!(checksum.to_lowercase(), format!("0x{}", hex::encode(bytes)));
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let bytes: Vec<u8> = (0u8..32).collect();
        assert_eq!(to_checksum_hex(&bytes), to_checksum_hex(&bytes));
    }

    #[test]
    fn test_checksum_validates_itself() {
        for seed in 0u8..16 {
            let bytes = sha3_256(&[seed]);
            assert!(is_checksum_valid(&to_checksum_hex(&bytes)));
        }
    }

    #[test]
    fn test_single_case_always_accepted() {
        let lower = hex::encode([0xCDu8; 32]);
        assert!(is_checksum_valid(&lower));
        assert!(is_checksum_valid(&lower.to_uppercase()));
    }

    #[test]
    fn test_flipped_case_rejected() {
        // Swap the case of one letter while keeping the string mixed-case,
        // otherwise it would be read as "no checksum supplied".
        let mut checked = 0;
        for seed in 0u8..8 {
            let checksum = to_checksum_hex(&sha3_256(&[seed]));
            let mut digits: Vec<char> = checksum[2..].chars().collect();
            let lowers: Vec<usize> = (0..digits.len())
                .filter(|&i| digits[i].is_ascii_lowercase())
                .collect();
            let uppers: Vec<usize> = (0..digits.len())
                .filter(|&i| digits[i].is_ascii_uppercase())
                .collect();
            if lowers.len() >= 2 && !uppers.is_empty() {
                digits[lowers[0]] = digits[lowers[0]].to_ascii_uppercase();
            } else if uppers.len() >= 2 && !lowers.is_empty() {
                digits[uppers[0]] = digits[uppers[0]].to_ascii_lowercase();
            } else {
                continue;
            }
            let tampered: String = digits.into_iter().collect();
            assert!(!is_checksum_valid(&format!("0x{tampered}")));
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_non_hex_rejected() {
        assert!(!is_checksum_valid("0xnothex"));
    }
}
