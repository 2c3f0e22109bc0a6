//! Keccak-256 digests as used by ERC725Y key derivation.

use digest::Digest;
use sha3::Keccak256;

/// The length of a keccak-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Hashes `bytes` with keccak-256 (the pre-standard SHA-3 padding used by Ethereum).
///
/// # Example
///
/// ```
/// use lsp2_schema::hash::keccak256;
/// use hex_literal::hex;
///
/// assert_eq!(
///     keccak256(b""),
///     hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
/// );
/// ```
pub fn keccak256(bytes: impl AsRef<[u8]>) -> [u8; DIGEST_LEN] {
    Keccak256::digest(bytes.as_ref()).into()
}

/// The first four bytes of the keccak-256 digest of `bytes`.
pub fn selector(bytes: impl AsRef<[u8]>) -> [u8; 4] {
    let digest = keccak256(bytes);
    [digest[0], digest[1], digest[2], digest[3]]
}
