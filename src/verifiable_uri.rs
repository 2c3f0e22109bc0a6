//! VerifiableURI values: a content hash plus the URL the content lives at.
//!
//! ```text
//! 0x0000 | method id (4) | hash length (2, big-endian) | hash | UTF-8 URL
//! ```
//!
//! The hash lets a reader check that the document fetched from the URL is the
//! one that was written on chain.

use core::fmt;

use hex_literal::hex;

use crate::hash::keccak256;

const PREFIX: [u8; 2] = [0, 0];
const HEADER_LEN: usize = 2 + 4 + 2;

/// How the hash of a VerifiableURI was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationMethod {
    /// `keccak256(utf8)`: the hash of a UTF-8 (JSON) document.
    Keccak256Utf8,
    /// `keccak256(bytes)`: the hash of arbitrary bytes.
    Keccak256Bytes,
    Unknown([u8; 4]),
}

impl VerificationMethod {
    pub const KECCAK256_UTF8: [u8; 4] = hex!("6f357c6a");
    pub const KECCAK256_BYTES: [u8; 4] = hex!("8019f9b1");

    pub fn id(&self) -> [u8; 4] {
        match self {
            VerificationMethod::Keccak256Utf8 => Self::KECCAK256_UTF8,
            VerificationMethod::Keccak256Bytes => Self::KECCAK256_BYTES,
            VerificationMethod::Unknown(id) => *id,
        }
    }

    pub fn from_id(id: [u8; 4]) -> Self {
        match id {
            Self::KECCAK256_UTF8 => VerificationMethod::Keccak256Utf8,
            Self::KECCAK256_BYTES => VerificationMethod::Keccak256Bytes,
            other => VerificationMethod::Unknown(other),
        }
    }
}

/// Bytes that are not a VerifiableURI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifiableUriError {
    TooShort { len: usize },
    BadPrefix([u8; 2]),
    /// The declared hash length runs past the end of the value.
    HashLength { declared: usize, available: usize },
    InvalidUrl,
    /// The hash does not fit the 2-byte length field.
    HashTooLong { len: usize },
}

impl fmt::Display for VerifiableUriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => {
                write!(f, "VerifiableURI needs at least {HEADER_LEN} bytes, found {len}")
            }
            Self::BadPrefix(prefix) => {
                write!(f, "VerifiableURI must start with 0x0000, found 0x{}", hex::encode(prefix))
            }
            Self::HashLength {
                declared,
                available,
            } => write!(
                f,
                "VerifiableURI declares a {declared}-byte hash but only {available} bytes follow"
            ),
            Self::InvalidUrl => write!(f, "VerifiableURI URL is not valid UTF-8"),
            Self::HashTooLong { len } => {
                write!(f, "VerifiableURI hash of {len} bytes exceeds {} bytes", u16::MAX)
            }
        }
    }
}

impl std::error::Error for VerifiableUriError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerifiableUri {
    pub method: VerificationMethod,
    pub hash: Vec<u8>,
    pub url: String,
}

impl VerifiableUri {
    /// Points at a JSON document stored at `url`.
    ///
    /// ```
    /// use lsp2_schema::verifiable_uri::VerifiableUri;
    ///
    /// let document = r#"{"LSP3Profile":{"name":"alice"}}"#;
    /// let uri = VerifiableUri::for_json(document, "ipfs://QmExample");
    /// let decoded = VerifiableUri::decode(&uri.encode().unwrap()).unwrap();
    /// assert!(decoded.verify(document.as_bytes()));
    /// ```
    pub fn for_json(document: &str, url: &str) -> Self {
        VerifiableUri {
            method: VerificationMethod::Keccak256Utf8,
            hash: keccak256(document).to_vec(),
            url: url.to_owned(),
        }
    }

    /// Points at arbitrary bytes stored at `url`.
    pub fn for_bytes(content: &[u8], url: &str) -> Self {
        VerifiableUri {
            method: VerificationMethod::Keccak256Bytes,
            hash: keccak256(content).to_vec(),
            url: url.to_owned(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, VerifiableUriError> {
        let hash_len = u16::try_from(self.hash.len()).map_err(|_| {
            VerifiableUriError::HashTooLong {
                len: self.hash.len(),
            }
        })?;
        let mut out = Vec::with_capacity(HEADER_LEN + self.hash.len() + self.url.len());
        out.extend_from_slice(&PREFIX);
        out.extend_from_slice(&self.method.id());
        out.extend_from_slice(&hash_len.to_be_bytes());
        out.extend_from_slice(&self.hash);
        out.extend_from_slice(self.url.as_bytes());
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, VerifiableUriError> {
        if bytes.len() < HEADER_LEN {
            return Err(VerifiableUriError::TooShort { len: bytes.len() });
        }
        let prefix = [bytes[0], bytes[1]];
        if prefix != PREFIX {
            return Err(VerifiableUriError::BadPrefix(prefix));
        }
        let method = VerificationMethod::from_id([bytes[2], bytes[3], bytes[4], bytes[5]]);
        let declared = u16::from_be_bytes([bytes[6], bytes[7]]) as usize;
        let rest = &bytes[HEADER_LEN..];
        if declared > rest.len() {
            return Err(VerifiableUriError::HashLength {
                declared,
                available: rest.len(),
            });
        }
        let (hash, url) = rest.split_at(declared);
        let url = std::str::from_utf8(url).map_err(|_| VerifiableUriError::InvalidUrl)?;
        Ok(VerifiableUri {
            method,
            hash: hash.to_vec(),
            url: url.to_owned(),
        })
    }

    /// Whether `content` hashes to the stored hash. Unknown methods never verify.
    pub fn verify(&self, content: &[u8]) -> bool {
        match self.method {
            VerificationMethod::Keccak256Utf8 | VerificationMethod::Keccak256Bytes => {
                keccak256(content)[..] == self.hash[..]
            }
            VerificationMethod::Unknown(_) => false,
        }
    }
}
