//! Crate-level error type.
//!
//! Each module reports its own error enum. [Error] gathers them for callers
//! that only need to tell a bad schema or bad input apart from bad data read
//! from chain. Store reads report [crate::store::StoreError] and
//! [crate::profile::ProfileError], which classify themselves the same way
//! through their `kind()`.

use core::fmt;

use crate::codec::{EncodeError, MalformedValue};
use crate::schema::registry::RegistryError;
use crate::schema::{InvalidDynamicParameter, SchemaError};
use crate::valuetype::UnsupportedValueType;
use crate::verifiable_uri::VerifiableUriError;

/// Who is at fault for an [Error].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A schema declaration or schema file is wrong.
    Schema,
    /// A value or key parameter supplied by the caller is wrong.
    Input,
    /// Bytes read from storage do not match their schema.
    Data,
    /// The key-value store itself failed.
    Backend,
}

#[derive(Debug)]
pub enum Error {
    Schema(SchemaError),
    Registry(RegistryError),
    DynamicParameter(InvalidDynamicParameter),
    Encode(EncodeError),
    Malformed(MalformedValue),
    VerifiableUri(VerifiableUriError),
    Json(serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema(_) | Error::Registry(_) => ErrorKind::Schema,
            Error::DynamicParameter(_) | Error::Encode(_) | Error::Json(_) => ErrorKind::Input,
            Error::VerifiableUri(VerifiableUriError::HashTooLong { .. }) => ErrorKind::Input,
            Error::Malformed(_) | Error::VerifiableUri(_) => ErrorKind::Data,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(err) => write!(f, "bad schema: {err}"),
            Error::Registry(err) => write!(f, "bad schema: {err}"),
            Error::DynamicParameter(err) => write!(f, "bad key parameter: {err}"),
            Error::Encode(err) => write!(f, "bad value: {err}"),
            Error::Json(err) => write!(f, "bad metadata document: {err}"),
            Error::Malformed(err) => write!(f, "bad on-chain data: {err}"),
            Error::VerifiableUri(err @ VerifiableUriError::HashTooLong { .. }) => {
                write!(f, "bad value: {err}")
            }
            Error::VerifiableUri(err) => write!(f, "bad on-chain data: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Schema(err) => Some(err),
            Error::Registry(err) => Some(err),
            Error::DynamicParameter(err) => Some(err),
            Error::Encode(err) => Some(err),
            Error::Malformed(err) => Some(err),
            Error::VerifiableUri(err) => Some(err),
            Error::Json(err) => Some(err),
        }
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}

impl From<UnsupportedValueType> for Error {
    fn from(err: UnsupportedValueType) -> Self {
        Error::Schema(err.into())
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::Registry(err)
    }
}

impl From<InvalidDynamicParameter> for Error {
    fn from(err: InvalidDynamicParameter) -> Self {
        Error::DynamicParameter(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Error::Encode(err)
    }
}

impl From<MalformedValue> for Error {
    fn from(err: MalformedValue) -> Self {
        Error::Malformed(err)
    }
}

impl From<VerifiableUriError> for Error {
    fn from(err: VerifiableUriError) -> Self {
        Error::VerifiableUri(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
