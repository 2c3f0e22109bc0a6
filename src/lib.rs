#![doc = include_str!("../README.md")]

pub mod align;
pub mod codec;
pub mod error;
pub mod hash;
pub mod key;
pub mod lsp3;
pub mod prelude;
pub mod profile;
pub mod schema;
pub mod store;
pub mod valuetype;
pub mod verifiable_uri;

pub use error::Error;

// Re-exported so callers can build `Uint`/`Int` values without adding the
// dependency themselves.
pub use ethnum;
