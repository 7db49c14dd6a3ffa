mod error;
mod fingerprint;
mod store;

pub use error::CacheError;
pub use fingerprint::{sanitize, Fingerprint, FingerprintBuilder};
pub use store::ResultCache;
