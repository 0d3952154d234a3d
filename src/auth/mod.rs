//! Authentication Module
//! Mission: Authenticate inbound webhooks with a shared HMAC secret

pub mod signature;

pub use signature::{authenticate, sign, verify, SignatureError, SIGNATURE_HEADER};
