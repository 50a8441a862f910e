//! Error types for the secure channel client.
//!
//! This module centralizes every failure kind the crate can surface so
//! callers have a single `Result` alias to match against.

use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for secure channel and command set operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying APDU transport failed to deliver a command or response.
    #[error("transport error: {0}")]
    Transport(String),

    /// SELECT returned a response shape this client does not recognize.
    #[error("unexpected response from card")]
    UnexpectedResponse,

    /// OPEN SECURE CHANNEL failed (non-success status word or malformed payload).
    #[error("open secure channel failed")]
    OpenFailed,

    /// MUTUALLY AUTHENTICATE failed (non-success status word or wrong payload length).
    #[error("mutual authentication failed")]
    MutualAuthFailed,

    /// First PAIR exchange failed (non-success status word).
    #[error("pairing step 1 failed")]
    PairStep1Failed,

    /// Second PAIR exchange failed (non-success status word).
    #[error("pairing step 2 failed")]
    PairStep2Failed,

    /// The card's cryptogram did not match the expected value during pairing.
    #[error("card cryptogram verification failed")]
    BadCardCryptogram,

    /// UNPAIR failed (non-success status word).
    #[error("unpair failed")]
    UnpairFailed,

    /// The MAC on an unwrapped response did not match. The session is closed.
    #[error("MAC verification failed, secure channel closed")]
    InvalidMac,

    /// A cryptographic primitive failed (bad point encoding, padding error, etc.).
    #[error("cryptographic error: {0}")]
    Crypto(String),

    /// A caller-supplied argument violated a documented precondition.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl Error {
    pub(crate) fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }
}
