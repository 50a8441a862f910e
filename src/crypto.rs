//! Protocol-level cryptographic glue: cryptograms, session key derivation,
//! and pairing secret derivation, built on top of [`CryptoPrimitives`].

use crate::constants::{PAIRING_PBKDF2_ITERATIONS, PAIRING_SALT, PAIRING_SECRET_LEN};
use crate::primitives::CryptoPrimitives;

/// `SHA-256(shared_secret ‖ challenge)`, used on both sides of the PAIR
/// exchange to prove possession of the pairing password.
pub(crate) fn calculate_cryptogram<C: CryptoPrimitives>(
    primitives: &C,
    shared_secret: &[u8; 32],
    challenge: &[u8; 32],
) -> [u8; 32] {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(shared_secret);
    buf.extend_from_slice(challenge);
    primitives.sha256(&buf)
}

/// Derive the pairing key stored after a successful pairing:
/// `SHA-256(shared_secret ‖ salt)`.
pub(crate) fn derive_pairing_key<C: CryptoPrimitives>(
    primitives: &C,
    shared_secret: &[u8; 32],
    salt: &[u8; 32],
) -> [u8; 32] {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(shared_secret);
    buf.extend_from_slice(salt);
    primitives.sha256(&buf)
}

/// Derive the session encryption and MAC keys from the ECDH secret, the
/// stored pairing key, and the card's challenge salt:
/// `(K(E) ‖ K(M)) = SHA-512(secret ‖ pairing_key ‖ salt)`.
pub(crate) fn derive_session_keys<C: CryptoPrimitives>(
    primitives: &C,
    secret: &[u8; 32],
    pairing_key: &[u8; 32],
    salt: &[u8; 32],
) -> ([u8; 32], [u8; 32]) {
    let mut buf = Vec::with_capacity(96);
    buf.extend_from_slice(secret);
    buf.extend_from_slice(pairing_key);
    buf.extend_from_slice(salt);
    let digest = primitives.sha512(&buf);

    let mut enc_key = [0u8; 32];
    let mut mac_key = [0u8; 32];
    enc_key.copy_from_slice(&digest[0..32]);
    mac_key.copy_from_slice(&digest[32..64]);
    (enc_key, mac_key)
}

/// Derive a 32-byte pairing shared secret from a pairing password via
/// PBKDF2-HMAC-SHA-256 with this protocol's fixed salt and iteration count.
///
/// These parameters are fixed by the protocol, not configurable: they must
/// match exactly for interoperability with the card.
pub fn derive_pairing_secret<C: CryptoPrimitives>(primitives: &C, password: &str) -> [u8; 32] {
    let mut out = [0u8; PAIRING_SECRET_LEN];
    primitives.pbkdf2_sha256(
        password.as_bytes(),
        PAIRING_SALT.as_bytes(),
        PAIRING_PBKDF2_ITERATIONS,
        &mut out,
    );
    out
}
