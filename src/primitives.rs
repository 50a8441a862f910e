//! The narrow cryptographic capability this client needs from its host
//! environment, and a default implementation built on RustCrypto crates.
//!
//! Protocol code (`crypto`, `session`) never reaches for a concrete crypto
//! crate directly; it calls through [`CryptoPrimitives`] so a caller can
//! substitute a hardware-backed or audited implementation without touching
//! the secure channel state machine.

use aes::Aes128;
use cipher::block_padding::Iso7816;
use cipher::{BlockDecryptMut, BlockEncryptMut, Iv, Key, KeyIvInit};
use cmac::{Cmac, Mac};
use k256::{PublicKey, SecretKey};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};

use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Cryptographic primitives consumed by the secure channel protocol.
///
/// A default RustCrypto-backed implementation is provided as
/// [`DefaultPrimitives`]; most callers never need to implement this trait
/// themselves.
pub trait CryptoPrimitives {
    /// Generate a fresh secp256k1 keypair.
    fn generate_keypair(&self) -> (SecretKey, PublicKey);

    /// Decode an uncompressed secp256k1 point (`0x04 ‖ X ‖ Y`, 65 bytes).
    fn decode_public_key(&self, bytes: &[u8]) -> Result<PublicKey>;

    /// Compute the ECDH shared secret's raw X-coordinate (32 bytes).
    fn ecdh(&self, private: &SecretKey, public: &PublicKey) -> Result<[u8; 32]>;

    /// SHA-256 digest.
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// SHA-512 digest.
    fn sha512(&self, data: &[u8]) -> [u8; 64];

    /// PBKDF2-HMAC-SHA-256 with the given iteration count and output length.
    fn pbkdf2_sha256(&self, password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]);

    /// AES-CBC encrypt with ISO 7816-4 padding. `key` selects AES-128 or
    /// AES-256 by its length (16 or 32 bytes).
    fn aes_cbc_encrypt(&self, key: &[u8], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// AES-CBC decrypt with ISO 7816-4 padding, returning the unpadded plaintext.
    fn aes_cbc_decrypt(&self, key: &[u8], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// RFC 4493 AES-CMAC-128, producing a 16-byte tag.
    fn aes_cmac(&self, key: &[u8; 16], data: &[u8]) -> [u8; 16];

    /// Fill `out` with cryptographically secure random bytes.
    fn secure_random(&self, out: &mut [u8]);
}

/// Default [`CryptoPrimitives`] implementation, built on `k256`, `cbc`,
/// `cmac`, `pbkdf2`, `sha2`, and `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPrimitives;

impl CryptoPrimitives for DefaultPrimitives {
    fn generate_keypair(&self) -> (SecretKey, PublicKey) {
        let secret = SecretKey::random(&mut rand::thread_rng());
        let public = secret.public_key();
        (secret, public)
    }

    fn decode_public_key(&self, bytes: &[u8]) -> Result<PublicKey> {
        PublicKey::from_sec1_bytes(bytes).map_err(|e| Error::crypto(e.to_string()))
    }

    fn ecdh(&self, private: &SecretKey, public: &PublicKey) -> Result<[u8; 32]> {
        let shared = k256::elliptic_curve::ecdh::diffie_hellman(
            private.to_nonzero_scalar(),
            public.as_affine(),
        );
        let mut out = [0u8; 32];
        out.copy_from_slice(shared.raw_secret_bytes().as_slice());
        Ok(out)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn sha512(&self, data: &[u8]) -> [u8; 64] {
        Sha512::digest(data).into()
    }

    fn pbkdf2_sha256(&self, password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) {
        pbkdf2_hmac::<Sha256>(password, salt, iterations, out);
    }

    fn aes_cbc_encrypt(&self, key: &[u8], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>> {
        match key.len() {
            32 => {
                let key = Key::<Aes256CbcEnc>::from_slice(key);
                let iv = Iv::<Aes256CbcEnc>::from_slice(iv);
                Ok(Aes256CbcEnc::new(key, iv).encrypt_padded_vec_mut::<Iso7816>(plaintext))
            }
            _ => Err(Error::crypto("unsupported AES-CBC key length")),
        }
    }

    fn aes_cbc_decrypt(&self, key: &[u8], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>> {
        match key.len() {
            32 => {
                let key = Key::<Aes256CbcDec>::from_slice(key);
                let iv = Iv::<Aes256CbcDec>::from_slice(iv);
                Aes256CbcDec::new(key, iv)
                    .decrypt_padded_vec_mut::<Iso7816>(ciphertext)
                    .map_err(|e| Error::crypto(e.to_string()))
            }
            _ => Err(Error::crypto("unsupported AES-CBC key length")),
        }
    }

    fn aes_cmac(&self, key: &[u8; 16], data: &[u8]) -> [u8; 16] {
        let mut mac = Cmac::<Aes128>::new_from_slice(key).expect("16-byte key is valid");
        mac.update(data);
        let tag = mac.finalize().into_bytes();
        let mut out = [0u8; 16];
        out.copy_from_slice(&tag);
        out
    }

    fn secure_random(&self, out: &mut [u8]) {
        rand::thread_rng().fill_bytes(out);
    }
}
