//! Host-side secure channel client for a BIP32/BIP39 hardware wallet
//! smart-card applet.
//!
//! The crate's core is the secure channel subsystem in [`session`]: EC
//! key-agreement pairing, session establishment, and stateful AES-CBC +
//! AES-CMAC wrap/unwrap framing over ISO 7816 APDUs. [`command_set`] is a
//! thin formatter built on top of it. Both the APDU transport
//! ([`apdu::ApduTransport`]) and the cryptographic backend
//! ([`primitives::CryptoPrimitives`]) are external collaborators this crate
//! consumes through narrow trait boundaries; a default RustCrypto-backed
//! implementation of the latter is provided for convenience.

pub mod apdu;
pub mod command_set;
pub mod constants;
mod crypto;
pub mod error;
pub mod primitives;
pub mod session;
pub mod types;

pub use apdu::{ApduTransport, Command, Response, TransportError};
pub use command_set::{CommandSet, DeriveFrom, SelectResult};
pub use crypto::derive_pairing_secret;
pub use error::{Error, Result};
pub use primitives::{CryptoPrimitives, DefaultPrimitives};
pub use session::SecureChannelSession;
pub use types::{ApplicationInfo, PairingInfo};
