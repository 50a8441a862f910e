//! Small value types parsed out of card responses.

use bytes::Bytes;

/// Long-lived pairing material persisted by the caller between sessions.
///
/// Opaque to everything except [`crate::session::SecureChannelSession`],
/// which is the only code that reads or writes the key bytes.
#[derive(Clone)]
pub struct PairingInfo {
    pub(crate) key: [u8; 32],
    pub index: u8,
}

impl PairingInfo {
    /// Build from a previously persisted `(index, key)` pair.
    pub fn from_raw(index: u8, key: [u8; 32]) -> Self {
        Self { key, index }
    }

    /// Serialize to the persisted form: `index (1 byte) ‖ key (32 bytes)`.
    pub fn to_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[0] = self.index;
        out[1..].copy_from_slice(&self.key);
        out
    }

    /// Parse the persisted form produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 33 {
            return None;
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes[1..]);
        Some(Self { key, index: bytes[0] })
    }
}

impl std::fmt::Debug for PairingInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairingInfo")
            .field("index", &self.index)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// The application-info template returned by SELECT, when the applet has
/// already been initialized. Parsing this is a convenience for callers;
/// `CommandSet` itself only ever needs the embedded public key.
#[derive(Debug, Clone)]
pub struct ApplicationInfo {
    pub instance_uid: Bytes,
    pub public_key: Bytes,
    pub version: Bytes,
    pub remaining_pairing_slots: u8,
    pub key_uid: Bytes,
    pub capabilities: Option<u8>,
}
