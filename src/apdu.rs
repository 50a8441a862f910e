//! ISO 7816-4 APDU value types and the abstract transport boundary.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// A command APDU: `CLA INS P1 P2 [Lc DATA]`.
///
/// This client only ever emits short (single-byte `Lc`) APDUs: every data
/// payload this protocol constructs fits comfortably under 256 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Bytes,
}

impl Command {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Bytes::new(),
        }
    }

    pub fn with_data(cla: u8, ins: u8, p1: u8, p2: u8, data: impl Into<Bytes>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: data.into(),
        }
    }

    /// Serialize to raw APDU bytes.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(5 + self.data.len());
        buf.put_u8(self.cla);
        buf.put_u8(self.ins);
        buf.put_u8(self.p1);
        buf.put_u8(self.p2);
        if !self.data.is_empty() {
            buf.put_u8(self.data.len() as u8);
            buf.put_slice(&self.data);
        }
        buf.freeze()
    }
}

/// A response APDU: payload data plus the trailing status word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub data: Bytes,
    pub sw: u16,
}

impl Response {
    /// Parse `DATA ‖ SW1 ‖ SW2` into a [`Response`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransportError> {
        if bytes.len() < 2 {
            return Err(TransportError(format!(
                "response too short: {} bytes",
                bytes.len()
            )));
        }
        let (data, sw_bytes) = bytes.split_at(bytes.len() - 2);
        let sw = u16::from_be_bytes([sw_bytes[0], sw_bytes[1]]);
        Ok(Self {
            data: Bytes::copy_from_slice(data),
            sw,
        })
    }

    pub fn is_success(&self) -> bool {
        self.sw == crate::constants::SW_SUCCESS
    }
}

/// A transport-level failure: the reader was unplugged, the card was
/// removed, a timeout elapsed, and so on. Distinct from an application-level
/// non-success status word, which is not an error at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for crate::error::Error {
    fn from(e: TransportError) -> Self {
        crate::error::Error::Transport(e.0)
    }
}

/// The abstract APDU transport this client is built against. A concrete
/// implementation (PC/SC reader, simulator, mock) lives outside this crate.
pub trait ApduTransport {
    /// Send a command APDU and return the card's response, or a
    /// transport-level error if the exchange could not be completed.
    fn transmit(&mut self, command: &Command) -> Result<Response, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serializes_with_data() {
        let cmd = Command::with_data(0x80, 0x10, 0x00, 0x00, Bytes::from_static(&[0xAA, 0xBB]));
        let bytes = cmd.to_bytes();
        assert_eq!(bytes.as_ref(), &[0x80, 0x10, 0x00, 0x00, 0x02, 0xAA, 0xBB]);
        assert_eq!(hex::encode(bytes), "8010000002aabb");
    }

    #[test]
    fn command_serializes_without_data() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0xA4, 0x04, 0x00]);
    }

    #[test]
    fn response_parses_data_and_sw() {
        let resp = Response::from_bytes(&[0x01, 0x02, 0x90, 0x00]).unwrap();
        assert_eq!(resp.data.as_ref(), &[0x01, 0x02]);
        assert_eq!(resp.sw, 0x9000);
        assert!(resp.is_success());
    }

    #[test]
    fn response_rejects_too_short() {
        assert!(Response::from_bytes(&[0x90]).is_err());
    }
}
