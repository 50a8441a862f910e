//! The outer command set: a thin, stateless formatter over
//! [`SecureChannelSession`] for each applet instruction.
//!
//! `CommandSet` never interprets response data semantically beyond what is
//! needed to drive the secure channel itself (the SELECT response). Every
//! other command forwards the card's `(data, sw)` to the caller untouched.

use bytes::Bytes;

use crate::apdu::{ApduTransport, Command, Response};
use crate::constants::{ins, tags, CLA_ISO, CLA_PROPRIETARY, APPLET_AID};
use crate::error::{Error, Result};
use crate::primitives::{CryptoPrimitives, DefaultPrimitives};
use crate::session::SecureChannelSession;
use crate::types::ApplicationInfo;

/// Where a DERIVE KEY operation starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriveFrom {
    Master,
    Parent,
    Current,
}

impl DeriveFrom {
    fn p1(self) -> u8 {
        match self {
            DeriveFrom::Master => 0x00,
            DeriveFrom::Parent => 0x40,
            DeriveFrom::Current => 0x80,
        }
    }
}

/// The result of SELECT: either an initialized applet's info template, or a
/// pre-initialized applet exposing only its bare public key.
#[derive(Debug)]
pub enum SelectResult {
    Initialized(ApplicationInfo),
    PreInitialized,
}

/// Stateless command formatter over an open or closed
/// [`SecureChannelSession`].
pub struct CommandSet<'a, C: CryptoPrimitives = DefaultPrimitives> {
    transport: &'a mut dyn ApduTransport,
    session: &'a mut SecureChannelSession<C>,
}

impl<'a, C: CryptoPrimitives> CommandSet<'a, C> {
    pub fn new(transport: &'a mut dyn ApduTransport, session: &'a mut SecureChannelSession<C>) -> Self {
        Self { transport, session }
    }

    fn call(&mut self, cla: u8, ins: u8, p1: u8, p2: u8, data: &[u8]) -> Result<Response> {
        let cmd = self.session.wrap(cla, ins, p1, p2, data)?;
        let raw = self.transport.transmit(&cmd)?;
        self.session.unwrap(&raw)
    }

    /// SELECT the applet, extract the card's public key, and feed it into
    /// the secure channel session.
    pub fn select(&mut self) -> Result<SelectResult> {
        let cmd = Command::with_data(
            CLA_ISO,
            ins::SELECT,
            0x04,
            0x00,
            Bytes::copy_from_slice(&APPLET_AID),
        );
        let response = self.transport.transmit(&cmd)?;
        if response.sw != crate::constants::SW_SUCCESS {
            return Err(Error::UnexpectedResponse);
        }
        let data = &response.data;
        if data.is_empty() {
            return Err(Error::UnexpectedResponse);
        }

        match data[0] {
            t if t == tags::APPLICATION_INFO_TEMPLATE => {
                if data.len() < 22 {
                    return Err(Error::UnexpectedResponse);
                }
                let key_len = data[21] as usize;
                let key_start = 22;
                if data.len() < key_start + key_len {
                    return Err(Error::UnexpectedResponse);
                }
                let public_key = Bytes::copy_from_slice(&data[key_start..key_start + key_len]);
                self.session.ingest_card_public_key(&public_key)?;

                let info = ApplicationInfo {
                    instance_uid: Bytes::copy_from_slice(&data[2..18]),
                    public_key,
                    version: Bytes::new(),
                    remaining_pairing_slots: 0,
                    key_uid: Bytes::new(),
                    capabilities: None,
                };
                Ok(SelectResult::Initialized(info))
            }
            t if t == tags::BARE_PUBLIC_KEY => {
                if data.len() < 2 {
                    return Err(Error::UnexpectedResponse);
                }
                let public_key = &data[2..];
                self.session.ingest_card_public_key(public_key)?;
                Ok(SelectResult::PreInitialized)
            }
            _ => Err(Error::UnexpectedResponse),
        }
    }

    /// Pair with the card using a pairing password.
    pub fn pair(&mut self, pairing_password: &str) -> Result<()> {
        self.session.auto_pair(self.transport, pairing_password)?;
        Ok(())
    }

    /// Open the secure channel and complete mutual authentication.
    pub fn open_secure_channel(&mut self) -> Result<()> {
        self.session.auto_open_secure_channel(self.transport)
    }

    /// Unpair the current session's pairing slot.
    pub fn unpair(&mut self) -> Result<()> {
        self.session.auto_unpair(self.transport)
    }

    /// Unpair every other slot, leaving only this session's pairing.
    pub fn unpair_others(&mut self) -> Result<()> {
        self.session.unpair_others(self.transport)
    }

    pub fn verify_pin(&mut self, pin: &str) -> Result<u16> {
        let resp = self.call(CLA_PROPRIETARY, ins::VERIFY_PIN, 0, 0, pin.as_bytes())?;
        Ok(resp.sw)
    }

    pub fn change_pin(&mut self, pin_type: u8, pin: &[u8]) -> Result<u16> {
        let resp = self.call(CLA_PROPRIETARY, ins::CHANGE_PIN, pin_type, 0, pin)?;
        Ok(resp.sw)
    }

    pub fn unblock_pin(&mut self, puk: &str, new_pin: &str) -> Result<u16> {
        let mut data = Vec::with_capacity(puk.len() + new_pin.len());
        data.extend_from_slice(puk.as_bytes());
        data.extend_from_slice(new_pin.as_bytes());
        let resp = self.call(CLA_PROPRIETARY, ins::UNBLOCK_PIN, 0, 0, &data)?;
        Ok(resp.sw)
    }

    /// LOAD KEY from a raw BIP39 seed: `priv_scalar (leading 0x00 stripped) ‖ chain_code`.
    pub fn load_key_seed(&mut self, priv_scalar: &[u8], chain_code: &[u8; 32]) -> Result<Response> {
        let trimmed = strip_leading_zero(priv_scalar);
        let mut data = Vec::with_capacity(trimmed.len() + 32);
        data.extend_from_slice(trimmed);
        data.extend_from_slice(chain_code);
        self.call(CLA_PROPRIETARY, ins::LOAD_KEY, 0x03, 0, &data)
    }

    /// LOAD KEY from a TLV-encoded keypair, optionally with a chain code.
    pub fn load_key_pair(
        &mut self,
        public_key: Option<&[u8]>,
        private_key: &[u8],
        chain_code: Option<&[u8; 32]>,
    ) -> Result<Response> {
        let data = build_keypair_tlv(public_key, private_key, chain_code);
        let p1 = if chain_code.is_some() { 0x02 } else { 0x01 };
        self.call(CLA_PROPRIETARY, ins::LOAD_KEY, p1, 0, &data)
    }

    pub fn generate_key(&mut self) -> Result<Response> {
        self.call(CLA_PROPRIETARY, ins::GENERATE_KEY, 0, 0, &[])
    }

    pub fn remove_key(&mut self) -> Result<Response> {
        self.call(CLA_PROPRIETARY, ins::REMOVE_KEY, 0, 0, &[])
    }

    pub fn generate_mnemonic(&mut self, checksum_length: u8) -> Result<Response> {
        self.call(CLA_PROPRIETARY, ins::GENERATE_MNEMONIC, checksum_length, 0, &[])
    }

    pub fn sign(&mut self, hash: &[u8]) -> Result<Response> {
        if hash.len() != 32 {
            return Err(Error::InvalidInput("sign requires a 32-byte hash"));
        }
        self.call(CLA_PROPRIETARY, ins::SIGN, 0, 0, hash)
    }

    pub fn derive_key(&mut self, path: &[u32], from: DeriveFrom) -> Result<Response> {
        let data = encode_path(path);
        self.call(CLA_PROPRIETARY, ins::DERIVE_KEY, from.p1(), 0, &data)
    }

    pub fn set_pinless_path(&mut self, path: &[u32]) -> Result<Response> {
        let data = encode_path(path);
        self.call(CLA_PROPRIETARY, ins::SET_PINLESS_PATH, 0, 0, &data)
    }

    pub fn export_key(&mut self, key_path_index: u8, public_only: bool) -> Result<Response> {
        let p2 = if public_only { 0x01 } else { 0x00 };
        self.call(CLA_PROPRIETARY, ins::EXPORT_KEY, key_path_index, p2, &[])
    }

    pub fn get_status(&mut self, info: u8) -> Result<Response> {
        self.call(CLA_PROPRIETARY, ins::GET_STATUS, info, 0, &[])
    }

    /// Convenience wrapper over `get_status(0x00)`.
    pub fn get_key_initialization_status(&mut self) -> Result<bool> {
        let resp = self.get_status(0x00)?;
        Ok(resp.data.last().copied().unwrap_or(0) != 0x00)
    }

    pub fn set_ndef(&mut self, data: &[u8]) -> Result<Response> {
        self.call(CLA_PROPRIETARY, ins::SET_NDEF, 0, 0, data)
    }

    /// One-shot unprotected INIT used before any session exists, to set the
    /// initial PIN/PUK/pairing secret on a virgin applet.
    pub fn init(&mut self, pin: &str, puk: &str, pairing_password: &str) -> Result<Response> {
        let shared_secret =
            crate::crypto::derive_pairing_secret(&DefaultPrimitives, pairing_password);
        let mut init_data = Vec::with_capacity(pin.len() + puk.len() + shared_secret.len());
        init_data.extend_from_slice(pin.as_bytes());
        init_data.extend_from_slice(puk.as_bytes());
        init_data.extend_from_slice(&shared_secret);

        let payload = self.session.one_shot_encrypt(&init_data)?;
        let cmd = Command::with_data(CLA_PROPRIETARY, ins::INIT, 0, 0, payload);
        Ok(self.transport.transmit(&cmd)?)
    }
}

fn strip_leading_zero(bytes: &[u8]) -> &[u8] {
    if bytes.first() == Some(&0x00) {
        &bytes[1..]
    } else {
        bytes
    }
}

fn encode_path(path: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(path.len() * 4);
    for component in path {
        out.extend_from_slice(&component.to_be_bytes());
    }
    out
}

fn build_keypair_tlv(
    public_key: Option<&[u8]>,
    private_key: &[u8],
    chain_code: Option<&[u8; 32]>,
) -> Vec<u8> {
    let private_key = strip_leading_zero(private_key);

    let mut inner = Vec::new();
    inner.push(tags::ECC_PRIVATE_KEY);
    inner.push(private_key.len() as u8);
    inner.extend_from_slice(private_key);

    if let Some(public_key) = public_key {
        inner.push(tags::ECC_PUBLIC_KEY);
        inner.push(public_key.len() as u8);
        inner.extend_from_slice(public_key);
    }

    if let Some(chain_code) = chain_code {
        inner.push(tags::CHAIN_CODE);
        inner.push(chain_code.len() as u8);
        inner.extend_from_slice(chain_code);
    }

    let mut out = Vec::with_capacity(inner.len() + 4);
    out.push(tags::KEYPAIR_TEMPLATE);
    if inner.len() < 128 {
        out.push(inner.len() as u8);
    } else {
        out.push(0x81);
        out.push(inner.len() as u8);
    }
    out.extend_from_slice(&inner);
    out
}
