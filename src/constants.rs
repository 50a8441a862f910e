//! Protocol constants: the applet AID, instruction bytes, and fixed
//! cryptographic parameters from the secure channel specification.

/// Applet AID used to SELECT the hardware wallet application.
pub const APPLET_AID: [u8; 15] = [
    0x53, 0x74, 0x61, 0x74, 0x75, 0x73, 0x57, 0x61, 0x6C, 0x6C, 0x65, 0x74, 0x41, 0x70, 0x70,
];

/// Standard `CLA` byte used by every applet-specific instruction.
pub const CLA_PROPRIETARY: u8 = 0x80;
/// `CLA` byte used only by SELECT.
pub const CLA_ISO: u8 = 0x00;

pub mod ins {
    //! Instruction bytes, keyed by their protocol role.
    pub const SELECT: u8 = 0xA4;
    pub const OPEN_SECURE_CHANNEL: u8 = 0x10;
    pub const MUTUALLY_AUTHENTICATE: u8 = 0x11;
    pub const PAIR: u8 = 0x12;
    pub const UNPAIR: u8 = 0x13;
    pub const VERIFY_PIN: u8 = 0x20;
    pub const CHANGE_PIN: u8 = 0x21;
    pub const UNBLOCK_PIN: u8 = 0x22;
    pub const SIGN: u8 = 0xC0;
    pub const SET_PINLESS_PATH: u8 = 0xC1;
    pub const EXPORT_KEY: u8 = 0xC2;
    pub const LOAD_KEY: u8 = 0xD0;
    pub const DERIVE_KEY: u8 = 0xD1;
    pub const GENERATE_MNEMONIC: u8 = 0xD2;
    pub const REMOVE_KEY: u8 = 0xD3;
    pub const GENERATE_KEY: u8 = 0xD4;
    pub const GET_STATUS: u8 = 0xF2;
    pub const SET_NDEF: u8 = 0xF2;
    pub const INIT: u8 = 0xFE;
}

pub mod tags {
    //! TLV tags used in SELECT responses and LOAD KEY payloads.
    pub const APPLICATION_INFO_TEMPLATE: u8 = 0xA4;
    pub const BARE_PUBLIC_KEY: u8 = 0x80;
    pub const KEYPAIR_TEMPLATE: u8 = 0xA1;
    pub const ECC_PUBLIC_KEY: u8 = 0x80;
    pub const ECC_PRIVATE_KEY: u8 = 0x81;
    pub const CHAIN_CODE: u8 = 0x82;
}

/// Status word for success.
pub const SW_SUCCESS: u16 = 0x9000;
/// Status word the card returns when the secure channel's security status
/// is no longer satisfied; observing it on an unwrap closes the session.
pub const SW_SECURITY_STATUS_NOT_SATISFIED: u16 = 0x6982;

/// Length of an uncompressed secp256k1 point (`0x04 ‖ X ‖ Y`).
pub const UNCOMPRESSED_POINT_LEN: usize = 65;
/// Maximum plaintext payload accepted by `wrap`.
pub const MAX_WRAPPED_PLAINTEXT: usize = 223;
/// Number of concurrent pairings the card supports.
pub const MAX_PAIRINGS: u8 = 5;

/// Salt used when deriving a pairing shared secret from a pairing password.
pub const PAIRING_SALT: &str = "Status Hardware Wallet Lite";
/// PBKDF2 iteration count for pairing secret derivation.
pub const PAIRING_PBKDF2_ITERATIONS: u32 = 50_000;
/// Output length, in bytes, of the derived pairing secret.
pub const PAIRING_SECRET_LEN: usize = 32;
