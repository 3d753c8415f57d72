pub mod hotp;
pub mod totp;
