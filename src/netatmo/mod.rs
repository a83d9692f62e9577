//! Netatmo cloud API integration
//!
//! - `token`: OAuth2 password grant, shared access token
//! - `client`: form-encoded POST forwarding
//! - `envelope`: status/body normalization

pub mod client;
pub mod envelope;
pub mod token;

pub use client::{NetatmoClient, VendorApi};
pub use envelope::ResponseEnvelope;
