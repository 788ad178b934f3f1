//! Opaque crypto object handles carried by [`StoreInfo`](crate::StoreInfo)
//!
//! The store never interprets DER contents. These types only hold the encoded
//! object so loaders can hand it to whatever decodes it further up the stack.
//! Sharing happens through `Arc`: every holder owns one strong reference.

use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

/// Key pair, public key or domain parameters
#[derive(Clone)]
pub struct PKey {
    label: String,
    der: Zeroizing<Vec<u8>>,
}

impl PKey {
    /// Wrap DER-encoded key material tagged with its armour label
    pub fn from_der(label: impl Into<String>, der: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            der: Zeroizing::new(der),
        }
    }

    /// Label the material was found under (e.g. `EC PRIVATE KEY`)
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Encoded key material
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// True when the label names private key material
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.label.ends_with("PRIVATE KEY")
    }
}

// Never print key bytes.
impl fmt::Debug for PKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PKey")
            .field("label", &self.label)
            .field("len", &self.der.len())
            .finish()
    }
}

/// X.509 certificate
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    /// Wrap a DER-encoded certificate
    #[must_use]
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Encoded certificate
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// SHA-256 over the encoded certificate
    #[must_use]
    pub fn fingerprint_sha256(&self) -> [u8; 32] {
        Sha256::digest(&self.der).into()
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("sha256", &hex::encode(self.fingerprint_sha256()))
            .finish()
    }
}

/// X.509 certificate revocation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationList {
    der: Vec<u8>,
}

impl RevocationList {
    /// Wrap a DER-encoded revocation list
    #[must_use]
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Encoded revocation list
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}
