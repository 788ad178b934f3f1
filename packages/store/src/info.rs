//! Result objects produced by loaders
//!
//! A [`StoreInfo`] is one retrieved item. Its kind is fixed when it is
//! constructed; the payload enum is private so nothing can swap it afterwards.
//!
//! Accessors come in two flavours:
//!
//! - borrow accessors (`name`, `pkey`, `cert`, ...) return `None` when the
//!   kind does not match, without raising an error
//! - take accessors (`to_name`, `to_pkey`, `to_cert`, ...) hand back an
//!   independently owned value (a copied string, or one more `Arc` holder)
//!   and fail with [`StoreError::KindMismatch`] on the wrong kind

use crate::objects::{Certificate, PKey, RevocationList};
use crate::{Result, StoreError};
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Kind tag of a [`StoreInfo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoType {
    /// A name, typically a locator that can be opened in turn
    Name,
    /// Domain parameters
    Params,
    /// A key pair or public key
    PKey,
    /// A certificate
    Cert,
    /// A certificate revocation list
    Crl,
    /// An undecoded nested record kept for later re-parsing
    Embedded,
}

impl InfoType {
    /// Stable lowercase name of the kind
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InfoType::Name => "name",
            InfoType::Params => "parameters",
            InfoType::PKey => "key",
            InfoType::Cert => "certificate",
            InfoType::Crl => "crl",
            InfoType::Embedded => "embedded",
        }
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum InfoData {
    Name {
        name: String,
        desc: Option<String>,
    },
    Params(Arc<PKey>),
    PKey(Arc<PKey>),
    Cert(Arc<Certificate>),
    Crl(Arc<RevocationList>),
    Embedded {
        blob: Zeroizing<Vec<u8>>,
        pem_name: Option<String>,
    },
}

/// A single retrieved item, tagged by kind
pub struct StoreInfo {
    data: InfoData,
}

impl StoreInfo {
    /// Create a name object
    pub fn new_name(name: impl Into<String>) -> Self {
        Self {
            data: InfoData::Name {
                name: name.into(),
                desc: None,
            },
        }
    }

    /// Create a parameters object holding one reference to `params`
    #[must_use]
    pub fn new_params(params: Arc<PKey>) -> Self {
        Self {
            data: InfoData::Params(params),
        }
    }

    /// Create a key object holding one reference to `pkey`
    #[must_use]
    pub fn new_pkey(pkey: Arc<PKey>) -> Self {
        Self {
            data: InfoData::PKey(pkey),
        }
    }

    /// Create a certificate object holding one reference to `cert`
    #[must_use]
    pub fn new_cert(cert: Arc<Certificate>) -> Self {
        Self {
            data: InfoData::Cert(cert),
        }
    }

    /// Create a revocation list object holding one reference to `crl`
    #[must_use]
    pub fn new_crl(crl: Arc<RevocationList>) -> Self {
        Self {
            data: InfoData::Crl(crl),
        }
    }

    /// Wrap an undecoded nested record
    ///
    /// The blob is owned by the new object; `pem_name` is copied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfMemory`] if the label cannot be copied.
    /// The blob is released in that case.
    pub fn new_embedded(blob: Vec<u8>, pem_name: Option<&str>) -> Result<Self> {
        let blob = Zeroizing::new(blob);
        let pem_name = pem_name.map(dup_str).transpose()?;
        Ok(Self {
            data: InfoData::Embedded { blob, pem_name },
        })
    }

    /// Attach a description to a name object
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if this is not a name object.
    pub fn set_name_description(&mut self, description: impl Into<String>) -> Result<()> {
        let kind = self.info_type();
        match &mut self.data {
            InfoData::Name { desc, .. } => {
                *desc = Some(description.into());
                Ok(())
            }
            _ => Err(StoreError::invalid_argument(format!(
                "cannot set a description on a {kind} object"
            ))),
        }
    }

    /// Kind of this object
    #[must_use]
    pub fn info_type(&self) -> InfoType {
        match &self.data {
            InfoData::Name { .. } => InfoType::Name,
            InfoData::Params(_) => InfoType::Params,
            InfoData::PKey(_) => InfoType::PKey,
            InfoData::Cert(_) => InfoType::Cert,
            InfoData::Crl(_) => InfoType::Crl,
            InfoData::Embedded { .. } => InfoType::Embedded,
        }
    }

    /// Borrow the name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            InfoData::Name { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Copy the name
    ///
    /// # Errors
    ///
    /// [`StoreError::KindMismatch`] if this is not a name object,
    /// [`StoreError::OutOfMemory`] if the copy cannot be allocated.
    pub fn to_name(&self) -> Result<String> {
        match &self.data {
            InfoData::Name { name, .. } => dup_str(name),
            _ => Err(self.mismatch(InfoType::Name)),
        }
    }

    /// Borrow the description of a name object, if one was set
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match &self.data {
            InfoData::Name { desc, .. } => desc.as_deref(),
            _ => None,
        }
    }

    /// Copy the description of a name object
    ///
    /// A name without a description yields an empty string.
    ///
    /// # Errors
    ///
    /// [`StoreError::KindMismatch`] if this is not a name object,
    /// [`StoreError::OutOfMemory`] if the copy cannot be allocated.
    pub fn to_description(&self) -> Result<String> {
        match &self.data {
            InfoData::Name { desc, .. } => dup_str(desc.as_deref().unwrap_or("")),
            _ => Err(self.mismatch(InfoType::Name)),
        }
    }

    /// Borrow the parameters
    #[must_use]
    pub fn params(&self) -> Option<&PKey> {
        match &self.data {
            InfoData::Params(params) => Some(params),
            _ => None,
        }
    }

    /// Take another reference to the parameters
    ///
    /// # Errors
    ///
    /// [`StoreError::KindMismatch`] if this is not a parameters object.
    pub fn to_params(&self) -> Result<Arc<PKey>> {
        match &self.data {
            InfoData::Params(params) => Ok(Arc::clone(params)),
            _ => Err(self.mismatch(InfoType::Params)),
        }
    }

    /// Borrow the key
    #[must_use]
    pub fn pkey(&self) -> Option<&PKey> {
        match &self.data {
            InfoData::PKey(pkey) => Some(pkey),
            _ => None,
        }
    }

    /// Take another reference to the key
    ///
    /// # Errors
    ///
    /// [`StoreError::KindMismatch`] if this is not a key object.
    pub fn to_pkey(&self) -> Result<Arc<PKey>> {
        match &self.data {
            InfoData::PKey(pkey) => Ok(Arc::clone(pkey)),
            _ => Err(self.mismatch(InfoType::PKey)),
        }
    }

    /// Borrow the certificate
    #[must_use]
    pub fn cert(&self) -> Option<&Certificate> {
        match &self.data {
            InfoData::Cert(cert) => Some(cert),
            _ => None,
        }
    }

    /// Take another reference to the certificate
    ///
    /// # Errors
    ///
    /// [`StoreError::KindMismatch`] if this is not a certificate object.
    pub fn to_cert(&self) -> Result<Arc<Certificate>> {
        match &self.data {
            InfoData::Cert(cert) => Ok(Arc::clone(cert)),
            _ => Err(self.mismatch(InfoType::Cert)),
        }
    }

    /// Borrow the revocation list
    #[must_use]
    pub fn crl(&self) -> Option<&RevocationList> {
        match &self.data {
            InfoData::Crl(crl) => Some(crl),
            _ => None,
        }
    }

    /// Take another reference to the revocation list
    ///
    /// # Errors
    ///
    /// [`StoreError::KindMismatch`] if this is not a revocation list object.
    pub fn to_crl(&self) -> Result<Arc<RevocationList>> {
        match &self.data {
            InfoData::Crl(crl) => Ok(Arc::clone(crl)),
            _ => Err(self.mismatch(InfoType::Crl)),
        }
    }

    /// Borrow the raw bytes of an embedded record
    #[must_use]
    pub fn embedded_blob(&self) -> Option<&[u8]> {
        match &self.data {
            InfoData::Embedded { blob, .. } => Some(blob),
            _ => None,
        }
    }

    /// Borrow the label of an embedded record, if it has one
    #[must_use]
    pub fn embedded_pem_name(&self) -> Option<&str> {
        match &self.data {
            InfoData::Embedded { pem_name, .. } => pem_name.as_deref(),
            _ => None,
        }
    }

    fn mismatch(&self, expected: InfoType) -> StoreError {
        StoreError::KindMismatch {
            expected,
            actual: self.info_type(),
        }
    }
}

impl fmt::Debug for StoreInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            InfoData::Name { name, desc } => f
                .debug_struct("StoreInfo::Name")
                .field("name", name)
                .field("description", desc)
                .finish(),
            InfoData::Params(params) => f.debug_tuple("StoreInfo::Params").field(params).finish(),
            InfoData::PKey(pkey) => f.debug_tuple("StoreInfo::PKey").field(pkey).finish(),
            InfoData::Cert(cert) => f.debug_tuple("StoreInfo::Cert").field(cert).finish(),
            InfoData::Crl(crl) => f.debug_tuple("StoreInfo::Crl").field(crl).finish(),
            InfoData::Embedded { blob, pem_name } => f
                .debug_struct("StoreInfo::Embedded")
                .field("pem_name", pem_name)
                .field("len", &blob.len())
                .finish(),
        }
    }
}

fn dup_str(s: &str) -> Result<String> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())?;
    out.push_str(s);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_description_roundtrip() {
        let mut info = StoreInfo::new_name("alias1");
        assert_eq!(info.description(), None);
        assert_eq!(info.to_description().unwrap(), "");

        info.set_name_description("first key").unwrap();
        assert_eq!(info.name(), Some("alias1"));
        assert_eq!(info.to_description().unwrap(), "first key");
    }

    #[test]
    fn description_rejected_on_other_kinds() {
        let mut info = StoreInfo::new_embedded(vec![1, 2, 3], None).unwrap();
        let err = info.set_name_description("nope").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert_eq!(info.info_type(), InfoType::Embedded);
    }

    #[test]
    fn embedded_keeps_label_and_bytes() {
        let info = StoreInfo::new_embedded(vec![0x30, 0x00], Some("ENCRYPTED PRIVATE KEY")).unwrap();
        assert_eq!(info.embedded_blob(), Some(&[0x30, 0x00][..]));
        assert_eq!(info.embedded_pem_name(), Some("ENCRYPTED PRIVATE KEY"));
        assert!(info.name().is_none());
    }

    #[test]
    fn take_adds_one_reference() {
        let cert = Arc::new(Certificate::from_der(vec![0x30, 0x00]));
        let info = StoreInfo::new_cert(Arc::clone(&cert));
        assert_eq!(Arc::strong_count(&cert), 2);

        let taken = info.to_cert().unwrap();
        assert_eq!(Arc::strong_count(&cert), 3);

        drop(info);
        assert_eq!(Arc::strong_count(&taken), 2);
        assert_eq!(taken.der(), cert.der());
    }

    #[test]
    fn mismatched_take_produces_nothing() {
        let key = Arc::new(PKey::from_der("PRIVATE KEY", vec![1]));
        let info = StoreInfo::new_pkey(Arc::clone(&key));

        let err = info.to_cert().unwrap_err();
        assert!(err.is_kind_mismatch());
        assert!(matches!(
            err,
            StoreError::KindMismatch {
                expected: InfoType::Cert,
                actual: InfoType::PKey
            }
        ));
        assert!(info.to_params().is_err());
        assert!(info.to_name().is_err());
        assert!(info.cert().is_none());
        assert_eq!(Arc::strong_count(&key), 2);
    }

    #[test]
    fn params_and_keys_are_distinct_kinds() {
        let params = StoreInfo::new_params(Arc::new(PKey::from_der("EC PARAMETERS", vec![6])));
        assert_eq!(params.info_type(), InfoType::Params);
        assert!(params.pkey().is_none());
        assert_eq!(params.params().map(PKey::label), Some("EC PARAMETERS"));

        let crl = StoreInfo::new_crl(Arc::new(RevocationList::from_der(vec![0x30])));
        assert_eq!(crl.to_crl().unwrap().der(), [0x30]);
    }

    #[test]
    fn take_params_and_crl_add_one_reference() {
        let key = Arc::new(PKey::from_der("EC PARAMETERS", vec![6]));
        let params = StoreInfo::new_params(Arc::clone(&key));
        assert_eq!(Arc::strong_count(&key), 2);
        let taken = params.to_params().unwrap();
        assert_eq!(Arc::strong_count(&key), 3);
        drop(params);
        assert_eq!(Arc::strong_count(&taken), 2);

        let list = Arc::new(RevocationList::from_der(vec![0x30]));
        let crl = StoreInfo::new_crl(Arc::clone(&list));
        assert_eq!(Arc::strong_count(&list), 2);
        let taken = crl.to_crl().unwrap();
        assert_eq!(Arc::strong_count(&list), 3);
        drop(crl);
        assert_eq!(Arc::strong_count(&taken), 2);
    }

    #[test]
    fn info_type_names() {
        assert_eq!(InfoType::Cert.to_string(), "certificate");
        assert_eq!(InfoType::PKey.to_string(), "key");
    }
}
