//! Sessions opened by the file loader
//!
//! A regular file or attached stream is read as a sequence of PEM blocks, a
//! directory is listed as names.

use super::pem::read_block;
use crate::session_status::{SessionStatus, SessionStatusTracking};
use crate::traits::LoaderCtx;
use crate::ui::UiHandle;
use crate::{Result, StoreError, StoreInfo};
use std::io::{BufRead, BufReader, Read};

/// First byte of a DER SEQUENCE
const DER_SEQUENCE: u8 = 0x30;

/// PEM stream over a file or a caller-supplied reader
pub(super) struct PemSession {
    reader: BufReader<Box<dyn Read + Send>>,
    budget: u64,
    status: SessionStatus,
    attached: bool,
    sniffed: bool,
}

impl PemSession {
    /// Session over a file the loader opened itself
    pub fn open(reader: Box<dyn Read + Send>, max_input_size: u64) -> Self {
        Self {
            reader: BufReader::new(reader),
            budget: max_input_size,
            status: SessionStatus::Ready,
            attached: false,
            sniffed: false,
        }
    }

    /// Session over a reader owned by the caller
    pub fn attach(reader: Box<dyn Read + Send>, max_input_size: u64) -> Self {
        Self {
            attached: true,
            // attached streams are always PEM, never raw DER
            sniffed: true,
            ..Self::open(reader, max_input_size)
        }
    }

    fn next_info(&mut self) -> Result<Option<StoreInfo>> {
        if !self.sniffed {
            self.sniffed = true;
            if self.reader.fill_buf()?.first() == Some(&DER_SEQUENCE) {
                return self.read_der().map(Some);
            }
        }

        match read_block(&mut self.reader, &mut self.budget)? {
            Some(block) => block.into_info().map(Some),
            None => Ok(None),
        }
    }

    /// Whole input as one unlabeled embedded record
    fn read_der(&mut self) -> Result<StoreInfo> {
        let mut der = Vec::new();
        let limit = self.budget.saturating_add(1);
        let read = self.reader.by_ref().take(limit).read_to_end(&mut der)? as u64;
        if read > self.budget {
            return Err(StoreError::Decode(
                "input exceeds the configured size limit".into(),
            ));
        }
        self.budget -= read;
        // nothing else can follow a raw DER object
        self.status = SessionStatus::Exhausted;
        StoreInfo::new_embedded(der, None)
    }
}

impl SessionStatusTracking for PemSession {
    fn status(&self) -> &SessionStatus {
        &self.status
    }

    fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }
}

impl LoaderCtx for PemSession {
    fn load(&mut self, _ui: Option<&UiHandle>) -> Result<Option<StoreInfo>> {
        if self.status.is_exhausted() {
            return Ok(None);
        }

        match self.next_info() {
            Ok(Some(info)) => {
                if !self.status.is_exhausted() {
                    self.status = SessionStatus::Ready;
                }
                tracing::trace!(kind = %info.info_type(), "Loaded PEM object");
                Ok(Some(info))
            }
            Ok(None) => {
                self.status = SessionStatus::Exhausted;
                Ok(None)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn error(&self) -> bool {
        self.last_operation_failed()
    }

    fn eof(&self) -> bool {
        self.status.is_exhausted()
    }

    fn close(self: Box<Self>) -> Result<()> {
        if self.attached {
            tracing::debug!("Attached stream closed instead of detached");
        }
        Ok(())
    }

    fn detach(self: Box<Self>) -> Result<Box<dyn Read + Send>> {
        if !self.attached {
            return Err(StoreError::unsupported(
                "session was opened from a URI, not attached to a stream",
            ));
        }
        Ok(Box::new(self.reader))
    }
}

/// Directory listing, one name per entry
pub(super) struct DirSession {
    base: String,
    entries: std::vec::IntoIter<String>,
    status: SessionStatus,
}

impl DirSession {
    /// `base` is the URI the directory was opened with
    pub fn new(base: &str, mut entries: Vec<String>) -> Self {
        entries.sort();
        Self {
            base: base.trim_end_matches('/').to_string(),
            entries: entries.into_iter(),
            status: SessionStatus::Ready,
        }
    }
}

impl SessionStatusTracking for DirSession {
    fn status(&self) -> &SessionStatus {
        &self.status
    }

    fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }
}

impl LoaderCtx for DirSession {
    fn load(&mut self, _ui: Option<&UiHandle>) -> Result<Option<StoreInfo>> {
        match self.entries.next() {
            Some(entry) => Ok(Some(StoreInfo::new_name(format!("{}/{entry}", self.base)))),
            None => {
                self.status = SessionStatus::Exhausted;
                Ok(None)
            }
        }
    }

    fn error(&self) -> bool {
        self.last_operation_failed()
    }

    fn eof(&self) -> bool {
        self.status.is_exhausted()
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InfoType;
    use std::io::Cursor;

    const TWO_CERTS: &str = "-----BEGIN CERTIFICATE-----\nMAA=\n-----END CERTIFICATE-----\n\
                             -----BEGIN CERTIFICATE-----\nMAMCAQE=\n-----END CERTIFICATE-----\n";

    fn reader(bytes: &[u8]) -> Box<dyn Read + Send> {
        Box::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn pem_session_reaches_eof() {
        let mut session = PemSession::open(reader(TWO_CERTS.as_bytes()), u64::MAX);
        assert_eq!(session.load(None).unwrap().unwrap().info_type(), InfoType::Cert);
        assert!(!session.eof());
        assert_eq!(session.load(None).unwrap().unwrap().info_type(), InfoType::Cert);
        assert!(session.load(None).unwrap().is_none());
        assert!(session.eof());
        assert!(!session.error());
    }

    #[test]
    fn raw_der_is_one_embedded_record() {
        let mut session = PemSession::open(reader(&[0x30, 0x03, 0x02, 0x01, 0x01]), 1024);
        let info = session.load(None).unwrap().unwrap();
        assert_eq!(info.info_type(), InfoType::Embedded);
        assert_eq!(info.embedded_pem_name(), None);
        assert_eq!(info.embedded_blob().map(<[u8]>::len), Some(5));
        assert!(session.eof());
        assert!(session.load(None).unwrap().is_none());
    }

    #[test]
    fn raw_der_respects_size_limit() {
        let mut session = PemSession::open(reader(&[0x30; 64]), 16);
        assert!(session.load(None).is_err());
        assert!(session.error());
    }

    #[test]
    fn decode_failure_sets_error() {
        let text = "-----BEGIN CERTIFICATE-----\n@@@@\n-----END CERTIFICATE-----\n";
        let mut session = PemSession::open(reader(text.as_bytes()), u64::MAX);
        assert!(session.load(None).is_err());
        assert!(session.error());
        assert!(!session.eof());
    }

    #[test]
    fn detach_only_for_attached_sessions() {
        let opened: Box<dyn LoaderCtx> = Box::new(PemSession::open(reader(b""), 16));
        assert!(matches!(opened.detach(), Err(StoreError::Unsupported(_))));

        let attached: Box<dyn LoaderCtx> = Box::new(PemSession::attach(reader(b"rest"), 16));
        let mut back = attached.detach().unwrap();
        let mut remaining = String::new();
        back.read_to_string(&mut remaining).unwrap();
        assert_eq!(remaining, "rest");
    }

    #[test]
    fn directory_names_are_sorted_and_prefixed() {
        let mut session = DirSession::new(
            "file:/etc/certs/",
            vec!["b.pem".to_string(), "a.pem".to_string()],
        );
        let first = session.load(None).unwrap().unwrap();
        assert_eq!(first.name(), Some("file:/etc/certs/a.pem"));
        let second = session.load(None).unwrap().unwrap();
        assert_eq!(second.name(), Some("file:/etc/certs/b.pem"));
        assert!(session.load(None).unwrap().is_none());
        assert!(session.eof());
    }
}
