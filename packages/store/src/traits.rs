//! Traits for pluggable store loaders
//!
//! A loader serves one URI scheme. Opening a URI produces a session
//! ([`LoaderCtx`]) that yields [`StoreInfo`] objects one at a time until it is
//! exhausted or fails. The front-end ([`StoreCtx`](crate::StoreCtx)) owns the
//! session and guarantees `close` is called at most once.

use crate::ui::UiHandle;
use crate::{Result, StoreError, StoreInfo};
use std::io::Read;

/// Argument to a loader control command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtrlArg {
    /// Integer argument
    Int(i64),
    /// String argument
    Str(String),
    /// Byte string argument
    Bytes(Vec<u8>),
}

/// Loader for one URI scheme
pub trait StoreLoader: Send + Sync {
    /// Scheme token this loader serves, e.g. `file`
    fn scheme(&self) -> &str;

    /// Open a session for `uri`
    ///
    /// `uri` is the full string the caller passed, scheme included. A loader
    /// that fails must not leave anything allocated behind.
    ///
    /// # Errors
    ///
    /// Any error that prevents the resource from being opened.
    fn open(&self, uri: &str, ui: Option<&UiHandle>) -> Result<Box<dyn LoaderCtx>>;

    /// Build a session around a reader the caller already opened
    ///
    /// # Errors
    ///
    /// The default implementation returns [`StoreError::Unsupported`].
    fn attach(&self, reader: Box<dyn Read + Send>) -> Result<Box<dyn LoaderCtx>> {
        drop(reader);
        Err(StoreError::unsupported(format!(
            "loader for scheme {:?} cannot attach to a stream",
            self.scheme()
        )))
    }
}

/// An open loader session
pub trait LoaderCtx: Send {
    /// Out-of-band control; `false` means unsupported or failed
    fn ctrl(&mut self, cmd: i32, args: &[CtrlArg]) -> bool {
        let _ = (cmd, args);
        false
    }

    /// Produce the next object
    ///
    /// `Ok(None)` signals the end of the sequence.
    ///
    /// # Errors
    ///
    /// Any failure while producing the object. [`error`](Self::error) must
    /// report `true` afterwards.
    fn load(&mut self, ui: Option<&UiHandle>) -> Result<Option<StoreInfo>>;

    /// True if the last operation left the session in an error state
    fn error(&self) -> bool;

    /// True once the sequence is exhausted
    fn eof(&self) -> bool;

    /// Release the session
    ///
    /// # Errors
    ///
    /// Any failure releasing backend resources. The session is gone either way.
    fn close(self: Box<Self>) -> Result<()>;

    /// Release the session and hand back an attached reader without closing it
    ///
    /// # Errors
    ///
    /// The default implementation returns [`StoreError::Unsupported`].
    fn detach(self: Box<Self>) -> Result<Box<dyn Read + Send>> {
        Err(StoreError::unsupported(
            "session was not attached to a stream",
        ))
    }
}
