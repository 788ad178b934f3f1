//! # Cyrup Credential Store
//!
//! URI-addressed retrieval of keys, certificates and revocation lists.
//!
//! ## Features
//!
//! - **Scheme Dispatch**: the text before the first `:` selects a loader
//! - **Pluggable Loaders**: register your own [`StoreLoader`] per scheme
//! - **Typed Results**: every object is a [`StoreInfo`] with a fixed kind
//! - **Post-Processing**: filter or transform objects as they are loaded
//! - **Stream Attach**: read PEM from a reader you already hold
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cryypt_store::prelude::*;
//!
//! # fn main() -> cryypt_store::Result<()> {
//! let mut ctx = StoreCtx::open("/etc/ssl/certs/ca-certificates.crt")?;
//!
//! for info in ctx.iter() {
//!     let info = info?;
//!     if let Some(cert) = info.cert() {
//!         println!("{}", hex::encode(cert.fingerprint_sha256()));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod ctx;
pub mod error;
pub mod info;
pub mod load_result;
pub mod objects;
pub mod registry;
pub mod session_status;
pub mod store;
pub mod traits;
pub mod ui;
pub mod uri;

// Re-export core types
pub use error::{Result, StoreError};
pub use info::{InfoType, StoreInfo};
pub use objects::{Certificate, PKey, RevocationList};

pub use config::{FileLoaderConfig, StoreConfig};
pub use ctx::{Loads, PostProcess, StoreCtx, StoreCtxBuilder};
pub use load_result::{LoadAllResult, LoadAllResultWithHandler};
pub use registry::{LoaderRegistry, default_registry};
pub use session_status::{SessionStatus, SessionStatusTracking};
pub use store::FileLoader;
pub use traits::{CtrlArg, LoaderCtx, StoreLoader};
pub use ui::{FixedPassphrase, PassphrasePrompt, PromptRequest, UiHandle};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        InfoType, LoaderRegistry, Result, StoreCtx, StoreError, StoreInfo, StoreLoader,
        objects::{Certificate, PKey, RevocationList},
    };
}
