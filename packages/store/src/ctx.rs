//! Retrieval context: the caller-facing handle on one loader session
//!
//! ```rust,no_run
//! use cryypt_store::{InfoType, StoreCtx};
//!
//! # fn main() -> cryypt_store::Result<()> {
//! let mut ctx = StoreCtx::builder()
//!     .with_post_process(|info| (info.info_type() == InfoType::Cert).then_some(info))
//!     .open("file:/etc/ssl/certs/ca-certificates.crt")?;
//!
//! while let Some(info) = ctx.load()? {
//!     println!("{info:?}");
//! }
//! ctx.close()?;
//! # Ok(())
//! # }
//! ```

use crate::config::{DEFAULT_SCHEME, StoreConfig};
use crate::load_result::LoadAllResult;
use crate::registry::{LoaderRegistry, default_registry};
use crate::traits::{CtrlArg, LoaderCtx, StoreLoader};
use crate::ui::UiHandle;
use crate::uri::scheme_of;
use crate::{Result, StoreError, StoreInfo};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Caller hook applied to every loaded object
///
/// Returning `None` discards the object; the context then asks the loader
/// for the next one.
pub type PostProcess = Box<dyn FnMut(StoreInfo) -> Option<StoreInfo> + Send>;

/// An open session against one loader
///
/// A context is bound to the loader it was opened with for its whole life.
/// It is `Send` but not `Sync`: drive it from one thread at a time.
pub struct StoreCtx {
    loader: Arc<dyn StoreLoader>,
    // Some until close, detach or drop takes it
    session: Option<Box<dyn LoaderCtx>>,
    ui: Option<UiHandle>,
    post_process: Option<PostProcess>,
    // built by attach; only these contexts may detach
    attached: bool,
}

/// Builder for [`StoreCtx`]
#[derive(Default)]
pub struct StoreCtxBuilder {
    registry: Option<Arc<LoaderRegistry>>,
    config: Option<StoreConfig>,
    ui: Option<UiHandle>,
    post_process: Option<PostProcess>,
}

impl StoreCtxBuilder {
    /// Resolve schemes through `registry` instead of the default one
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<LoaderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use `config` for scheme parsing
    ///
    /// Without an explicit registry the built-in loaders are configured from
    /// it as well.
    #[must_use]
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Prompt handle passed to the loader
    #[must_use]
    pub fn with_ui(mut self, ui: UiHandle) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Filter or transform each loaded object
    #[must_use]
    pub fn with_post_process<F>(mut self, post_process: F) -> Self
    where
        F: FnMut(StoreInfo) -> Option<StoreInfo> + Send + 'static,
    {
        self.post_process = Some(Box::new(post_process));
        self
    }

    /// Open `uri`
    ///
    /// The scheme is everything before the first `:`; without one the URI is
    /// handed to the default (`file`) loader. The loader always receives the
    /// full URI.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SchemeTooLong`] if the scheme exceeds the configured bound
    /// - [`StoreError::UnsupportedScheme`] if no loader serves the scheme
    /// - [`StoreError::LoaderOpen`] if the loader could not open the resource
    pub fn open(self, uri: &str) -> Result<StoreCtx> {
        let registry = match (self.registry, &self.config) {
            (Some(registry), _) => registry,
            (None, Some(config)) => Arc::new(LoaderRegistry::from_config(config)),
            (None, None) => default_registry(),
        };
        let config = self.config.unwrap_or_default();

        let scheme = scheme_of(uri, &config.default_scheme, config.max_scheme_len)
            .inspect_err(|e| warn!(error = %e, "Rejected store URI"))?;

        let loader = registry
            .lookup(scheme)
            .inspect_err(|e| warn!(error = %e, "No loader for store URI"))?;

        let session = loader.open(uri, self.ui.as_ref()).map_err(|source| {
            warn!(scheme, error = %source, "Loader failed to open resource");
            StoreError::LoaderOpen {
                scheme: scheme.to_string(),
                source: Box::new(source),
            }
        })?;

        debug!(scheme, "Opened store context");
        Ok(StoreCtx {
            loader,
            session: Some(session),
            ui: self.ui,
            post_process: self.post_process,
            attached: false,
        })
    }
}

impl StoreCtx {
    /// Start configuring a context
    #[must_use]
    pub fn builder() -> StoreCtxBuilder {
        StoreCtxBuilder::default()
    }

    /// Open `uri` through the default registry with no prompt and no filter
    ///
    /// # Errors
    ///
    /// See [`StoreCtxBuilder::open`].
    pub fn open(uri: &str) -> Result<Self> {
        Self::builder().open(uri)
    }

    /// Build a context around a reader the caller already opened
    ///
    /// The reader is read as a PEM stream by the default registry's `file`
    /// loader. Use [`detach`](Self::detach) to get it back afterwards.
    ///
    /// Attach is always served by the `file` loader, whatever
    /// [`StoreConfig::default_scheme`] says; no other built-in loader reads
    /// streams.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnsupportedScheme`] if the registry has no `file`
    /// loader, or whatever the loader's attach returns.
    pub fn attach(reader: impl Read + Send + 'static, ui: Option<UiHandle>) -> Result<Self> {
        Self::attach_with(&default_registry(), reader, ui)
    }

    /// [`attach`](Self::attach) through an explicit registry
    ///
    /// # Errors
    ///
    /// See [`attach`](Self::attach).
    pub fn attach_with(
        registry: &LoaderRegistry,
        reader: impl Read + Send + 'static,
        ui: Option<UiHandle>,
    ) -> Result<Self> {
        let loader = registry.lookup(DEFAULT_SCHEME)?;
        let session = loader.attach(Box::new(reader))?;

        debug!(scheme = loader.scheme(), "Attached store context to stream");
        Ok(Self {
            loader,
            session: Some(session),
            ui,
            post_process: None,
            attached: true,
        })
    }

    /// Scheme of the loader this context is bound to
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.loader.scheme()
    }

    /// Send a control command to the loader
    ///
    /// Returns `false` if the loader does not support the command.
    pub fn ctrl(&mut self, cmd: i32, args: &[CtrlArg]) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.ctrl(cmd, args))
    }

    /// Next object, or `Ok(None)` once the loader is exhausted
    ///
    /// Objects discarded by the post-process filter are skipped and never
    /// count as the end of the sequence.
    ///
    /// # Errors
    ///
    /// Any loader failure. [`error`](Self::error) reports `true` afterwards.
    pub fn load(&mut self) -> Result<Option<StoreInfo>> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| StoreError::internal("store context has no session"))?;

        loop {
            let Some(info) = session.load(self.ui.as_ref())? else {
                return Ok(None);
            };

            let Some(post_process) = self.post_process.as_mut() else {
                return Ok(Some(info));
            };

            let kind = info.info_type();
            match post_process(info) {
                Some(info) => return Ok(Some(info)),
                None => trace!(%kind, "Post-process discarded object"),
            }
        }
    }

    /// Iterate over the remaining objects
    ///
    /// Iteration stops at the end of the sequence or right after the first
    /// error.
    pub fn iter(&mut self) -> Loads<'_> {
        Loads {
            ctx: self,
            done: false,
        }
    }

    /// True if the last loader operation failed
    #[must_use]
    pub fn error(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.error())
    }

    /// True once the loader is exhausted
    #[must_use]
    pub fn eof(&self) -> bool {
        self.session.as_ref().is_none_or(|session| session.eof())
    }

    /// Close the loader session and release the context
    ///
    /// # Errors
    ///
    /// The loader's close failure. The context is released regardless.
    pub fn close(mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let result = session.close();
        debug!(scheme = self.scheme(), ok = result.is_ok(), "Closed store context");
        result
    }

    /// Release the context and return the attached reader without closing it
    ///
    /// # Errors
    ///
    /// [`StoreError::Unsupported`] if the context was opened from a URI. The
    /// session is closed in that case, as if the context had been dropped.
    pub fn detach(mut self) -> Result<Box<dyn Read + Send>> {
        if !self.attached {
            return Err(StoreError::unsupported(
                "context was opened from a URI, not attached to a stream",
            ));
        }
        let session = self
            .session
            .take()
            .ok_or_else(|| StoreError::internal("store context has no session"))?;
        debug!(scheme = self.scheme(), "Detached store context from stream");
        session.detach()
    }

    /// Load every remaining object on a blocking task, then close
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn load_all(self) -> LoadAllResult {
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::task::spawn_blocking(move || {
            let _ = tx.send(drain(self));
        });

        LoadAllResult::new(rx)
    }
}

fn drain(mut ctx: StoreCtx) -> Result<Vec<StoreInfo>> {
    let mut items = Vec::new();
    while let Some(info) = ctx.load()? {
        items.push(info);
    }
    ctx.close()?;
    Ok(items)
}

impl Drop for StoreCtx {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(scheme = self.loader.scheme(), "Closing store context on drop");
            if let Err(e) = session.close() {
                warn!(scheme = self.loader.scheme(), error = %e, "Failed to close store session on drop");
            }
        }
    }
}

impl fmt::Debug for StoreCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCtx")
            .field("scheme", &self.loader.scheme())
            .field("open", &self.session.is_some())
            .field("ui", &self.ui.is_some())
            .field("post_process", &self.post_process.is_some())
            .field("attached", &self.attached)
            .finish()
    }
}

/// Iterator returned by [`StoreCtx::iter`]
pub struct Loads<'a> {
    ctx: &'a mut StoreCtx,
    done: bool,
}

impl Iterator for Loads<'_> {
    type Item = Result<StoreInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.ctx.load() {
            Ok(Some(info)) => Some(Ok(info)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
