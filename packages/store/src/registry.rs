//! Scheme to loader registry

use crate::config::StoreConfig;
use crate::store::FileLoader;
use crate::traits::StoreLoader;
use crate::uri::validate_scheme;
use crate::{Result, StoreError};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

static DEFAULT_REGISTRY: Lazy<Arc<LoaderRegistry>> =
    Lazy::new(|| Arc::new(LoaderRegistry::with_builtin()));

/// Process-wide registry holding the built-in loaders
///
/// Initialised on first use and never mutated afterwards. Build a
/// [`LoaderRegistry`] of your own to add schemes.
#[must_use]
pub fn default_registry() -> Arc<LoaderRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

/// Maps scheme tokens to loaders
///
/// Lookups are case-sensitive exact matches.
#[derive(Default, Clone)]
pub struct LoaderRegistry {
    loaders: BTreeMap<String, Arc<dyn StoreLoader>>,
}

impl LoaderRegistry {
    /// Construct an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `file` loader
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::from_config(&StoreConfig::default())
    }

    /// Registry with the built-in loaders configured from `config`
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(FileLoader::new(config.file.clone())));
        registry
    }

    /// Add a loader under its scheme
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidScheme`] if the scheme is malformed,
    /// [`StoreError::DuplicateScheme`] if the scheme is taken.
    pub fn register(&mut self, loader: Arc<dyn StoreLoader>) -> Result<()> {
        let scheme = loader.scheme();
        validate_scheme(scheme)?;
        if self.loaders.contains_key(scheme) {
            return Err(StoreError::DuplicateScheme(scheme.to_string()));
        }
        tracing::debug!(scheme, "Registered store loader");
        self.insert(loader);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn with_loader(mut self, loader: Arc<dyn StoreLoader>) -> Result<Self> {
        self.register(loader)?;
        Ok(self)
    }

    /// Remove the loader for `scheme`
    pub fn unregister(&mut self, scheme: &str) -> Option<Arc<dyn StoreLoader>> {
        self.loaders.remove(scheme)
    }

    /// Look up the loader for `scheme`
    #[must_use]
    pub fn get(&self, scheme: &str) -> Option<Arc<dyn StoreLoader>> {
        self.loaders.get(scheme).cloned()
    }

    /// Look up the loader for `scheme`, failing if none is registered
    ///
    /// # Errors
    ///
    /// [`StoreError::UnsupportedScheme`] if nothing serves `scheme`.
    pub fn lookup(&self, scheme: &str) -> Result<Arc<dyn StoreLoader>> {
        self.get(scheme).ok_or_else(|| StoreError::UnsupportedScheme {
            scheme: scheme.to_string(),
        })
    }

    /// Registered schemes in sorted order
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    fn insert(&mut self, loader: Arc<dyn StoreLoader>) {
        self.loaders.insert(loader.scheme().to_string(), loader);
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("schemes", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}
