//! Built-in `file` loader
//!
//! Serves `file:` URIs and URIs without a scheme. Regular files are read as a
//! sequence of PEM blocks (or a single raw DER object), directories are
//! listed as names that can be opened in turn. It is also the loader behind
//! [`StoreCtx::attach`](crate::StoreCtx::attach).

mod core;
mod pem;
mod session;

// Re-export public types
pub use self::core::FileLoader;
