//! modpacker
//!
//! Resolves the current downloadable files for the mods declared in a
//! modpack manifest and mirrors them to local storage, downloading each
//! unique URL at most once per run.
//!
//! Every supported site gets its own adapter implementing the
//! [`Mod`]/[`Repository`] capability traits; the [`Installer`] walks the
//! manifest in order, resolves each entry through the [`SourceRegistry`] and
//! aborts on the first failure.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use modpacker::source::Passthrough;
//! use modpacker::{Http, HttpConfig, Installer, Manifest, default_registry};
//!
//! # async fn example() -> modpacker::Result<()> {
//! let http = Http::new(HttpConfig::default())?;
//! let registry = default_registry(&http, Arc::new(Passthrough));
//! let manifest = Manifest::load(Path::new("modpack.txt"))?;
//! Installer::new(registry, http)
//!     .install(&manifest, Path::new("."))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod install;
pub mod manifest;
pub mod source;
pub mod url;

pub use error::{InstallError, Result};
pub use http::{Http, HttpConfig};
pub use install::Installer;
pub use manifest::{Manifest, ManifestEntry};
pub use source::{Mod, Repository, Source, SourceRegistry, default_registry};
pub use url::{Url, filename, urljoin, urlpath};
