//! Source capability interfaces and the registry mapping site hostnames to
//! their adapters.
//!
//! Two capabilities cover every supported site: [`Repository`] for catalogs
//! that need a mod id, [`Mod`] for single fixed download targets. The
//! installer treats both through one code path by resolving a repository to
//! its mod first.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{InstallError, Result};
use crate::http::Http;
use crate::url::Url;

pub mod curseforge;
pub mod micdoodle8;
pub mod optifine;
pub mod pixelmon_reforged;
pub mod unshorten;

pub use curseforge::CurseForge;
pub use micdoodle8::Micdoodle8;
pub use optifine::OptiFine;
pub use pixelmon_reforged::PixelmonReforged;
pub use unshorten::{Passthrough, Unshorten};

/// A single resolvable download target.
#[async_trait]
pub trait Mod: Send + Sync {
    /// Canonical page for the mod.
    fn url(&self) -> Url;

    /// Documentation location; defaults to the mod page.
    async fn doc(&self) -> Result<Url> {
        Ok(self.url())
    }

    /// Resolves the downloadable file(s) for a Minecraft version.
    ///
    /// The returned list is fully materialized: a main file plus any
    /// required companion files, in site order.
    async fn latest(&self, version: &str) -> Result<Vec<Url>>;
}

/// A site hosting many mods, resolved by identifier.
pub trait Repository: Send + Sync {
    /// Site root.
    fn url(&self) -> Url;

    /// Yields the mod registered under `mod_id`.
    fn get(&self, mod_id: &str) -> Result<Box<dyn Mod>>;
}

/// A registry entry: a whole catalog, or one fixed mod.
pub enum Source {
    Repository(Box<dyn Repository>),
    Mod(Box<dyn Mod>),
}

/// Immutable mapping from source id (site hostname) to its adapter,
/// built once at startup and handed to the installer by reference.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Source>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter under a source id (builder style).
    pub fn register<S: Into<String>>(mut self, source_id: S, source: Source) -> Self {
        self.sources.insert(source_id.into(), source);
        self
    }

    pub fn get(&self, source_id: &str) -> Result<&Source> {
        self.sources
            .get(source_id)
            .ok_or_else(|| InstallError::UnsupportedSource {
                source_id: source_id.to_string(),
            })
    }
}

/// The stock registry covering every supported site.
pub fn default_registry(http: &Http, unshortener: Arc<dyn Unshorten>) -> SourceRegistry {
    SourceRegistry::new()
        .register(
            "minecraft.curseforge.com",
            Source::Repository(Box::new(CurseForge::new(http.clone()))),
        )
        .register(
            "micdoodle8.com",
            Source::Repository(Box::new(Micdoodle8::new(http.clone()))),
        )
        .register("optifine.net", Source::Mod(Box::new(OptiFine::new(http.clone()))))
        .register(
            "reforged.gg",
            Source::Mod(Box::new(PixelmonReforged::new(http.clone(), unshortener))),
        )
}
