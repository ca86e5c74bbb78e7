//! CurseForge catalog adapter.
//!
//! Versions are matched through the site's game-version filter control. The
//! label-to-token mapping is scraped once per adapter instance from the
//! mc-mods listing and memoized; a miss after that is final for the life of
//! the instance. Release picking trusts the site's own `sort=releasetype`
//! ordering: the first stable-flagged row in the files listing wins.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::http::Http;
use crate::source::{Mod, Repository};
use crate::url::{Url, urljoin, urlpath};

const SOURCE_ID: &str = "minecraft.curseforge.com";

/// The CurseForge Minecraft mod catalog.
///
/// Cloning is cheap and shares the version cache: every [`CurseForgeMod`]
/// yielded by one instance resolves versions through the same memoized map.
#[derive(Clone)]
pub struct CurseForge {
    http: Http,
    base: Url,
    versions: Arc<OnceCell<HashMap<String, String>>>,
}

impl CurseForge {
    pub fn new(http: Http) -> Self {
        Self::with_base(http, Url::new("https://minecraft.curseforge.com"))
    }

    /// Points the adapter at a different host (tests).
    pub fn with_base(http: Http, base: Url) -> Self {
        Self {
            http,
            base,
            versions: Arc::new(OnceCell::new()),
        }
    }

    /// Maps a human-readable Minecraft version to the site's filter token.
    async fn resolve_version(&self, version: &str) -> Result<String> {
        let versions = self.versions.get_or_try_init(|| self.fetch_versions()).await?;
        versions
            .get(version)
            .cloned()
            .ok_or_else(|| InstallError::VersionNotFound {
                source_id: SOURCE_ID.to_string(),
                version: version.to_string(),
            })
    }

    async fn fetch_versions(&self) -> Result<HashMap<String, String>> {
        let url = urlpath(&self.base, ["mc-mods"]);
        let (final_url, body) = self.http.get_text(&url, &[]).await?;
        let versions = parse_version_filter(&body);
        if versions.is_empty() {
            return Err(InstallError::PageStructure {
                url: final_url.to_string(),
                expected: "select#filter-game-version options".to_string(),
            });
        }
        debug!(count = versions.len(), "scraped game-version filter");
        Ok(versions)
    }
}

impl Repository for CurseForge {
    fn url(&self) -> Url {
        self.base.clone()
    }

    fn get(&self, mod_id: &str) -> Result<Box<dyn Mod>> {
        Ok(Box::new(CurseForgeMod {
            repo: self.clone(),
            mod_id: mod_id.to_string(),
        }))
    }
}

/// One mod on the CurseForge catalog.
pub struct CurseForgeMod {
    repo: CurseForge,
    mod_id: String,
}

#[async_trait]
impl Mod for CurseForgeMod {
    fn url(&self) -> Url {
        urlpath(&self.repo.base, ["projects", &self.mod_id])
    }

    /// The project's Wiki menu link when present, else the project page.
    async fn doc(&self) -> Result<Url> {
        let url = self.url();
        let (final_url, body) = self.repo.http.get_text(&url, &[]).await?;
        match wiki_link(&body) {
            Some(href) => urljoin(&final_url, &href),
            None => Ok(url),
        }
    }

    async fn latest(&self, version: &str) -> Result<Vec<Url>> {
        let token = self.repo.resolve_version(version).await?;
        let files = urlpath(&self.url(), ["files"]);
        let listing = self
            .repo
            .http
            .get_text(
                &files,
                &[("filter-game-version", token.as_str()), ("sort", "releasetype")],
            )
            .await;
        // An error status on the files listing means the project id itself
        // is unknown to the catalog.
        let (final_url, body) = match listing {
            Ok(page) => page,
            Err(InstallError::Network { source, .. }) if source.status().is_some() => {
                return Err(InstallError::UnsupportedMod {
                    source_id: SOURCE_ID.to_string(),
                    mod_id: self.mod_id.clone(),
                });
            }
            Err(err) => return Err(err),
        };

        match stable_release_href(&body) {
            Some(Some(href)) => Ok(vec![urljoin(&final_url, &href)?]),
            Some(None) => Err(InstallError::PageStructure {
                url: final_url.to_string(),
                expected: "a download link in the stable release row".to_string(),
            }),
            None => Err(InstallError::ReleaseNotFound {
                mod_id: self.mod_id.clone(),
                version: version.to_string(),
            }),
        }
    }
}

fn parse_version_filter(body: &str) -> HashMap<String, String> {
    let document = Html::parse_document(body);
    let option = Selector::parse("select#filter-game-version option").expect("valid selector");
    document
        .select(&option)
        .filter_map(|opt| {
            let value = opt.value().attr("value")?;
            let label = opt.text().collect::<String>().trim().to_string();
            Some((label, value.to_string()))
        })
        .collect()
}

/// Scans listing rows in response order.
///
/// `None`: no stable-flagged row. `Some(None)`: a stable row without a
/// download link. `Some(Some(href))`: the winning row's link.
fn stable_release_href(body: &str) -> Option<Option<String>> {
    let document = Html::parse_document(body);
    let row = Selector::parse("table.listing-project-file tr").expect("valid selector");
    let phase = Selector::parse(".release-phase").expect("valid selector");
    let download = Selector::parse(".project-file-download-button a").expect("valid selector");

    let stable = document
        .select(&row)
        .find(|tr| tr.select(&phase).next().is_some())?;
    Some(
        stable
            .select(&download)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string),
    )
}

fn wiki_link(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let link = Selector::parse(".e-menu a").expect("valid selector");
    document
        .select(&link)
        .find(|a| a.text().collect::<String>().trim() == "Wiki")
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}
