//! Modpack installation: resolve every manifest entry and mirror the files.
//!
//! The run is strictly sequential and fail-fast: entries are processed in
//! manifest order, the first resolution or download error aborts the whole
//! run, and files written before the failure stay on disk. A per-run set of
//! already-fetched URLs guarantees at most one download per unique URL.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::http::Http;
use crate::manifest::Manifest;
use crate::source::{Source, SourceRegistry};
use crate::url::{Url, filename};

const APPLICATION: &str = "minecraft";

pub struct Installer {
    registry: SourceRegistry,
    http: Http,
}

impl Installer {
    pub fn new(registry: SourceRegistry, http: Http) -> Self {
        Self { registry, http }
    }

    /// Installs every mod in the manifest into `<directory>/mods`.
    pub async fn install(&self, manifest: &Manifest, directory: &Path) -> Result<()> {
        if manifest.application != APPLICATION {
            return Err(InstallError::UnsupportedApplication {
                application: manifest.application.clone(),
            });
        }

        let mods_dir = directory.join("mods");
        tokio::fs::create_dir_all(&mods_dir)
            .await
            .map_err(|source| InstallError::Io {
                path: mods_dir.clone(),
                source,
            })?;

        let mut downloaded: HashSet<Url> = HashSet::new();
        for entry in &manifest.entries {
            info!(
                source = %entry.source_id,
                mod_id = entry.mod_id.as_deref().unwrap_or_default(),
                version = %manifest.version,
                "resolving latest release"
            );

            let urls = match self.registry.get(&entry.source_id)? {
                Source::Repository(repo) => {
                    let mod_id =
                        entry
                            .mod_id
                            .as_deref()
                            .ok_or_else(|| InstallError::MissingModId {
                                source_id: entry.source_id.clone(),
                            })?;
                    repo.get(mod_id)?.latest(&manifest.version).await?
                }
                Source::Mod(fixed) => fixed.latest(&manifest.version).await?,
            };

            for url in urls {
                if downloaded.contains(&url) {
                    info!(%url, "already downloaded, skipping");
                    continue;
                }
                info!(%url, "downloading");
                self.download(&url, &mods_dir).await?;
                downloaded.insert(url);
            }
        }
        Ok(())
    }

    /// Fetches one URL into the mods directory.
    ///
    /// The filename comes from the response's Content-Disposition when
    /// present, else from the final response URL's path.
    async fn download(&self, url: &Url, mods_dir: &Path) -> Result<PathBuf> {
        let response = self.http.get(url).await?;

        let header_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_filename)
            .and_then(|name| sanitize_filename(&name));
        let final_url = Url::new(response.url().as_str());
        let name = match header_name {
            Some(name) => name,
            None => filename(&final_url)?,
        };

        let body = response
            .bytes()
            .await
            .map_err(|source| InstallError::Network {
                url: final_url.to_string(),
                source,
            })?;

        let path = mods_dir.join(&name);
        tokio::fs::write(&path, &body)
            .await
            .map_err(|source| InstallError::Io {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), bytes = body.len(), "wrote file");
        Ok(path)
    }
}

/// Extracts the `filename` parameter from a Content-Disposition value.
fn content_disposition_filename(value: &str) -> Option<String> {
    for param in value.split(';') {
        if let Some((name, value)) = param.split_once('=') {
            if !name.trim().eq_ignore_ascii_case("filename") {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Keeps only the final path component of a server-supplied filename.
fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}
