//! Pixelmon Reforged adapter.
//!
//! The site ships exactly one Minecraft version; any other request fails
//! before a single byte goes over the wire. The homepage's download anchor
//! points at a shortener, so the final hop goes through the [`Unshorten`]
//! collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::error::{InstallError, Result};
use crate::http::Http;
use crate::source::{Mod, Unshorten};
use crate::url::{Url, urljoin};

const SOURCE_ID: &str = "reforged.gg";
const SUPPORTED_VERSION: &str = "1.12.2";

pub struct PixelmonReforged {
    http: Http,
    base: Url,
    unshortener: Arc<dyn Unshorten>,
}

impl PixelmonReforged {
    pub fn new(http: Http, unshortener: Arc<dyn Unshorten>) -> Self {
        Self::with_base(http, Url::new("https://reforged.gg"), unshortener)
    }

    /// Points the adapter at a different host (tests).
    pub fn with_base(http: Http, base: Url, unshortener: Arc<dyn Unshorten>) -> Self {
        Self {
            http,
            base,
            unshortener,
        }
    }
}

#[async_trait]
impl Mod for PixelmonReforged {
    fn url(&self) -> Url {
        self.base.clone()
    }

    async fn doc(&self) -> Result<Url> {
        Ok(Url::new("https://pixelmonmod.com/wiki"))
    }

    async fn latest(&self, version: &str) -> Result<Vec<Url>> {
        if version != SUPPORTED_VERSION {
            return Err(InstallError::UnsupportedVersion {
                source_id: SOURCE_ID.to_string(),
                version: version.to_string(),
            });
        }

        let (final_url, body) = self.http.get_text(&self.base, &[]).await?;
        let href = download_href(&body).ok_or_else(|| InstallError::PageStructure {
            url: final_url.to_string(),
            expected: "the homepage download link".to_string(),
        })?;
        let shortened = urljoin(&final_url, &href)?;
        Ok(vec![self.unshortener.unshorten(&shortened).await?])
    }
}

fn download_href(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let anchor = Selector::parse("a.download").expect("valid selector");
    document
        .select(&anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}
