//! OptiFine adapter.
//!
//! The downloads page groups releases under `Minecraft <version>` headers.
//! The first mirror link in the matching section leads to a confirmation
//! page whose `Download` element carries the real file link. Both hops go
//! through the shared cookie-carrying client; the mirror only serves the
//! final link within a session.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::error::{InstallError, Result};
use crate::http::Http;
use crate::source::Mod;
use crate::url::{Url, urljoin, urlpath};

const SOURCE_ID: &str = "optifine.net";

pub struct OptiFine {
    http: Http,
    base: Url,
}

impl OptiFine {
    pub fn new(http: Http) -> Self {
        Self::with_base(http, Url::new("https://optifine.net"))
    }

    /// Points the adapter at a different host (tests).
    pub fn with_base(http: Http, base: Url) -> Self {
        Self { http, base }
    }

    async fn resolve_download(&self, mirror: &Url) -> Result<Url> {
        let (final_url, body) = self.http.get_text(mirror, &[]).await?;
        let href = download_anchor(&body).ok_or_else(|| InstallError::PageStructure {
            url: final_url.to_string(),
            expected: "the #Download link on the mirror page".to_string(),
        })?;
        urljoin(&final_url, &href)
    }
}

#[async_trait]
impl Mod for OptiFine {
    fn url(&self) -> Url {
        self.base.clone()
    }

    async fn doc(&self) -> Result<Url> {
        Ok(Url::new("https://github.com/sp614x/optifine/tree/master/OptiFineDoc/doc"))
    }

    async fn latest(&self, version: &str) -> Result<Vec<Url>> {
        let url = urlpath(&self.base, ["downloads"]);
        let (final_url, body) = self.http.get_text(&url, &[]).await?;
        let href = mirror_href(&body, version, &final_url)?;
        let mirror = urljoin(&final_url, &href)?;
        Ok(vec![self.resolve_download(&mirror).await?])
    }
}

/// Finds the mirror link in the section titled `Minecraft <version>`.
fn mirror_href(body: &str, version: &str, page: &Url) -> Result<String> {
    let document = Html::parse_document(body);

    let h2 = Selector::parse(".downloads h2").expect("valid selector");
    let title = format!("Minecraft {version}");
    let header = document
        .select(&h2)
        .find(|h| h.text().collect::<String>() == title)
        .ok_or_else(|| InstallError::VersionNotFound {
            source_id: SOURCE_ID.to_string(),
            version: version.to_string(),
        })?;

    let table = header
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().classes().any(|class| class == "downloadTable"))
        .ok_or_else(|| InstallError::PageStructure {
            url: page.to_string(),
            expected: format!("a download table after the '{title}' header"),
        })?;

    let mirror = Selector::parse(".downloadLineMirror a").expect("valid selector");
    table
        .select(&mirror)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .ok_or_else(|| InstallError::PageStructure {
            url: page.to_string(),
            expected: "a mirror link in the download table".to_string(),
        })
}

fn download_anchor(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let anchor = Selector::parse("#Download a").expect("valid selector");
    document
        .select(&anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}
