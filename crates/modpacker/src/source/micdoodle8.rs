//! Micdoodle8 adapter: the Galacticraft download portal.
//!
//! The downloads page embeds a version selector whose option labels must
//! match the requested version exactly; the selected option's value names
//! the id of the version-scoped downloads section. Within that section,
//! links under the `Promoted` header are intermediate pages whose real
//! download URL sits in an embedded script variable.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{InstallError, Result};
use crate::http::Http;
use crate::source::{Mod, Repository};
use crate::url::{Url, urljoin, urlpath};

const SOURCE_ID: &str = "micdoodle8.com";
const PROMOTED: &str = "Promoted";

static PHP_STR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"var phpStr = "(.*?)""#).expect("valid regex"));

/// The Micdoodle8 mod portal. Only Galacticraft is hosted there.
#[derive(Clone)]
pub struct Micdoodle8 {
    http: Http,
    base: Url,
}

impl Micdoodle8 {
    pub fn new(http: Http) -> Self {
        Self::with_base(http, Url::new("https://micdoodle8.com"))
    }

    /// Points the adapter at a different host (tests).
    pub fn with_base(http: Http, base: Url) -> Self {
        Self { http, base }
    }
}

impl Repository for Micdoodle8 {
    fn url(&self) -> Url {
        self.base.clone()
    }

    fn get(&self, mod_id: &str) -> Result<Box<dyn Mod>> {
        match mod_id {
            "galacticraft" => Ok(Box::new(Galacticraft { repo: self.clone() })),
            _ => Err(InstallError::UnsupportedMod {
                source_id: SOURCE_ID.to_string(),
                mod_id: mod_id.to_string(),
            }),
        }
    }
}

pub struct Galacticraft {
    repo: Micdoodle8,
}

#[async_trait]
impl Mod for Galacticraft {
    fn url(&self) -> Url {
        urlpath(&self.repo.base, ["mods", "galacticraft"])
    }

    async fn doc(&self) -> Result<Url> {
        Ok(Url::new("https://wiki.micdoodle8.com/wiki/Galacticraft"))
    }

    async fn latest(&self, version: &str) -> Result<Vec<Url>> {
        let url = urlpath(&self.url(), ["downloads"]);
        let (final_url, body) = self.repo.http.get_text(&url, &[]).await?;
        let links = promoted_links(&body, version, &final_url)?;

        let mut resolved = Vec::with_capacity(links.len());
        for href in links {
            let link = urljoin(&final_url, &href)?;
            resolved.push(self.resolve_download(&link).await?);
        }
        Ok(resolved)
    }
}

impl Galacticraft {
    /// Follows an intermediate download page to the URL embedded in its
    /// script content.
    async fn resolve_download(&self, url: &Url) -> Result<Url> {
        let (final_url, body) = self.repo.http.get_text(url, &[]).await?;
        let captures = PHP_STR
            .captures(&body)
            .ok_or_else(|| InstallError::PageStructure {
                url: final_url.to_string(),
                expected: "embedded phpStr download link".to_string(),
            })?;
        Ok(Url::new(captures[1].to_string()))
    }
}

/// Collects the `Promoted` section's links for the version-scoped downloads
/// block, stopping at the next channel header.
fn promoted_links(body: &str, version: &str, page: &Url) -> Result<Vec<String>> {
    let document = Html::parse_document(body);

    let option = Selector::parse("select#mc_version option").expect("valid selector");
    let section_id = document
        .select(&option)
        .find(|opt| opt.text().collect::<String>() == version)
        .and_then(|opt| opt.value().attr("value"))
        .ok_or_else(|| InstallError::VersionNotFound {
            source_id: SOURCE_ID.to_string(),
            version: version.to_string(),
        })?;

    let any = Selector::parse("*").expect("valid selector");
    let section = document
        .select(&any)
        .find(|el| el.value().id() == Some(section_id))
        .ok_or_else(|| InstallError::PageStructure {
            url: page.to_string(),
            expected: format!("downloads section #{section_id}"),
        })?;

    let h4 = Selector::parse("h4").expect("valid selector");
    let header = section
        .select(&h4)
        .find(|h| h.text().collect::<String>() == PROMOTED)
        .ok_or_else(|| InstallError::ReleaseNotFound {
            mod_id: "galacticraft".to_string(),
            version: version.to_string(),
        })?;

    let mut links = Vec::new();
    for sibling in header.next_siblings() {
        let Some(el) = ElementRef::wrap(sibling) else {
            continue;
        };
        if el.value().name() == "h4" {
            break;
        }
        if el.value().name() == "a" {
            if let Some(href) = el.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn downloads_page() -> String {
        r#"
        <html><body>
        <select id="mc_version">
          <option value="downloads1122">1.12.2</option>
          <option value="downloads1710">1.7.10</option>
        </select>
        <div id="downloads1122">
          <h4>Promoted</h4>
          <a href="/dl.php?id=promoted-core">Core</a>
          <a href="/dl.php?id=promoted-planets">Planets</a>
          <h4>Latest</h4>
          <a href="/dl.php?id=latest-core">Core</a>
        </div>
        <div id="downloads1710">
          <h4>Promoted</h4>
          <a href="/dl.php?id=old-core">Core</a>
        </div>
        </body></html>"#
            .to_string()
    }

    fn galacticraft(server: &MockServer) -> Box<dyn Mod> {
        let http = Http::new(HttpConfig::default()).unwrap();
        Micdoodle8::with_base(http, Url::new(server.uri()))
            .get("galacticraft")
            .unwrap()
    }

    async fn mount_downloads(server: &MockServer, body: String) {
        Mock::given(method("GET"))
            .and(path("/mods/galacticraft/downloads"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn latest_collects_promoted_links_until_next_header() {
        let server = MockServer::start().await;
        mount_downloads(&server, downloads_page()).await;
        for (id, target) in [
            ("promoted-core", "https://cdn.example/GalacticraftCore.jar"),
            ("promoted-planets", "https://cdn.example/Galacticraft-Planets.jar"),
        ] {
            Mock::given(method("GET"))
                .and(path("/dl.php"))
                .and(wiremock::matchers::query_param("id", id))
                .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                    "<script>var phpStr = \"{target}\";</script>"
                )))
                .expect(1)
                .mount(&server)
                .await;
        }

        let urls = galacticraft(&server).latest("1.12.2").await.unwrap();
        assert_eq!(
            urls,
            vec![
                Url::new("https://cdn.example/GalacticraftCore.jar"),
                Url::new("https://cdn.example/Galacticraft-Planets.jar"),
            ]
        );
    }

    #[tokio::test]
    async fn version_label_must_match_exactly() {
        let server = MockServer::start().await;
        mount_downloads(&server, downloads_page()).await;

        let err = galacticraft(&server).latest("1.12").await.unwrap_err();
        assert!(matches!(err, InstallError::VersionNotFound { version, .. } if version == "1.12"));
    }

    #[tokio::test]
    async fn missing_promoted_header_is_release_not_found() {
        let server = MockServer::start().await;
        mount_downloads(
            &server,
            r#"
            <select id="mc_version"><option value="d">1.12.2</option></select>
            <div id="d"><h4>Latest</h4><a href="/x"></a></div>"#
                .to_string(),
        )
        .await;

        let err = galacticraft(&server).latest("1.12.2").await.unwrap_err();
        assert!(matches!(err, InstallError::ReleaseNotFound { .. }));
    }

    #[tokio::test]
    async fn missing_php_str_is_page_structure_error() {
        let server = MockServer::start().await;
        mount_downloads(
            &server,
            r#"
            <select id="mc_version"><option value="d">1.12.2</option></select>
            <div id="d"><h4>Promoted</h4><a href="/dl.php?id=x"></a></div>"#
                .to_string(),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/dl.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>no script here</html>"))
            .mount(&server)
            .await;

        let err = galacticraft(&server).latest("1.12.2").await.unwrap_err();
        assert!(matches!(err, InstallError::PageStructure { .. }));
    }

    #[tokio::test]
    async fn unknown_mod_is_unsupported() {
        let http = Http::new(HttpConfig::default()).unwrap();
        let Err(err) = Micdoodle8::new(http).get("buildcraft") else {
            panic!("lookup should fail");
        };
        assert!(matches!(err, InstallError::UnsupportedMod { mod_id, .. } if mod_id == "buildcraft"));
    }
}
