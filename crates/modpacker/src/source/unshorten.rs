//! Link-unshortening collaborator interface.
//!
//! Some homepages hide their real download behind a link-shortening or
//! ad-gate service. Bypassing those is an external concern; adapters only
//! depend on this trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::url::Url;

/// Resolves an obfuscated or shortened link to its real destination.
#[async_trait]
pub trait Unshorten: Send + Sync {
    async fn unshorten(&self, url: &Url) -> Result<Url>;
}

/// Returns the link unchanged. Stands in where no bypass service is wired.
pub struct Passthrough;

#[async_trait]
impl Unshorten for Passthrough {
    async fn unshorten(&self, url: &Url) -> Result<Url> {
        Ok(url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passthrough_returns_input() {
        let url = Url::new("https://short.example/abc");
        assert_eq!(Passthrough.unshorten(&url).await.unwrap(), url);
    }
}
