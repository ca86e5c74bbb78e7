//! URL construction and filename extraction.
//!
//! [`Url`] is the currency every adapter trades in: an opaque absolute
//! string, compared by exact identity. Construction helpers do the only
//! normalization that ever happens (trailing-slash trimming and segment
//! percent-encoding in [`urlpath`]).

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::{InstallError, Result};

/// Characters percent-encoded inside a path segment: everything outside the
/// RFC 3986 unreserved set, `/` included.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// An absolute URL identifying a remote resource.
///
/// Equality and hashing are exact string identity; two spellings of the same
/// resource are two distinct entries in a download set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url(String);

impl Url {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Url {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Url {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

/// Builds a URL from a base and percent-encoded path segments.
///
/// The base's trailing slashes are trimmed, each segment is encoded with the
/// unreserved-only set and the segments are joined with `/`. With zero
/// segments the trimmed base is returned as-is.
pub fn urlpath<I, S>(base: &Url, segments: I) -> Url
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base.as_str().trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&utf8_percent_encode(segment.as_ref(), SEGMENT).to_string());
    }
    Url::new(url)
}

/// Joins a scraped, possibly relative `href` against the page it came from.
pub fn urljoin(base: &Url, href: &str) -> Result<Url> {
    let joined = ::url::Url::parse(base.as_str())
        .and_then(|base| base.join(href))
        .map_err(|source| InstallError::InvalidUrl {
            url: base.to_string(),
            source,
        })?;
    Ok(Url::new(String::from(joined)))
}

/// Extracts the last path segment of a URL, percent-decoded.
///
/// Used to name a downloaded file when the server sends no explicit filename.
pub fn filename(url: &Url) -> Result<String> {
    let parsed = ::url::Url::parse(url.as_str()).map_err(|source| InstallError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .ok_or_else(|| InstallError::PageStructure {
            url: url.to_string(),
            expected: "a non-empty path to derive a filename from".to_string(),
        })?;
    Ok(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlpath_encodes_segments() {
        let base = Url::new("https://a.b/");
        assert_eq!(urlpath(&base, ["x y"]).as_str(), "https://a.b/x%20y");
    }

    #[test]
    fn urlpath_trims_trailing_slashes() {
        let none: [&str; 0] = [];
        assert_eq!(urlpath(&Url::new("https://a.b///"), none).as_str(), "https://a.b");
        assert_eq!(urlpath(&Url::new("https://a.b"), ["c"]).as_str(), "https://a.b/c");
    }

    #[test]
    fn urlpath_encodes_slash_within_segment() {
        let url = urlpath(&Url::new("https://a.b"), ["x/y", "z"]);
        assert_eq!(url.as_str(), "https://a.b/x%2Fy/z");
    }

    #[test]
    fn urlpath_keeps_unreserved_characters() {
        let url = urlpath(&Url::new("https://a.b"), ["mod-1.2_3~x"]);
        assert_eq!(url.as_str(), "https://a.b/mod-1.2_3~x");
    }

    #[test]
    fn filename_round_trips_urlpath() {
        let url = urlpath(&Url::new("https://a.b"), ["mods", "My File.jar"]);
        assert_eq!(filename(&url).unwrap(), "My File.jar");
    }

    #[test]
    fn filename_ignores_query() {
        let url = Url::new("https://a.b/dl/file.zip?token=abc");
        assert_eq!(filename(&url).unwrap(), "file.zip");
    }

    #[test]
    fn filename_fails_on_root_path() {
        assert!(filename(&Url::new("https://a.b/")).is_err());
    }

    #[test]
    fn urljoin_resolves_relative_and_absolute() {
        let base = Url::new("https://a.b/dir/page");
        assert_eq!(urljoin(&base, "/dl/f.jar").unwrap().as_str(), "https://a.b/dl/f.jar");
        assert_eq!(urljoin(&base, "https://c.d/f.jar").unwrap().as_str(), "https://c.d/f.jar");
    }

    #[test]
    fn url_equality_is_exact() {
        assert_ne!(Url::new("https://a.b/x"), Url::new("https://a.b/x/"));
    }
}
