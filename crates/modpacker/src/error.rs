//! Error types for resolution and install runs.
//!
//! Nothing here is recovered locally: every error propagates to the
//! installer and aborts the run, leaving already-downloaded files in place.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstallError>;

#[derive(Error, Debug)]
pub enum InstallError {
    /// The manifest targets an application this tool does not handle.
    #[error("unsupported application: {application}")]
    UnsupportedApplication { application: String },

    /// The manifest names a source id missing from the registry.
    #[error("unsupported source: {source_id}")]
    UnsupportedSource { source_id: String },

    /// A repository source was listed without a mod id.
    #[error("source {source_id} requires a mod id")]
    MissingModId { source_id: String },

    /// The repository does not recognize the requested mod id.
    #[error("unsupported mod '{mod_id}' for source {source_id}")]
    UnsupportedMod { source_id: String, mod_id: String },

    /// The site's version selector does not list the requested version.
    #[error("{source_id} does not list minecraft version {version}")]
    VersionNotFound { source_id: String, version: String },

    /// A fixed-version source was asked for anything but its one version.
    #[error("unsupported minecraft version for {source_id}: {version}")]
    UnsupportedVersion { source_id: String, version: String },

    /// The version exists on the site but carries no matching release.
    #[error("'{mod_id}' has no release for minecraft {version}")]
    ReleaseNotFound { mod_id: String, version: String },

    /// An expected markup element or embedded pattern was absent.
    #[error("page {url} is missing {expected}")]
    PageStructure { url: String, expected: String },

    /// A network request failed or came back with an error status.
    #[error("request failed: {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("file operation failed on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_errors_name_the_site() {
        let err = InstallError::VersionNotFound {
            source_id: "optifine.net".to_string(),
            version: "1.16.5".to_string(),
        };
        assert_eq!(err.to_string(), "optifine.net does not list minecraft version 1.16.5");

        let err = InstallError::UnsupportedVersion {
            source_id: "reforged.gg".to_string(),
            version: "1.16.5".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported minecraft version for reforged.gg: 1.16.5");
    }

    #[test]
    fn version_errors_carry_no_error_cause() {
        use std::error::Error;

        let err = InstallError::VersionNotFound {
            source_id: "optifine.net".to_string(),
            version: "1.16.5".to_string(),
        };
        assert!(err.source().is_none());
    }
}
