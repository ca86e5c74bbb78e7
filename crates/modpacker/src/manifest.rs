//! Modpack manifest parsing.
//!
//! Line 1 declares the target: `<application> <version>`. Every following
//! non-blank line declares one mod: `<source_id> [<mod_id>]`, whitespace
//! delimited. Entry order is preserved; the installer processes it as-is.

use std::path::Path;

use crate::error::{InstallError, Result};

/// One `<source_id> [<mod_id>]` manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub source_id: String,
    pub mod_id: Option<String>,
}

/// A parsed modpack manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub application: String,
    pub version: String,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| InstallError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|reason| InstallError::Manifest {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut lines = text.lines();
        let header = lines.next().ok_or("missing header line")?;
        let mut fields = header.split_whitespace();
        let application = fields.next().ok_or("missing application name")?.to_string();
        let version = fields.next().ok_or("missing target version")?.to_string();
        if fields.next().is_some() {
            return Err(format!("unexpected trailing fields in header: {header:?}"));
        }

        let mut entries = Vec::new();
        for line in lines {
            let mut fields = line.split_whitespace();
            let Some(source_id) = fields.next() else {
                continue; // blank line
            };
            let mod_id = fields.next().map(str::to_string);
            if fields.next().is_some() {
                return Err(format!("too many fields in entry: {line:?}"));
            }
            entries.push(ManifestEntry {
                source_id: source_id.to_string(),
                mod_id,
            });
        }

        Ok(Self {
            application,
            version,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_entries() {
        let manifest = Manifest::parse(
            "minecraft 1.12.2\n\
             minecraft.curseforge.com jei\n\
             \n\
             optifine.net\n",
        )
        .unwrap();

        assert_eq!(manifest.application, "minecraft");
        assert_eq!(manifest.version, "1.12.2");
        assert_eq!(
            manifest.entries,
            vec![
                ManifestEntry {
                    source_id: "minecraft.curseforge.com".to_string(),
                    mod_id: Some("jei".to_string()),
                },
                ManifestEntry {
                    source_id: "optifine.net".to_string(),
                    mod_id: None,
                },
            ]
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert!(Manifest::parse("").is_err());
    }

    #[test]
    fn rejects_header_without_version() {
        assert!(Manifest::parse("minecraft").is_err());
    }

    #[test]
    fn rejects_overlong_entry() {
        let err = Manifest::parse("minecraft 1.12.2\na.example one two\n").unwrap_err();
        assert!(err.contains("too many fields"));
    }

    #[test]
    fn preserves_entry_order() {
        let manifest = Manifest::parse("minecraft 1.12.2\nb.example\na.example\n").unwrap();
        let order: Vec<&str> = manifest.entries.iter().map(|e| e.source_id.as_str()).collect();
        assert_eq!(order, ["b.example", "a.example"]);
    }
}
