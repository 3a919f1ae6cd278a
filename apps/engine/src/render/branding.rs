//! Company branding resolution.
//!
//! A branding selector is the (case-preserved) company key sent by the
//! caller. Empty or `"nologo"` means an unbranded render. Anything else must
//! map to a logo file at `<assets_dir>/logos/<selector>.jpg` — if the file is
//! absent the render fails up front with [`EngineError::MissingAsset`] rather
//! than silently producing an unbranded document.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::EngineError;

/// Selector value that explicitly requests an unbranded render.
pub const NO_BRANDING: &str = "nologo";

/// Resolved branding for one render: either a company with a logo file on
/// disk, or plain (no logo).
#[derive(Debug, Clone)]
pub struct Branding {
    company: Option<String>,
    logo_path: Option<PathBuf>,
}

impl Branding {
    /// Resolves a selector against the assets directory.
    ///
    /// Empty / whitespace / `"nologo"` selectors resolve to plain branding.
    /// Any other selector requires `<assets_dir>/logos/<selector>.jpg` to
    /// exist.
    pub fn resolve(selector: &str, assets_dir: &Path) -> Result<Self, EngineError> {
        let selector = selector.trim();
        if selector.is_empty() || selector.eq_ignore_ascii_case(NO_BRANDING) {
            return Ok(Branding {
                company: None,
                logo_path: None,
            });
        }

        let path = assets_dir.join("logos").join(format!("{selector}.jpg"));
        if !path.is_file() {
            tracing::warn!(company = selector, path = %path.display(), "Logo asset not found");
            return Err(EngineError::MissingAsset {
                company: selector.to_string(),
            });
        }

        Ok(Branding {
            company: Some(selector.to_string()),
            logo_path: Some(path),
        })
    }

    /// An explicitly unbranded render, bypassing asset lookup.
    pub fn plain() -> Self {
        Branding {
            company: None,
            logo_path: None,
        }
    }

    pub fn is_branded(&self) -> bool {
        self.company.is_some()
    }

    /// Reads the logo file, if this render is branded.
    pub fn logo_bytes(&self) -> Result<Option<Vec<u8>>, EngineError> {
        match &self.logo_path {
            None => Ok(None),
            Some(path) => {
                let bytes = fs::read(path).map_err(|e| EngineError::MissingAsset {
                    company: format!(
                        "{} (unreadable: {e})",
                        self.company.as_deref().unwrap_or_default()
                    ),
                })?;
                Ok(Some(bytes))
            }
        }
    }

    /// Company name for output filenames: first letter uppercased, the rest
    /// lowercased. `"Plain"` when unbranded.
    pub fn display_name(&self) -> String {
        match &self.company {
            None => "Plain".to_string(),
            Some(company) => {
                let mut chars = company.chars();
                match chars.next() {
                    None => "Plain".to_string(),
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn assets_with_logo(company: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let logos = dir.path().join("logos");
        fs::create_dir_all(&logos).unwrap();
        // content is irrelevant for resolution, only existence matters
        fs::write(logos.join(format!("{company}.jpg")), b"\xff\xd8\xff").unwrap();
        dir
    }

    #[test]
    fn test_empty_selector_is_plain() {
        let dir = tempfile::tempdir().unwrap();
        let b = Branding::resolve("", dir.path()).unwrap();
        assert!(!b.is_branded());
        assert_eq!(b.display_name(), "Plain");
    }

    #[test]
    fn test_nologo_selector_is_plain() {
        let dir = tempfile::tempdir().unwrap();
        let b = Branding::resolve("nologo", dir.path()).unwrap();
        assert!(!b.is_branded());
        let b = Branding::resolve("  NoLogo ", dir.path()).unwrap();
        assert!(!b.is_branded());
    }

    #[test]
    fn test_known_company_resolves() {
        let dir = assets_with_logo("acme");
        let b = Branding::resolve("acme", dir.path()).unwrap();
        assert!(b.is_branded());
        assert_eq!(b.display_name(), "Acme");
        assert!(b.logo_bytes().unwrap().is_some());
    }

    #[test]
    fn test_unknown_company_is_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("logos")).unwrap();
        let err = Branding::resolve("globex", dir.path()).unwrap_err();
        match err {
            EngineError::MissingAsset { company } => assert_eq!(company, "globex"),
            other => panic!("expected MissingAsset, got {other:?}"),
        }
    }

    #[test]
    fn test_display_name_normalizes_case() {
        let dir = assets_with_logo("ACME");
        let b = Branding::resolve("ACME", dir.path()).unwrap();
        assert_eq!(b.display_name(), "Acme");
    }
}
