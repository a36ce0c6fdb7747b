//! Read-only view of the credential file the external tool maintains.
//!
//! The tool owns this file and refreshes tokens itself; we only report on it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Name of the token file inside the credential directory.
pub const TOKEN_FILE: &str = "token_v2.json";

/// Raw shape of `token_v2.json`.
#[derive(Debug, Deserialize)]
struct StoredToken {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expiry: Option<String>,
}

/// What the stored credentials say, without exposing the secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub path: PathBuf,
    pub token_type: Option<String>,
    pub expiry: Option<String>,
    pub has_access_token: bool,
    pub has_refresh_token: bool,
}

impl TokenInfo {
    /// Load `<credential_dir>/token_v2.json`.
    pub fn from_dir<P: AsRef<Path>>(credential_dir: P) -> Result<Self> {
        Self::from_file(credential_dir.as_ref().join(TOKEN_FILE))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let stored: StoredToken = serde_json::from_str(&content)?;

        Ok(Self {
            path: path.to_path_buf(),
            token_type: stored.token_type,
            expiry: stored.expiry,
            has_access_token: !stored.access_token.is_empty(),
            has_refresh_token: stored.refresh_token.is_some_and(|t| !t.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_token_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"access_token":"ya29.x","token_type":"Bearer","refresh_token":"1//r","expiry":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();

        let info = TokenInfo::from_file(file.path()).unwrap();
        assert_eq!(info.token_type.as_deref(), Some("Bearer"));
        assert_eq!(info.expiry.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert!(info.has_access_token);
        assert!(info.has_refresh_token);
    }

    #[test]
    fn test_missing_refresh_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"access_token":"ya29.x"}"#).unwrap();

        let info = TokenInfo::from_file(file.path()).unwrap();
        assert!(!info.has_refresh_token);
        assert_eq!(info.token_type, None);
    }
}
