//! Telling virtual paths apart from Drive ids and Drive web URLs.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DriveError, Result};
use crate::path::{VirtualPath, HOME_ALIASES, SEPARATOR};

/// Drive web URLs that carry an object id.
static DRIVE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://drive\.google\.com/(?:drive/(?:u/\d+/)?folders/|file/d/|open\?id=)(?P<id>[a-zA-Z0-9_-]+)",
    )
    .expect("Invalid Drive URL regex")
});

/// Valid Google Drive ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Where a caller points: a path to resolve, or an id to use as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Path(VirtualPath),
    Id(String),
}

/// Classify a caller string.
///
/// Anything starting with `/` or a home alias is a virtual path. Everything
/// else must be a raw Drive id or one of these URL forms:
/// - `https://drive.google.com/drive/folders/<ID>`
/// - `https://drive.google.com/drive/u/0/folders/<ID>`
/// - `https://drive.google.com/file/d/<ID>/view`
/// - `https://drive.google.com/open?id=<ID>`
///
/// # Examples
///
/// ```
/// use gdrive_wrap::location::{parse_location, Location};
///
/// let loc = parse_location("https://drive.google.com/drive/folders/1abc123").unwrap();
/// assert_eq!(loc, Location::Id("1abc123".to_string()));
///
/// assert!(matches!(parse_location("/Projects").unwrap(), Location::Path(_)));
/// ```
pub fn parse_location(input: &str) -> Result<Location> {
    let trimmed = input.trim();

    if looks_like_path(trimmed) {
        return Ok(Location::Path(VirtualPath::parse(trimmed)));
    }

    extract_id(trimmed).map(Location::Id)
}

fn looks_like_path(s: &str) -> bool {
    s.starts_with(SEPARATOR)
        || HOME_ALIASES.iter().any(|alias| {
            s.strip_prefix(alias)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(SEPARATOR))
        })
}

/// Extract a Drive id from a web URL, or validate a raw id.
pub fn extract_id(url_or_id: &str) -> Result<String> {
    let trimmed = url_or_id.trim();

    if let Some(id) = DRIVE_URL_REGEX.captures(trimmed).and_then(|c| c.name("id")) {
        return Ok(id.as_str().to_string());
    }

    if ID_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(DriveError::InvalidLocation(url_or_id.to_string()))
}
