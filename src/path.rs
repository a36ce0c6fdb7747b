//! Slash-separated virtual paths rooted at the top of "My Drive".

use std::fmt;

/// Path separator for virtual paths.
pub const SEPARATOR: char = '/';

/// Segment names that stand for the drive root.
pub const HOME_ALIASES: [&str; 2] = ["My Drive", "~"];

/// Whether a segment means "go back to the root".
pub fn is_root_segment(segment: &str) -> bool {
    segment.is_empty() || HOME_ALIASES.contains(&segment)
}

/// A caller-supplied path such as `/Projects/report.pdf`.
///
/// Exactly one trailing separator is stripped before splitting; whether it was
/// there is remembered because a trailing `/` on a destination means "into".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPath {
    segments: Vec<String>,
    trailing_separator: bool,
}

impl VirtualPath {
    pub fn parse(raw: &str) -> Self {
        let (body, trailing_separator) = match raw.strip_suffix(SEPARATOR) {
            Some(body) => (body, true),
            None => (raw, false),
        };

        Self {
            segments: body.split(SEPARATOR).map(str::to_string).collect(),
            trailing_separator,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn has_trailing_separator(&self) -> bool {
        self.trailing_separator
    }

    /// Final segment, the name a newly created entry would get.
    pub fn file_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Everything before the final segment, for error messages.
    pub fn parent_display(&self) -> String {
        let parent = &self.segments[..self.segments.len().saturating_sub(1)];
        let joined = parent.join("/");
        if joined.is_empty() {
            "/".to_string()
        } else {
            joined
        }
    }

    /// Whether every segment refers to the root.
    pub fn is_root(&self) -> bool {
        self.segments.iter().all(|s| is_root_segment(s))
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))?;
        if self.trailing_separator {
            write!(f, "{}", SEPARATOR)?;
        }
        Ok(())
    }
}
