use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Cache-validation token handed out with every render.
///
/// Wire form is a weak HTTP entity tag, `W/"<revid>/<render-id>"` with an
/// optional trailing segment for the render flavor. The revision id and
/// render id together key the stash, so a client that sends the etag back
/// lets the service find the exact HTML it rendered earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ETag {
    pub revision_id: u64,
    pub render_id: Uuid,
    pub suffix: Option<String>,
}

fn etag_regex() -> &'static Regex {
    static ETAG_REGEX: OnceLock<Regex> = OnceLock::new();
    ETAG_REGEX.get_or_init(|| {
        Regex::new(r#"^(?:W/)?"(\d+)/([0-9a-fA-F-]{36})(?:/([^"]+))?"$"#)
            .expect("Invalid etag regex")
    })
}

impl ETag {
    /// Mint a fresh etag for a render of `revision_id`.
    pub fn new(revision_id: u64) -> Self {
        Self {
            revision_id,
            render_id: Uuid::new_v4(),
            suffix: None,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Parse a client-supplied etag. Returns `None` for anything that does
    /// not match the weak-etag form above.
    pub fn parse(value: &str) -> Option<Self> {
        let captures = etag_regex().captures(value)?;
        let revision_id = captures[1].parse().ok()?;
        let render_id = captures[2].parse().ok()?;
        Some(Self {
            revision_id,
            render_id,
            suffix: captures.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// Stash key for the render this etag identifies.
    pub fn stash_key(&self) -> String {
        format!("{}/{}", self.revision_id, self.render_id)
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "W/\"{}/{}/{}\"", self.revision_id, self.render_id, suffix),
            None => write!(f, "W/\"{}/{}\"", self.revision_id, self.render_id),
        }
    }
}
