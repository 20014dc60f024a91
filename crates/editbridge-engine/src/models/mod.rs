use serde::{Deserialize, Serialize};

/// Identity of the page a render or transform is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIdentity {
    pub id: u64,
    pub title: String,
}

impl PageIdentity {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// The user on whose behalf rendering happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A page revision with its main-slot wikitext content.
///
/// Stored revisions come from outside this crate. The one revision this
/// crate creates itself is the ephemeral one wrapping caller-supplied
/// wikitext for a preview render; it always has id 0 and is a plain value,
/// so nothing can persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: u64,
    pub page: PageIdentity,
    pub content: String,
}

impl Revision {
    pub fn new(id: u64, page: PageIdentity, content: impl Into<String>) -> Self {
        Self {
            id,
            page,
            content: content.into(),
        }
    }

    /// Wrap wikitext in an unsaved revision of `page` (id 0).
    pub fn ephemeral(page: &PageIdentity, wikitext: impl Into<String>) -> Self {
        Self {
            id: 0,
            page: page.clone(),
            content: wikitext.into(),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.id == 0
    }
}

/// Wiki namespace identifier. Articles live in the main namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace(pub i32);

impl Namespace {
    pub const MAIN: Namespace = Namespace(0);
    pub const TALK: Namespace = Namespace(1);

    pub fn is_main(self) -> bool {
        self == Self::MAIN
    }
}
