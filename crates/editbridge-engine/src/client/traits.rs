use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::client::error::TransformError;
use crate::client::etag::ETag;
use crate::models::{PageIdentity, Revision, UserIdentity};

/// Rendering mode. `View` is a full page render, `Fragment` is a body-only
/// render with no wrapper markup, `Edit` is a render prepared for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    View,
    Fragment,
    Edit,
}

impl Flavor {
    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::View => "view",
            Flavor::Fragment => "fragment",
            Flavor::Edit => "edit",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parameters a remote REST render request would have carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderParams {
    pub stash: bool,
    pub flavor: Flavor,
}

/// Raw HTML text produced by an output renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHtml {
    pub text: String,
}

impl RenderedHtml {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The body a remote REST HTML-to-wikitext request would have carried:
/// the HTML to transform plus a reference to the original render it was
/// edited from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlTransformBody {
    pub html: HtmlPayload,
    pub original: OriginalRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlPayload {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalRef {
    pub revid: Option<u64>,
    pub etag: Option<String>,
}

impl HtmlTransformBody {
    pub fn new(html: impl Into<String>, revid: Option<u64>, etag: Option<String>) -> Self {
        Self {
            html: HtmlPayload { body: html.into() },
            original: OriginalRef { revid, etag },
        }
    }

    /// Stash key of the original render, recovered from the etag the client
    /// sent back. `None` when no etag was supplied or it does not parse.
    pub fn original_stash_key(&self) -> Option<String> {
        let etag = self.original.etag.as_deref()?;
        Some(ETag::parse(etag)?.stash_key())
    }
}

/// Content produced by an input transform, ready to serialize in its
/// default format (e.g. `text/x-wiki` for wikitext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedContent {
    format: String,
    body: String,
}

impl TransformedContent {
    pub fn new(format: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            body: body.into(),
        }
    }

    pub fn default_format(&self) -> &str {
        &self.format
    }

    pub fn serialize(&self, _format: &str) -> String {
        self.body.clone()
    }
}

/// Handle on a configured output render. `content_language` and `etag` are
/// only meaningful after `render_to_html` has succeeded.
pub trait OutputRenderer {
    fn render_to_html(&mut self) -> Result<RenderedHtml, TransformError>;
    fn content_language(&self) -> &str;
    fn etag(&self) -> &str;
    fn set_flavor(&mut self, flavor: Flavor);
}

/// Configures a fresh [`OutputRenderer`] per render request. The stash and
/// metrics handles are passed through untouched; only the renderer itself
/// knows what to do with them.
pub trait OutputRendererFactory {
    type Handle: OutputRenderer;

    #[allow(clippy::too_many_arguments)]
    fn configure(
        &self,
        stash: &Arc<dyn StashCache>,
        metrics: &Arc<dyn MetricsSink>,
        page: &PageIdentity,
        params: RenderParams,
        user: &UserIdentity,
        revision: Option<&Revision>,
        language: Option<&str>,
    ) -> Self::Handle;
}

/// Handle on a configured HTML-to-wikitext transform.
pub trait InputTransformer {
    fn transform_to_content(&mut self) -> Result<TransformedContent, TransformError>;
}

/// Configures a fresh [`InputTransformer`] per transform request.
pub trait InputTransformerFactory {
    type Handle: InputTransformer;

    fn configure(
        &self,
        stash: &Arc<dyn StashCache>,
        metrics: &Arc<dyn MetricsSink>,
        page: &PageIdentity,
        body: HtmlTransformBody,
        language: Option<&str>,
    ) -> Self::Handle;
}

/// Server-side cache of rendered HTML, keyed by [`ETag::stash_key`], so a
/// stashed render can be reused instead of rendered twice.
pub trait StashCache: Send + Sync {
    fn stash(&self, key: &str, html: &str);
    fn fetch(&self, key: &str) -> Option<String>;
}

/// In-process [`StashCache`] backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryStash {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("stash lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StashCache for MemoryStash {
    fn stash(&self, key: &str, html: &str) {
        self.entries
            .lock()
            .expect("stash lock poisoned")
            .insert(key.to_string(), html.to_string());
    }

    fn fetch(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("stash lock poisoned")
            .get(key)
            .cloned()
    }
}

/// Counter/timing sink for the collaborators' own instrumentation.
pub trait MetricsSink: Send + Sync {
    fn increment(&self, name: &str);
    fn timing(&self, name: &str, millis: u64);
}

/// [`MetricsSink`] that discards everything.
#[derive(Debug, Default)]
pub struct NullMetrics;

impl MetricsSink for NullMetrics {
    fn increment(&self, _name: &str) {}
    fn timing(&self, _name: &str, _millis: u64) {}
}
