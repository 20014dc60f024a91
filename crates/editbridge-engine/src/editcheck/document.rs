use crate::editcheck::history::{EditHistory, SquashError};
use crate::editcheck::ops::{ContentItem, Operation, Transaction, text_items};

/// The linear typed content buffer of a document.
///
/// User-visible content occupies `[0, visible_len)`. Anything appended past
/// that boundary is internal storage (the reference-list region) and is
/// never treated as user-authored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentData {
    items: Vec<ContentItem>,
    visible_len: usize,
}

impl ContentData {
    pub fn from_items(items: Vec<ContentItem>) -> Self {
        let visible_len = items.len();
        Self { items, visible_len }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_items(text_items(text))
    }

    /// Append items past the user-visible boundary.
    pub fn append_internal(&mut self, items: Vec<ContentItem>) {
        self.items.extend(items);
    }

    pub fn visible_len(&self) -> usize {
        self.visible_len
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    /// Whether the item at `offset` is a structural element. Offsets past
    /// the buffer are treated as plain non-elements.
    pub fn is_element_at(&self, offset: usize) -> bool {
        self.items.get(offset).is_some_and(ContentItem::is_element)
    }

    pub fn element_type_at(&self, offset: usize) -> Option<&str> {
        self.items.get(offset)?.type_tag()
    }
}

/// An editable document: the content buffer in its current state plus the
/// session's transaction history. The history is what the edit check
/// replays; the buffer is what it probes for existing markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    data: ContentData,
    history: EditHistory,
}

impl Document {
    pub fn new(data: ContentData) -> Self {
        Self {
            data,
            history: EditHistory::new(),
        }
    }

    pub fn with_history(data: ContentData, history: EditHistory) -> Self {
        Self { data, history }
    }

    pub fn data(&self) -> &ContentData {
        &self.data
    }

    pub fn record(&mut self, transaction: Transaction) {
        self.history.record(transaction);
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }
}

/// What the edit check needs from a document: the squashed session history,
/// the user-visible content length, and an annotation probe over the
/// current buffer.
pub trait DocumentModel {
    fn squashed_operations(&self) -> Result<Vec<Operation>, SquashError>;
    fn content_length(&self) -> usize;
    fn is_element_at(&self, offset: usize) -> bool;
    fn element_type_at(&self, offset: usize) -> Option<&str>;
}

impl DocumentModel for Document {
    fn squashed_operations(&self) -> Result<Vec<Operation>, SquashError> {
        Ok(self.history.squash()?.operations)
    }

    fn content_length(&self) -> usize {
        self.data.visible_len()
    }

    fn is_element_at(&self, offset: usize) -> bool {
        self.data.is_element_at(offset)
    }

    fn element_type_at(&self, offset: usize) -> Option<&str> {
        self.data.element_type_at(offset)
    }
}
