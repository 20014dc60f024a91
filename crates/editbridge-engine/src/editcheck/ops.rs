use serde::{Deserialize, Serialize};

/// One unit of the linear content buffer: a character of text or a typed
/// structural element (e.g. a reference marker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentItem {
    Char(char),
    Element {
        #[serde(rename = "type")]
        type_tag: String,
    },
}

impl ContentItem {
    pub fn element(type_tag: impl Into<String>) -> Self {
        ContentItem::Element {
            type_tag: type_tag.into(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, ContentItem::Element { .. })
    }

    pub fn type_tag(&self) -> Option<&str> {
        match self {
            ContentItem::Char(_) => None,
            ContentItem::Element { type_tag } => Some(type_tag),
        }
    }
}

/// Convert plain text into content items, one per character.
pub fn text_items(text: &str) -> Vec<ContentItem> {
    text.chars().map(ContentItem::Char).collect()
}

/// A single edit operation. Operations are ordered and, starting from
/// offset 0, partition the content buffer they apply to.
///
/// The detector only interprets `Retain` and `Replace`; anything else
/// (attribute changes and the like) must survive replay untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    Retain {
        length: usize,
    },
    Replace {
        remove: Vec<ContentItem>,
        insert: Vec<ContentItem>,
    },
    Attribute {
        key: String,
    },
}

impl Operation {
    pub fn retain(length: usize) -> Self {
        Operation::Retain { length }
    }

    pub fn insert(items: Vec<ContentItem>) -> Self {
        Operation::Replace {
            remove: vec![],
            insert: items,
        }
    }

    pub fn insert_text(text: &str) -> Self {
        Self::insert(text_items(text))
    }
}

/// An ordered operation list spanning the whole document it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub operations: Vec<Operation>,
}

impl Transaction {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Length of the document this transaction applies to.
    pub fn base_len(&self) -> usize {
        self.operations
            .iter()
            .map(|op| match op {
                Operation::Retain { length } => *length,
                Operation::Replace { remove, .. } => remove.len(),
                Operation::Attribute { .. } => 0,
            })
            .sum()
    }

    /// Length of the document this transaction produces.
    pub fn result_len(&self) -> usize {
        self.operations
            .iter()
            .map(|op| match op {
                Operation::Retain { length } => *length,
                Operation::Replace { insert, .. } => insert.len(),
                Operation::Attribute { .. } => 0,
            })
            .sum()
    }
}

/// Half-open range of absolute offsets into the final content buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub start: usize,
    pub end: usize,
}

impl ContentRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_items() {
        let items = text_items("ab");
        assert_eq!(items, vec![ContentItem::Char('a'), ContentItem::Char('b')]);
        assert!(!items[0].is_element());
        assert_eq!(items[0].type_tag(), None);
    }

    #[test]
    fn test_element_item() {
        let item = ContentItem::element("mwReference");
        assert!(item.is_element());
        assert_eq!(item.type_tag(), Some("mwReference"));
    }

    #[test]
    fn test_transaction_lengths() {
        let txn = Transaction::new(vec![
            Operation::retain(10),
            Operation::Replace {
                remove: text_items("old"),
                insert: text_items("newer"),
            },
            Operation::Attribute { key: "level".into() },
            Operation::retain(5),
        ]);

        assert_eq!(txn.base_len(), 18);
        assert_eq!(txn.result_len(), 20);
    }

    #[test]
    fn test_content_range() {
        let range = ContentRange::new(10, 70);
        assert_eq!(range.len(), 60);
        assert!(!range.is_empty());
        assert!(ContentRange::new(4, 4).is_empty());
    }

    #[test]
    fn test_operation_wire_shape() {
        let op = Operation::retain(3);
        let wire = serde_json::to_value(&op).unwrap();
        assert_eq!(wire, serde_json::json!({ "type": "retain", "length": 3 }));
    }
}
