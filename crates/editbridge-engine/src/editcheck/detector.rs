use serde::{Deserialize, Serialize};

use crate::editcheck::document::DocumentModel;
use crate::editcheck::ops::{ContentRange, Operation};
use crate::models::Namespace;

/// Element type tag of a citation marker.
pub const REFERENCE_TYPE: &str = "mwReference";

/// Tuning for [`added_content_needs_reference`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditCheckOptions {
    /// Minimum inserted length before an insertion is worth flagging.
    pub minimum_characters: usize,
    /// Element types that count as an existing citation.
    pub reference_types: Vec<String>,
}

impl Default for EditCheckOptions {
    fn default() -> Self {
        Self {
            minimum_characters: 50,
            reference_types: vec![REFERENCE_TYPE.to_string()],
        }
    }
}

/// Decide whether the session added a run of content long enough to need a
/// citation and not already covered by one.
///
/// Replays the squashed edit history to recover the ranges inserted since
/// the session began, independent of how many keystrokes produced them.
/// Only meaningful for articles, so any non-main namespace is an immediate
/// `false`. A history that fails to squash is also `false`: the check is
/// advisory, and a missed nudge beats a crash.
pub fn added_content_needs_reference(
    doc: &impl DocumentModel,
    namespace: Namespace,
    options: &EditCheckOptions,
) -> bool {
    if !namespace.is_main() {
        return false;
    }

    let operations = match doc.squashed_operations() {
        Ok(operations) => operations,
        Err(err) => {
            log::warn!("edit history failed to squash, skipping reference check: {err}");
            return false;
        }
    };

    inserted_ranges(&operations, doc.content_length())
        .iter()
        .any(|range| {
            range.len() >= options.minimum_characters && !contains_reference(doc, range, options)
        })
}

/// Ranges of the final buffer inserted by the session's net edit.
///
/// Walks operations in order: retains advance the offset, replaces record
/// the span their insertion occupies. The walk stops once the offset
/// reaches `end_offset`; operations past that point describe the internal
/// reference-list region, not user-authored content.
fn inserted_ranges(operations: &[Operation], end_offset: usize) -> Vec<ContentRange> {
    let mut ranges = Vec::new();
    let mut offset = 0;
    for op in operations {
        match op {
            Operation::Retain { length } => offset += length,
            Operation::Replace { insert, .. } => {
                ranges.push(ContentRange::new(offset, offset + insert.len()));
                offset += insert.len();
            }
            Operation::Attribute { .. } => {}
        }
        if offset >= end_offset {
            break;
        }
    }
    ranges
}

fn contains_reference(
    doc: &impl DocumentModel,
    range: &ContentRange,
    options: &EditCheckOptions,
) -> bool {
    (range.start..range.end).any(|offset| {
        doc.is_element_at(offset)
            && doc
                .element_type_at(offset)
                .is_some_and(|tag| options.reference_types.iter().any(|t| t == tag))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editcheck::document::{ContentData, Document};
    use crate::editcheck::history::{EditHistory, SquashError};
    use crate::editcheck::ops::{ContentItem, Transaction, text_items};
    use rstest::rstest;

    /// Document whose squashed history is given directly, with an optional
    /// reference marker placed in the buffer.
    fn doc_with_insert(
        total_visible: usize,
        insert_at: usize,
        insert_len: usize,
        marker_offset: Option<usize>,
    ) -> Document {
        let mut items = text_items(&"x".repeat(total_visible));
        if let Some(offset) = marker_offset {
            items[offset] = ContentItem::element(REFERENCE_TYPE);
        }
        let mut operations = Vec::new();
        if insert_at > 0 {
            operations.push(Operation::retain(insert_at));
        }
        let inserted: Vec<ContentItem> = items[insert_at..insert_at + insert_len].to_vec();
        operations.push(Operation::Replace {
            remove: vec![],
            insert: inserted,
        });
        if total_visible > insert_at + insert_len {
            operations.push(Operation::retain(total_visible - insert_at - insert_len));
        }
        Document::with_history(
            ContentData::from_items(items),
            EditHistory::from_transactions(vec![Transaction::new(operations)]),
        )
    }

    #[test]
    fn test_long_unreferenced_insertion_is_flagged() {
        // [Retain(10), Replace(+60), Retain(5)] over a 75-unit document.
        let doc = doc_with_insert(75, 10, 60, None);
        assert!(added_content_needs_reference(
            &doc,
            Namespace::MAIN,
            &EditCheckOptions::default()
        ));
    }

    #[test]
    fn test_insertion_containing_reference_is_not_flagged() {
        // Same shape, but a reference marker sits at offset 40 inside [10, 70).
        let doc = doc_with_insert(75, 10, 60, Some(40));
        assert!(!added_content_needs_reference(
            &doc,
            Namespace::MAIN,
            &EditCheckOptions::default()
        ));
    }

    #[test]
    fn test_reference_outside_inserted_range_does_not_count() {
        let doc = doc_with_insert(80, 10, 60, Some(75));
        assert!(added_content_needs_reference(
            &doc,
            Namespace::MAIN,
            &EditCheckOptions::default()
        ));
    }

    #[rstest]
    #[case(49, false)]
    #[case(50, true)]
    #[case(51, true)]
    fn test_minimum_length_boundary(#[case] insert_len: usize, #[case] expected: bool) {
        let doc = doc_with_insert(60, 5, insert_len, None);
        assert_eq!(
            added_content_needs_reference(&doc, Namespace::MAIN, &EditCheckOptions::default()),
            expected
        );
    }

    #[test]
    fn test_non_main_namespace_short_circuits() {
        let doc = doc_with_insert(75, 10, 60, None);
        assert!(!added_content_needs_reference(
            &doc,
            Namespace::TALK,
            &EditCheckOptions::default()
        ));
        assert!(!added_content_needs_reference(
            &doc,
            Namespace(4),
            &EditCheckOptions::default()
        ));
    }

    #[test]
    fn test_squash_failure_counts_as_no_insertion() {
        // Two transactions that disagree on document length cannot squash.
        let mut doc = Document::new(ContentData::from_text(&"x".repeat(75)));
        doc.record(Transaction::new(vec![
            Operation::retain(10),
            Operation::insert_text(&"y".repeat(60)),
            Operation::retain(5),
        ]));
        doc.record(Transaction::new(vec![Operation::retain(9999)]));
        assert!(matches!(
            doc.history().squash(),
            Err(SquashError::LengthMismatch { .. })
        ));

        assert!(!added_content_needs_reference(
            &doc,
            Namespace::MAIN,
            &EditCheckOptions::default()
        ));
    }

    #[test]
    fn test_walk_stops_at_internal_list_boundary() {
        // Visible content is 50 units; a qualifying-looking replace appears
        // only past that boundary and must never be scanned.
        let mut data = ContentData::from_text(&"x".repeat(50));
        data.append_internal(text_items(&"r".repeat(60)));
        let history = EditHistory::from_transactions(vec![Transaction::new(vec![
            Operation::retain(50),
            Operation::insert_text(&"r".repeat(60)),
        ])]);
        let doc = Document::with_history(data, history);

        assert!(!added_content_needs_reference(
            &doc,
            Namespace::MAIN,
            &EditCheckOptions::default()
        ));
    }

    #[test]
    fn test_attribute_operations_are_ignored() {
        let mut doc = doc_with_insert(75, 10, 60, None);
        doc.record(Transaction::new(vec![
            Operation::retain(2),
            Operation::Attribute { key: "level".into() },
            Operation::retain(73),
        ]));

        assert!(added_content_needs_reference(
            &doc,
            Namespace::MAIN,
            &EditCheckOptions::default()
        ));
    }

    #[test]
    fn test_custom_options() {
        let options = EditCheckOptions {
            minimum_characters: 10,
            reference_types: vec!["citation".to_string()],
        };
        let doc = doc_with_insert(30, 5, 15, None);
        assert!(added_content_needs_reference(&doc, Namespace::MAIN, &options));

        // A marker of a non-configured type does not suppress the nudge.
        let doc = doc_with_insert(75, 10, 60, Some(40));
        assert!(added_content_needs_reference(&doc, Namespace::MAIN, &options));
    }

    #[test]
    fn test_inserted_ranges_walk() {
        let operations = vec![
            Operation::retain(10),
            Operation::insert_text(&"y".repeat(60)),
            Operation::retain(5),
        ];
        let ranges = inserted_ranges(&operations, 75);
        assert_eq!(ranges, vec![ContentRange::new(10, 70)]);
    }
}
