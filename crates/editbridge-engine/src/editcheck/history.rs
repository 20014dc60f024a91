use thiserror::Error;

use crate::editcheck::ops::{ContentItem, Operation, Transaction};

/// Edit-history flattening failure. The detector treats any of these as
/// "no insertion worth flagging"; callers that own the history may want
/// the detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquashError {
    #[error(
        "transaction {index} expects a document of {expected} items but the preceding edits produce {found}"
    )]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("removed content at offset {offset} does not match the document")]
    RemovalMismatch { offset: usize },
}

/// The cumulative edit history of a session: transactions in application
/// order, each spanning the document state the previous one produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditHistory {
    transactions: Vec<Transaction>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Flatten the history into the minimal single transaction describing
    /// the net change since the session began.
    ///
    /// Composition fails when adjacent transactions disagree on document
    /// length, or when a later removal does not match what an earlier
    /// transaction inserted.
    pub fn squash(&self) -> Result<Transaction, SquashError> {
        let mut iter = self.transactions.iter().enumerate();
        let Some((_, first)) = iter.next() else {
            return Ok(Transaction::default());
        };
        let mut squashed = first.clone();
        for (index, transaction) in iter {
            squashed = compose(&squashed, transaction, index)?;
        }
        Ok(squashed)
    }
}

/// Single-position view of an operation sequence. `Mark` is a zero-width
/// non-content operation that must survive composition in place.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Keep,
    Del(ContentItem),
    Ins(ContentItem),
    Mark(String),
}

fn atoms(transaction: &Transaction) -> Vec<Atom> {
    let mut out = Vec::new();
    for op in &transaction.operations {
        match op {
            Operation::Retain { length } => out.extend(std::iter::repeat_n(Atom::Keep, *length)),
            Operation::Replace { remove, insert } => {
                out.extend(remove.iter().cloned().map(Atom::Del));
                out.extend(insert.iter().cloned().map(Atom::Ins));
            }
            Operation::Attribute { key } => out.push(Atom::Mark(key.clone())),
        }
    }
    out
}

fn rebuild(atoms: Vec<Atom>) -> Transaction {
    let mut operations = Vec::new();
    let mut retain = 0usize;
    let mut remove: Vec<ContentItem> = Vec::new();
    let mut insert: Vec<ContentItem> = Vec::new();

    fn flush(
        operations: &mut Vec<Operation>,
        retain: &mut usize,
        remove: &mut Vec<ContentItem>,
        insert: &mut Vec<ContentItem>,
    ) {
        if *retain > 0 {
            operations.push(Operation::Retain { length: *retain });
            *retain = 0;
        }
        if !remove.is_empty() || !insert.is_empty() {
            operations.push(Operation::Replace {
                remove: std::mem::take(remove),
                insert: std::mem::take(insert),
            });
        }
    }

    for atom in atoms {
        match atom {
            Atom::Keep => {
                if !remove.is_empty() || !insert.is_empty() {
                    flush(&mut operations, &mut retain, &mut remove, &mut insert);
                }
                retain += 1;
            }
            Atom::Del(item) => {
                if retain > 0 {
                    flush(&mut operations, &mut retain, &mut remove, &mut insert);
                }
                remove.push(item);
            }
            Atom::Ins(item) => {
                if retain > 0 {
                    flush(&mut operations, &mut retain, &mut remove, &mut insert);
                }
                insert.push(item);
            }
            Atom::Mark(key) => {
                flush(&mut operations, &mut retain, &mut remove, &mut insert);
                operations.push(Operation::Attribute { key });
            }
        }
    }
    flush(&mut operations, &mut retain, &mut remove, &mut insert);
    Transaction::new(operations)
}

/// Compose two adjacent transactions into one spanning the same base
/// document as `first` and producing the same result as `second`.
fn compose(
    first: &Transaction,
    second: &Transaction,
    index: usize,
) -> Result<Transaction, SquashError> {
    let expected = second.base_len();
    let found = first.result_len();
    if expected != found {
        return Err(SquashError::LengthMismatch {
            index,
            expected,
            found,
        });
    }

    let mut result = Vec::new();
    let mut first_atoms = atoms(first).into_iter();
    let mut offset = 0usize;

    for atom in atoms(second) {
        match atom {
            Atom::Ins(item) => result.push(Atom::Ins(item)),
            Atom::Mark(key) => result.push(Atom::Mark(key)),
            Atom::Keep => {
                consume_one(&mut first_atoms, None, &mut result)
                    .map_err(|kind| squash_error(kind, index, expected, found, offset))?;
                offset += 1;
            }
            Atom::Del(item) => {
                consume_one(&mut first_atoms, Some(item), &mut result)
                    .map_err(|kind| squash_error(kind, index, expected, found, offset))?;
                offset += 1;
            }
        }
    }

    // Whatever `first` has left must be invisible to `second`.
    for atom in first_atoms {
        match atom {
            Atom::Del(item) => result.push(Atom::Del(item)),
            Atom::Mark(key) => result.push(Atom::Mark(key)),
            Atom::Keep | Atom::Ins(_) => {
                return Err(SquashError::LengthMismatch {
                    index,
                    expected,
                    found,
                });
            }
        }
    }

    Ok(rebuild(result))
}

enum ConsumeError {
    Exhausted,
    Mismatch,
}

fn squash_error(
    kind: ConsumeError,
    index: usize,
    expected: usize,
    found: usize,
    offset: usize,
) -> SquashError {
    match kind {
        ConsumeError::Exhausted => SquashError::LengthMismatch {
            index,
            expected,
            found,
        },
        ConsumeError::Mismatch => SquashError::RemovalMismatch { offset },
    }
}

/// Advance `first` until one of its output positions is consumed, emitting
/// its pass-through deletions and marks along the way. `deleted` is the
/// item the second transaction removes at this position, if any.
fn consume_one(
    first: &mut impl Iterator<Item = Atom>,
    deleted: Option<ContentItem>,
    result: &mut Vec<Atom>,
) -> Result<(), ConsumeError> {
    loop {
        match first.next() {
            Some(Atom::Del(item)) => result.push(Atom::Del(item)),
            Some(Atom::Mark(key)) => result.push(Atom::Mark(key)),
            Some(Atom::Keep) => {
                match deleted {
                    // Second keeps a position the first kept from the base.
                    None => result.push(Atom::Keep),
                    // Second deletes base content the first left alone.
                    Some(item) => result.push(Atom::Del(item)),
                }
                return Ok(());
            }
            Some(Atom::Ins(item)) => {
                match deleted {
                    // Second keeps content the first inserted.
                    None => result.push(Atom::Ins(item)),
                    // Second deletes content the first inserted: the two
                    // cancel, but only if they agree on what was there.
                    Some(removed) => {
                        if removed != item {
                            return Err(ConsumeError::Mismatch);
                        }
                    }
                }
                return Ok(());
            }
            None => return Err(ConsumeError::Exhausted),
        }
    }
}
