/*!
 * # Edit checks
 *
 * Advisory checks over the editor's in-browser document model. The one
 * check implemented here answers: did this editing session add a long run
 * of content with no citation? The editor uses the answer to nudge the
 * user before saving.
 *
 * - **`ops`**: the operation algebra (`Retain`/`Replace`/other) and the
 *   typed content items they move around
 * - **`history`**: the session transaction log and its squash into one
 *   minimal net-change transaction
 * - **`document`**: the concrete content buffer plus the [`DocumentModel`]
 *   seam the detector consumes
 * - **`detector`**: [`added_content_needs_reference`] itself
 */

pub mod detector;
pub mod document;
pub mod history;
pub mod ops;

pub use detector::{EditCheckOptions, REFERENCE_TYPE, added_content_needs_reference};
pub use document::{ContentData, Document, DocumentModel};
pub use history::{EditHistory, SquashError};
pub use ops::{ContentItem, ContentRange, Operation, Transaction, text_items};
