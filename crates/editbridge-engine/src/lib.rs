pub mod client;
pub mod editcheck;
pub mod models;


// Re-export key types for easier usage
pub use client::{DirectClient, Flavor, ResponseEnvelope, TransformError};
pub use editcheck::{Document, EditCheckOptions, added_content_needs_reference};
pub use models::{Namespace, PageIdentity, Revision, UserIdentity};
