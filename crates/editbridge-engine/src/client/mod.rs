/*!
 * # Rendering-service client
 *
 * In-process replacement for a remote wikitext rendering service. The
 * editor used to talk to a REST endpoint; [`DirectClient`] keeps that
 * contract but runs the render locally through injected collaborator
 * traits:
 *
 * - **`envelope`**: [`ResponseEnvelope`], the wire-compatible success or
 *   failure record every operation returns
 * - **`error`**: [`TransformError`] and the localizable-message sum type
 * - **`etag`**: weak entity tags keying the render stash
 * - **`traits`**: the renderer/transformer factory seams plus the opaque
 *   stash and metrics handles passed through to them
 * - **`direct`**: [`DirectClient`] itself, wiring the three operations
 *   (page render, wikitext-to-HTML, HTML-to-wikitext)
 */

pub mod direct;
pub mod envelope;
pub mod error;
pub mod etag;
pub mod traits;

pub use direct::{DirectClient, PARSOID_VERSION};
pub use envelope::{ErrorBody, Headers, ResponseEnvelope};
pub use error::{LocalizableError, TransformError};
pub use etag::ETag;
pub use traits::{
    Flavor, HtmlPayload, HtmlTransformBody, InputTransformer, InputTransformerFactory,
    MemoryStash, MetricsSink, NullMetrics, OriginalRef, OutputRenderer, OutputRendererFactory,
    RenderParams, RenderedHtml, StashCache, TransformedContent,
};
