use std::sync::Arc;

use crate::client::envelope::ResponseEnvelope;
use crate::client::error::TransformError;
use crate::client::traits::{
    Flavor, HtmlTransformBody, InputTransformer, InputTransformerFactory, MetricsSink,
    OutputRenderer, OutputRendererFactory, RenderParams, StashCache,
};
use crate::models::{PageIdentity, Revision, UserIdentity};

/// Requested Parsoid HTML version. Keep this in sync with the Accept header
/// the editor client sends when it talks to a remote service instead.
pub const PARSOID_VERSION: &str = "2.4.0";

/// In-process stand-in for a remote rendering service.
///
/// Wraps an output-renderer factory and an input-transformer factory and
/// shapes their results into the exact [`ResponseEnvelope`] a remote REST
/// service would have produced, so callers never need to know where the
/// transform ran. A fresh collaborator handle is configured per call; the
/// client itself keeps no cross-call state.
///
/// All three public operations are total: collaborator failures come back
/// as failure envelopes, never as errors.
pub struct DirectClient<R, T> {
    stash: Arc<dyn StashCache>,
    metrics: Arc<dyn MetricsSink>,
    renderers: R,
    transformers: T,
    performer: UserIdentity,
}

impl<R, T> DirectClient<R, T>
where
    R: OutputRendererFactory,
    T: InputTransformerFactory,
{
    pub fn new(
        stash: Arc<dyn StashCache>,
        metrics: Arc<dyn MetricsSink>,
        renderers: R,
        transformers: T,
        performer: UserIdentity,
    ) -> Self {
        Self {
            stash,
            metrics,
            renderers,
            transformers,
            performer,
        }
    }

    /// Render a stored revision to HTML.
    ///
    /// Always stashes: the caller is an interactive editor that may
    /// re-request the identical render when saving.
    pub fn page_html(
        &self,
        revision: &Revision,
        target_language: Option<&str>,
    ) -> ResponseEnvelope {
        let helper = self.output_renderer(
            &revision.page,
            Some(revision),
            target_language,
            RenderParams {
                stash: true,
                flavor: Flavor::default(),
            },
        );
        self.render_with(helper)
    }

    /// Render a wikitext fragment to HTML, parsed in the context of `page`.
    ///
    /// The wikitext is wrapped in an ephemeral id-0 revision; nothing is
    /// written to storage. `body_only` switches the render to the
    /// `fragment` flavor.
    pub fn transform_wikitext(
        &self,
        page: &PageIdentity,
        target_language: &str,
        wikitext: &str,
        body_only: bool,
        _base_revision_id: Option<u64>,
        stash: bool,
    ) -> ResponseEnvelope {
        let revision = Revision::ephemeral(page, wikitext);
        let mut helper = self.output_renderer(
            page,
            Some(&revision),
            Some(target_language),
            RenderParams {
                stash,
                flavor: Flavor::default(),
            },
        );
        if body_only {
            helper.set_flavor(Flavor::Fragment);
        }
        self.render_with(helper)
    }

    /// Transform edited HTML back to wikitext.
    pub fn transform_html(
        &self,
        page: &PageIdentity,
        target_language: &str,
        html: &str,
        base_revision_id: Option<u64>,
        etag: Option<&str>,
    ) -> ResponseEnvelope {
        let body = HtmlTransformBody::new(html, base_revision_id, etag.map(str::to_string));
        let mut helper = self.transformers.configure(
            &self.stash,
            &self.metrics,
            page,
            body,
            Some(target_language),
        );
        match helper.transform_to_content() {
            Ok(content) => {
                let format = content.default_format().to_string();
                let body = content.serialize(&format);
                ResponseEnvelope::serialized_content(format, body)
            }
            Err(err) => self.failure(err),
        }
    }

    fn output_renderer(
        &self,
        page: &PageIdentity,
        revision: Option<&Revision>,
        language: Option<&str>,
        params: RenderParams,
    ) -> R::Handle {
        self.renderers.configure(
            &self.stash,
            &self.metrics,
            page,
            params,
            &self.performer,
            revision,
            language,
        )
    }

    fn render_with(&self, mut helper: R::Handle) -> ResponseEnvelope {
        match helper.render_to_html() {
            Ok(html) => ResponseEnvelope::rendered_html(
                html.text,
                helper.content_language(),
                helper.etag(),
            ),
            Err(err) => self.failure(err),
        }
    }

    fn failure(&self, err: TransformError) -> ResponseEnvelope {
        log::debug!("collaborator failure mapped to response envelope: {err}");
        ResponseEnvelope::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{
        StubRendererFactory, StubTransformerFactory, memory_stash, null_metrics, test_page,
        test_user,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn client(
        renderers: StubRendererFactory,
        transformers: StubTransformerFactory,
    ) -> DirectClient<StubRendererFactory, StubTransformerFactory> {
        DirectClient::new(
            memory_stash(),
            null_metrics(),
            renderers,
            transformers,
            test_user(),
        )
    }

    #[test]
    fn test_page_html_success_envelope() {
        let renderers = StubRendererFactory::succeeding("<p>rendered</p>", "en", "W/\"1234/r1\"");
        let spy = renderers.spy();
        let client = client(renderers, StubTransformerFactory::succeeding("ignored"));
        let revision = Revision::new(1234, test_page(), "source text");

        let envelope = client.page_html(&revision, Some("en"));

        assert!(envelope.is_success());
        assert_eq!(envelope.code(), Some(200));
        assert_eq!(envelope.body(), "<p>rendered</p>");
        assert_eq!(envelope.headers().get("content-language").unwrap(), "en");
        assert_eq!(envelope.headers().get("etag").unwrap(), "W/\"1234/r1\"");

        let spy = spy.borrow();
        let params = spy.params.unwrap();
        assert!(params.stash, "page renders always stash");
        assert_eq!(params.flavor, Flavor::View);
        assert_eq!(spy.revision.as_ref().unwrap().id, 1234);
        assert_eq!(spy.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_page_html_failure_envelope() {
        let renderers = StubRendererFactory::failing(TransformError::localized(
            404,
            "rest-nonexistent-title",
            vec![],
        ));
        let client = client(renderers, StubTransformerFactory::succeeding("ignored"));
        let revision = Revision::new(1234, test_page(), "source text");

        let envelope = client.page_html(&revision, None);

        assert!(!envelope.is_success());
        assert_eq!(envelope.code(), None);
        assert_eq!(envelope.error().unwrap().message, "rest-nonexistent-title");
    }

    #[rstest]
    #[case(true, Flavor::Fragment)]
    #[case(false, Flavor::View)]
    fn test_transform_wikitext_flavor(#[case] body_only: bool, #[case] expected: Flavor) {
        let renderers = StubRendererFactory::succeeding("<p/>", "en", "W/\"0/r2\"");
        let spy = renderers.spy();
        let client = client(renderers, StubTransformerFactory::succeeding("ignored"));

        let envelope = client.transform_wikitext(
            &test_page(),
            "en",
            "some ''wikitext''",
            body_only,
            None,
            false,
        );

        assert!(envelope.is_success());
        assert_eq!(spy.borrow().flavor, Some(expected));
    }

    #[test]
    fn test_transform_wikitext_builds_ephemeral_revision() {
        let renderers = StubRendererFactory::succeeding("<p/>", "en", "W/\"0/r3\"");
        let spy = renderers.spy();
        let stash = memory_stash();
        let client = DirectClient::new(
            Arc::clone(&stash) as Arc<dyn StashCache>,
            null_metrics(),
            renderers,
            StubTransformerFactory::succeeding("ignored"),
            test_user(),
        );

        client.transform_wikitext(&test_page(), "en", "new ''wikitext''", false, Some(99), true);

        let spy = spy.borrow();
        let revision = spy.revision.as_ref().unwrap();
        assert_eq!(revision.id, 0, "preview revisions are never stored ones");
        assert!(revision.is_ephemeral());
        assert_eq!(revision.content, "new ''wikitext''");
        assert_eq!(spy.params.unwrap().stash, true);
    }

    #[test]
    fn test_transform_html_success_envelope() {
        let transformers = StubTransformerFactory::succeeding("== restored wikitext ==");
        let spy = transformers.spy();
        let client = client(
            StubRendererFactory::succeeding("unused", "en", "W/\"0/r4\""),
            transformers,
        );

        let envelope = client.transform_html(
            &test_page(),
            "en",
            "<p>edited html</p>",
            Some(1234),
            Some("W/\"1234/00000000-0000-4000-8000-000000000000\""),
        );

        assert!(envelope.is_success());
        assert_eq!(envelope.code(), Some(200));
        assert_eq!(envelope.headers().get("Content-Type").unwrap(), "text/x-wiki");
        assert_eq!(envelope.body(), "== restored wikitext ==");

        let spy = spy.borrow();
        let body = spy.body.as_ref().unwrap();
        assert_eq!(body.html.body, "<p>edited html</p>");
        assert_eq!(body.original.revid, Some(1234));
        assert_eq!(
            body.original.etag.as_deref(),
            Some("W/\"1234/00000000-0000-4000-8000-000000000000\"")
        );
        assert_eq!(spy.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_transform_html_failure_envelope() {
        let transformers = StubTransformerFactory::failing(TransformError::raw(
            500,
            "transform backend unavailable",
        ));
        let client = client(
            StubRendererFactory::succeeding("unused", "en", "W/\"0/r5\""),
            transformers,
        );

        let envelope = client.transform_html(&test_page(), "en", "<p/>", None, None);

        assert!(!envelope.is_success());
        let error = envelope.error().unwrap();
        assert_eq!(error.message, "");
        assert!(error.params.is_empty());
        assert_eq!(envelope.body(), "transform backend unavailable");
    }

    #[test]
    fn test_no_stash_write_from_client_itself() {
        // The client only passes the stash through; writing to it is the
        // renderer's business.
        let renderers = StubRendererFactory::succeeding("<p/>", "en", "W/\"0/r6\"");
        let stash = memory_stash();
        let client = DirectClient::new(
            Arc::clone(&stash) as Arc<dyn StashCache>,
            null_metrics(),
            renderers,
            StubTransformerFactory::succeeding("ignored"),
            test_user(),
        );

        client.transform_wikitext(&test_page(), "en", "text", false, None, false);

        assert!(stash.is_empty());
    }
}
