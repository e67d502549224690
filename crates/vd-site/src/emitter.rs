//! Page emission: assembled versions to rendered routes.
//!
//! Emission is generic over a [`PageSink`] so the pipeline can target a
//! real renderer, a JSON dump, or nothing at all (tests, dry runs).

use serde::Serialize;

use crate::assembler::VersionRecord;

/// Template identifier passed to sinks for every documentation page.
pub const PAGE_TEMPLATE: &str = "docs-page";

/// Errors produced by a sink are opaque to the pipeline.
pub type EmitError = Box<dyn std::error::Error + Send + Sync>;

/// Render context handed to the sink for one page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext<'a> {
    /// Markdown body with front matter stripped.
    pub content: &'a str,
    /// Page title, if the front matter carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    /// Page description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// The version this page belongs to.
    pub version: &'a VersionRecord,
    /// Repo-root-relative source path.
    pub file_path: &'a str,
    /// Every assembled version, for version-switcher rendering.
    pub versions: &'a [VersionRecord],
}

/// Destination for emitted pages.
pub trait PageSink {
    /// Create one page at `path` using `template` and `context`.
    ///
    /// # Errors
    ///
    /// Sink-specific; any error aborts emission.
    fn create_page(
        &mut self,
        path: &str,
        template: &str,
        context: &PageContext<'_>,
    ) -> Result<(), EmitError>;
}

/// Sink that discards every page. Useful for dry runs and for tests
/// that only care about assembly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PageSink for NullSink {
    fn create_page(
        &mut self,
        _path: &str,
        _template: &str,
        _context: &PageContext<'_>,
    ) -> Result<(), EmitError> {
        Ok(())
    }
}

/// Emit every non-anchor page of every version, returning the count of
/// pages created.
///
/// Anchor items remain visible in version contents (the sidebar renders
/// them) but produce no routes.
///
/// # Errors
///
/// Propagates the first sink error.
pub(crate) fn emit_pages(
    versions: &[VersionRecord],
    sink: &mut dyn PageSink,
) -> Result<usize, EmitError> {
    let mut created = 0;
    for version in versions {
        for category in &version.contents {
            for page in &category.pages {
                if page.anchor {
                    continue;
                }
                let context = PageContext {
                    content: &page.content,
                    title: page.title.as_deref(),
                    description: page.description.as_deref(),
                    version,
                    file_path: &page.file_path,
                    versions,
                };
                sink.create_page(&page.path, PAGE_TEMPLATE, &context)?;
                created += 1;
            }
        }
        tracing::info!(
            tag = %version.tag,
            base_path = %version.base_path,
            "Emitted version"
        );
    }
    Ok(created)
}
