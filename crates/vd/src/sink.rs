//! JSON page sink: one document per page-creation request.
//!
//! The standalone build has no host framework to hand pages to, so
//! each request is written as a JSON document a downstream renderer
//! can consume.

use std::fs;
use std::path::PathBuf;

use vd_site::{EmitError, PageContext, PageSink};

/// Sink writing one pretty-printed JSON document per page into a
/// directory.
pub(crate) struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    /// Create a sink writing into `dir`. The directory is created on
    /// the first page.
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Derive a filename from a route: slashes become `__`, the bare
    /// root becomes `index`.
    fn file_name(path: &str) -> String {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            "index.json".to_owned()
        } else {
            format!("{}.json", trimmed.replace('/', "__"))
        }
    }
}

impl PageSink for JsonSink {
    fn create_page(
        &mut self,
        path: &str,
        template: &str,
        context: &PageContext<'_>,
    ) -> Result<(), EmitError> {
        fs::create_dir_all(&self.dir)?;

        let document = serde_json::json!({
            "path": path,
            "template": template,
            "context": context,
        });
        let target = self.dir.join(Self::file_name(path));
        fs::write(&target, serde_json::to_vec_pretty(&document)?)?;
        tracing::debug!(path, target = %target.display(), "Wrote page document");
        Ok(())
    }
}
