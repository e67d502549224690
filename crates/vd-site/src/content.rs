//! Content resolution: one sidebar item to one page record.

use std::collections::HashMap;

use serde::Serialize;

use vd_vcs::{TreeObject, Vcs};

use crate::error::SiteError;
use crate::frontmatter;
use crate::sidebar::SidebarItem;

/// A normalized documentation page.
///
/// Created once during resolution, consumed once by the emitter, never
/// mutated afterward. Front-matter fields beyond `title` and
/// `description` are carried in `extra` and merged into the serialized
/// record verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// URL path: the version base path plus the item name (anchor
    /// items carry their href here).
    pub path: String,
    /// Page title from front matter (or the anchor title).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page description from front matter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown body with front matter stripped. Empty for anchors,
    /// which serialize without a body.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Repo-root-relative source path (leading slash), for "edit this
    /// page" links. Empty for anchors, which have no source file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_path: String,
    /// True for anchor items; anchors appear in version contents but
    /// never become routes.
    #[serde(skip_serializing_if = "is_false")]
    pub anchor: bool,
    /// Remaining front-matter fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Everything needed to resolve items within one version.
pub(crate) struct VersionContext<'a> {
    pub vcs: &'a dyn Vcs,
    /// Tag (revision) this version reads from.
    pub tag: &'a str,
    /// Major version key, for error messages.
    pub key: &'a str,
    /// `/` for the current version, `/v{MAJOR}/` otherwise.
    pub base_path: &'a str,
    /// Content root path prefix within the tree.
    pub content_dir: &'a str,
    /// Working-copy root relative to the repo toplevel ("" when they
    /// coincide).
    pub docs_root: &'a str,
    /// Markdown objects under the content root (candidate docs).
    pub docs: &'a [TreeObject],
    /// All markdown paths in the tree (symlink targets may live
    /// outside the content root).
    pub markdown_paths: &'a [String],
}

/// Resolve one sidebar item into a page.
///
/// Anchor items pass through without any VCS access. Doc items are
/// looked up in the version's content-root markdown list, fetched at
/// the tag, and parsed for front matter.
///
/// Returns `Ok(None)` for a symlinked doc whose target is missing from
/// the tree: fetching a nonexistent historical blob can corrupt
/// subsequent VCS calls in the same session, so the item is skipped
/// instead of probed.
///
/// # Errors
///
/// - [`SiteError::DocNotFound`] when the referenced doc is absent
///   (fatal for the enclosing version)
/// - [`SiteError::Vcs`] / [`SiteError::Yaml`] on fetch or front-matter
///   failure
pub(crate) fn resolve_item(
    ctx: &VersionContext<'_>,
    item: &SidebarItem,
) -> Result<Option<Page>, SiteError> {
    let name = match item {
        SidebarItem::Anchor { title, href } => {
            return Ok(Some(Page {
                path: href.clone(),
                title: Some(title.clone()),
                anchor: true,
                ..Page::default()
            }));
        }
        SidebarItem::Doc(name) => name,
    };

    let file_path = format!("{}/{name}.md", ctx.content_dir);
    let doc = ctx
        .docs
        .iter()
        .find(|object| object.path == file_path)
        .ok_or_else(|| SiteError::DocNotFound {
            path: file_path.clone(),
            key: ctx.key.to_owned(),
        })?;

    let mut text = ctx.vcs.show(ctx.tag, &doc.path)?;
    if doc.is_symlink() {
        // The blob of a symlink is its target; resolve it against the
        // containing directory.
        let directory = doc.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let target = resolve_link(directory, text.trim_end());

        if !ctx.markdown_paths.iter().any(|path| *path == target) {
            tracing::debug!(
                tag = ctx.tag,
                link = %doc.path,
                target = %target,
                "Symlink target missing from tree, skipping item"
            );
            return Ok(None);
        }
        text = ctx.vcs.show(ctx.tag, &target)?;
    }

    let (front, body) = frontmatter::parse(&text)?;

    // "index" collapses to the bare base path.
    let suffix = if name == "index" { "" } else { name.as_str() };
    Ok(Some(Page {
        path: format!("{}{suffix}", ctx.base_path),
        title: front.title,
        description: front.description,
        content: body,
        file_path: repo_file_path(ctx.docs_root, &file_path),
        anchor: false,
        extra: front.extra,
    }))
}

/// Resolve a symlink target against its containing directory,
/// POSIX-style (segment-wise, honoring `.` and `..`), yielding a
/// tree-root-relative path.
pub(crate) fn resolve_link(directory: &str, target: &str) -> String {
    let mut segments: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        directory.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Absolute path of a source file relative to the repository root.
pub(crate) fn repo_file_path(docs_root: &str, file_path: &str) -> String {
    if docs_root.is_empty() {
        format!("/{file_path}")
    } else {
        format!("/{docs_root}/{file_path}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vd_vcs::MockVcs;

    use super::*;

    fn doc_objects(vcs: &MockVcs, tag: &str, content_dir: &str) -> (Vec<TreeObject>, Vec<String>) {
        let tree = vcs.ls_tree(tag).unwrap();
        let markdown: Vec<TreeObject> = tree
            .into_iter()
            .filter(|o| o.path.ends_with(".md") || o.path.ends_with(".mdx"))
            .collect();
        let markdown_paths: Vec<String> = markdown.iter().map(|o| o.path.clone()).collect();
        let docs = markdown
            .into_iter()
            .filter(|o| o.path.starts_with(content_dir))
            .collect();
        (docs, markdown_paths)
    }

    fn context<'a>(
        vcs: &'a MockVcs,
        docs: &'a [TreeObject],
        markdown_paths: &'a [String],
    ) -> VersionContext<'a> {
        VersionContext {
            vcs,
            tag: "v1.0.0",
            key: "1",
            base_path: "/v1/",
            content_dir: "source",
            docs_root: "",
            docs,
            markdown_paths,
        }
    }

    #[test]
    fn test_anchor_passes_through_without_vcs_access() {
        let vcs = MockVcs::new();
        let ctx = context(&vcs, &[], &[]);

        let page = resolve_item(
            &ctx,
            &SidebarItem::Anchor {
                title: "GitHub".to_owned(),
                href: "https://github.com/acme/docs".to_owned(),
            },
        )
        .unwrap()
        .unwrap();

        assert!(page.anchor);
        assert_eq!(page.path, "https://github.com/acme/docs");
        assert_eq!(page.title, Some("GitHub".to_owned()));
        assert_eq!(vcs.show_calls(), 0);
    }

    #[test]
    fn test_anchor_serializes_without_content_or_file_path() {
        let page = Page {
            path: "https://github.com/acme/docs".to_owned(),
            title: Some("GitHub".to_owned()),
            anchor: true,
            ..Page::default()
        };

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["path"], "https://github.com/acme/docs");
        assert_eq!(value["anchor"], true);
        assert!(value.get("content").is_none());
        assert!(value.get("filePath").is_none());
    }

    #[test]
    fn test_doc_resolves_to_page() {
        let vcs = MockVcs::new().with_file(
            "v1.0.0",
            "source/features/caching.md",
            "---\ntitle: Caching\ndescription: Cache things\n---\n# Caching\n",
        );
        let (docs, markdown_paths) = doc_objects(&vcs, "v1.0.0", "source");
        let ctx = context(&vcs, &docs, &markdown_paths);

        let page = resolve_item(&ctx, &SidebarItem::Doc("features/caching".to_owned()))
            .unwrap()
            .unwrap();

        assert_eq!(page.path, "/v1/features/caching");
        assert_eq!(page.title, Some("Caching".to_owned()));
        assert_eq!(page.description, Some("Cache things".to_owned()));
        assert_eq!(page.content, "# Caching\n");
        assert_eq!(page.file_path, "/source/features/caching.md");
        assert!(!page.anchor);
    }

    #[test]
    fn test_index_collapses_to_base_path() {
        let vcs = MockVcs::new().with_file("v1.0.0", "source/index.md", "---\ntitle: Home\n---\nHi");
        let (docs, markdown_paths) = doc_objects(&vcs, "v1.0.0", "source");
        let ctx = context(&vcs, &docs, &markdown_paths);

        let page = resolve_item(&ctx, &SidebarItem::Doc("index".to_owned()))
            .unwrap()
            .unwrap();

        assert_eq!(page.path, "/v1/");
    }

    #[test]
    fn test_missing_doc_is_fatal() {
        let vcs = MockVcs::new().with_file("v1.0.0", "source/index.md", "Hi");
        let (docs, markdown_paths) = doc_objects(&vcs, "v1.0.0", "source");
        let ctx = context(&vcs, &docs, &markdown_paths);

        let err = resolve_item(&ctx, &SidebarItem::Doc("missing".to_owned())).unwrap_err();

        assert!(
            matches!(err, SiteError::DocNotFound { ref path, ref key }
                if path == "source/missing.md" && key == "1")
        );
    }

    #[test]
    fn test_symlink_followed_to_target() {
        let vcs = MockVcs::new()
            .with_file("v1.0.0", "shared/intro.md", "---\ntitle: Intro\n---\nShared")
            .with_symlink("v1.0.0", "source/intro.md", "../shared/intro.md");
        let (docs, markdown_paths) = doc_objects(&vcs, "v1.0.0", "source");
        let ctx = context(&vcs, &docs, &markdown_paths);

        let page = resolve_item(&ctx, &SidebarItem::Doc("intro".to_owned()))
            .unwrap()
            .unwrap();

        assert_eq!(page.title, Some("Intro".to_owned()));
        assert_eq!(page.content, "Shared");
        // The page keeps its own path, not the target's.
        assert_eq!(page.path, "/v1/intro");
    }

    #[test]
    fn test_symlink_followed_to_mdx_target() {
        // Targets outside the content root may be .mdx; the link
        // itself keeps its .md lookup name.
        let vcs = MockVcs::new()
            .with_file("v1.0.0", "shared/intro.mdx", "---\ntitle: Intro\n---\nShared mdx")
            .with_symlink("v1.0.0", "source/intro.md", "../shared/intro.mdx");
        let (docs, markdown_paths) = doc_objects(&vcs, "v1.0.0", "source");
        let ctx = context(&vcs, &docs, &markdown_paths);

        let page = resolve_item(&ctx, &SidebarItem::Doc("intro".to_owned()))
            .unwrap()
            .unwrap();

        assert_eq!(page.title, Some("Intro".to_owned()));
        assert_eq!(page.content, "Shared mdx");
        assert_eq!(page.path, "/v1/intro");
    }

    #[test]
    fn test_symlink_with_missing_target_is_skipped() {
        let vcs = MockVcs::new().with_symlink("v1.0.0", "source/intro.md", "../gone.md");
        let (docs, markdown_paths) = doc_objects(&vcs, "v1.0.0", "source");
        let ctx = context(&vcs, &docs, &markdown_paths);

        let resolved = resolve_item(&ctx, &SidebarItem::Doc("intro".to_owned())).unwrap();

        assert_eq!(resolved, None);
    }

    #[test]
    fn test_file_path_includes_docs_root() {
        let vcs = MockVcs::new().with_file("v1.0.0", "source/index.md", "Hi");
        let (docs, markdown_paths) = doc_objects(&vcs, "v1.0.0", "source");
        let mut ctx = context(&vcs, &docs, &markdown_paths);
        ctx.docs_root = "docs";

        let page = resolve_item(&ctx, &SidebarItem::Doc("index".to_owned()))
            .unwrap()
            .unwrap();

        assert_eq!(page.file_path, "/docs/source/index.md");
    }

    #[test]
    fn test_resolve_link_relative() {
        assert_eq!(resolve_link("source", "intro.md"), "source/intro.md");
        assert_eq!(resolve_link("source", "../shared/intro.md"), "shared/intro.md");
        assert_eq!(resolve_link("source/nested", "./a.md"), "source/nested/a.md");
    }

    #[test]
    fn test_resolve_link_absolute_target() {
        assert_eq!(resolve_link("source", "/shared/intro.md"), "shared/intro.md");
    }

    #[test]
    fn test_resolve_link_does_not_escape_root() {
        assert_eq!(resolve_link("source", "../../../a.md"), "a.md");
    }
}
