//! End-to-end pipeline test against a mocked VCS.

use pretty_assertions::assert_eq;
use vd_site::{
    EmitError, GenerateOptions, PageContext, PageSink, SidebarCategory, SidebarItem, generate,
};
use vd_vcs::MockVcs;

/// Sink recording the route, title, and version tag of every page.
#[derive(Default)]
struct RecordingSink {
    pages: Vec<(String, Option<String>, String)>,
}

impl PageSink for RecordingSink {
    fn create_page(
        &mut self,
        path: &str,
        _template: &str,
        context: &PageContext<'_>,
    ) -> Result<(), EmitError> {
        self.pages.push((
            path.to_owned(),
            context.title.map(str::to_owned),
            context.version.tag.clone(),
        ));
        Ok(())
    }
}

fn current_sidebar() -> Vec<SidebarCategory> {
    vec![
        SidebarCategory {
            title: None,
            items: vec![SidebarItem::Doc("index".to_owned())],
        },
        SidebarCategory {
            title: Some("Features".to_owned()),
            items: vec![
                SidebarItem::Doc("features/caching".to_owned()),
                SidebarItem::Anchor {
                    title: "GitHub".to_owned(),
                    href: "https://github.com/acme/docs".to_owned(),
                },
            ],
        },
    ]
}

/// Three tags across two majors: v1.5.0 shadows v1.0.0, v2.0.0 is
/// current. The v1.5.0 tree carries its own sidebar and a symlinked
/// doc.
fn fixture() -> MockVcs {
    MockVcs::new()
        .with_remote("origin", "git@github.com:acme/docs.git")
        .with_tag("v2.0.0")
        .with_tag("v1.5.0")
        .with_tag("v1.0.0")
        .with_file(
            "v2.0.0",
            "source/index.md",
            "---\ntitle: Home\ndescription: Landing\n---\n# Welcome\n",
        )
        .with_file(
            "v2.0.0",
            "source/features/caching.md",
            "---\ntitle: Caching\n---\nFast.\n",
        )
        .with_file(
            "v1.5.0",
            "_config.yml",
            "sidebar_categories:\n  null:\n    - index\n    - intro\n",
        )
        .with_file("v1.5.0", "source/index.md", "---\ntitle: Old home\n---\nOld.\n")
        .with_file("v1.5.0", "shared/intro.md", "---\ntitle: Intro\n---\nShared.\n")
        .with_symlink("v1.5.0", "source/intro.md", "../shared/intro.md")
}

fn options() -> GenerateOptions {
    GenerateOptions {
        content_dir: "source".to_owned(),
        root: "/repo".into(),
        github_repo: "acme/docs".to_owned(),
        sidebar_categories: current_sidebar(),
    }
}

#[test]
fn test_two_major_versions_end_to_end() {
    let vcs = fixture();
    let mut sink = RecordingSink::default();

    let summary = generate(&vcs, &options(), &mut sink).unwrap();

    // One version per major; v1.0.0 shadowed by v1.5.0.
    assert!(summary.version_failures.is_empty());
    let ids: Vec<&str> = summary.versions.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert_eq!(summary.versions[0].base_path, "/");
    assert_eq!(summary.versions[0].major_minor, "2.0");
    assert_eq!(summary.versions[1].base_path, "/v1/");
    assert_eq!(summary.versions[1].major_minor, "1.5");
    assert_eq!(summary.versions[1].tag, "v1.5.0");

    // Anchors never reach the sink; the symlinked doc resolves through
    // its target but keeps its own route.
    assert_eq!(summary.pages_created, 4);
    let routes: Vec<(&str, &str)> = sink
        .pages
        .iter()
        .map(|(path, _, tag)| (path.as_str(), tag.as_str()))
        .collect();
    assert_eq!(
        routes,
        vec![
            ("/", "v2.0.0"),
            ("/features/caching", "v2.0.0"),
            ("/v1/", "v1.5.0"),
            ("/v1/intro", "v1.5.0"),
        ]
    );
    let intro = &sink.pages[3];
    assert_eq!(intro.1, Some("Intro".to_owned()));
}

#[test]
fn test_anchor_appears_in_contents_but_not_as_route() {
    let vcs = fixture();
    let mut sink = RecordingSink::default();

    let summary = generate(&vcs, &options(), &mut sink).unwrap();

    let features = &summary.versions[0].contents[1];
    assert_eq!(features.title, Some("Features".to_owned()));
    assert_eq!(features.pages.len(), 2);
    assert!(features.pages[1].anchor);
    assert!(sink.pages.iter().all(|(path, _, _)| !path.starts_with("https://")));
}

#[test]
fn test_broken_version_is_isolated() {
    // v1.5.0's sidebar references a doc that does not exist in its
    // tree; the version is dropped, v2 still emits.
    let vcs = MockVcs::new()
        .with_remote("origin", "git@github.com:acme/docs.git")
        .with_tag("v2.0.0")
        .with_tag("v1.5.0")
        .with_file("v2.0.0", "source/index.md", "v2")
        .with_file(
            "v1.5.0",
            "_config.yml",
            "sidebar_categories:\n  null:\n    - missing\n",
        )
        .with_file("v1.5.0", "source/index.md", "v1");

    let mut options = options();
    options.sidebar_categories = vec![SidebarCategory {
        title: None,
        items: vec![SidebarItem::Doc("index".to_owned())],
    }];
    let mut sink = RecordingSink::default();

    let summary = generate(&vcs, &options, &mut sink).unwrap();

    assert_eq!(summary.versions.len(), 1);
    assert_eq!(summary.versions[0].id, "2");
    assert_eq!(summary.version_failures.len(), 1);
    assert_eq!(summary.version_failures[0].tag, "v1.5.0");
    assert!(summary.version_failures[0].reason.contains("source/missing.md"));
    assert_eq!(sink.pages.len(), 1);
}
