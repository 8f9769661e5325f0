//! The end-to-end archive run: collect, fetch assets, render

use std::path::Path;

use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::asset_url::{remote_asset_prefixes, LOCAL_ASSET_PREFIX};
use crate::error::Result;
use crate::fetch::{create_dir_all, AssetFetcher, FailurePolicy};
use crate::models::{Comment, Issue, RepoName, Thread};
use crate::pagination::{fetch_all_pages, MAX_PER_PAGE};
use crate::render::{write_thread, RenderOptions};
use crate::rewrite::UrlRewriter;
use crate::traits::{AssetTransport, IssueSource};

/// How comments are listed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentScope {
    /// One listing per issue
    #[default]
    PerIssue,
    /// One repository-wide listing, matched to issues afterwards
    Global,
}

#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub comment_scope: CommentScope,
    pub per_page: usize,
    pub include_pull_requests: bool,
    pub render: RenderOptions,
    pub on_error: FailurePolicy,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            comment_scope: CommentScope::default(),
            per_page: MAX_PER_PAGE,
            include_pull_requests: false,
            render: RenderOptions::default(),
            on_error: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub issues: usize,
    pub issues_skipped: usize,
    pub assets_written: usize,
    pub assets_skipped: usize,
}

/// Collect every issue with its full comment thread, sorted by issue number
pub fn collect_threads(source: &dyn IssueSource, options: &ArchiveOptions) -> Result<Vec<Thread>> {
    let per_page = options.per_page;

    let mut issues = fetch_all_pages(|page, n| source.list_issues(page, n), per_page)?;
    if !options.include_pull_requests {
        issues.retain(|i| !i.is_pull_request);
    }
    info!(count = issues.len(), "listed issues");

    let comments: Vec<Comment> = match options.comment_scope {
        CommentScope::PerIssue => {
            let mut all = Vec::new();
            for issue in &issues {
                let comments =
                    fetch_all_pages(|page, n| source.list_issue_comments(issue, page, n), per_page)
                        .map_err(|e| e.for_issue(issue.number))?;
                all.extend(comments);
            }
            all
        }
        CommentScope::Global => fetch_all_pages(|page, n| source.list_repo_comments(page, n), per_page)?,
    };
    info!(count = comments.len(), "listed comments");

    let mut threads = aggregate(issues, comments);
    threads.sort_by_key(|t: &Issue| t.number);
    Ok(threads)
}

/// Archive a repository's issues into `out_dir`
///
/// Assets land under `out_dir/assets`, documents next to them as
/// `issue_<number>.{md,html,txt}`.
pub fn run_archive(
    source: &dyn IssueSource,
    transport: &dyn AssetTransport,
    token: &str,
    repo: &RepoName,
    out_dir: &Path,
    options: &ArchiveOptions,
) -> Result<ArchiveSummary> {
    let threads = collect_threads(source, options)?;

    let fetched = AssetFetcher::new(transport, token, repo.clone())
        .with_policy(options.on_error)
        .fetch_all(&threads, out_dir)?;
    info!(written = fetched.written, skipped = fetched.skipped, "fetched assets");

    create_dir_all(out_dir)?;

    let rewriter = UrlRewriter::new(&remote_asset_prefixes(repo), LOCAL_ASSET_PREFIX)?;
    let mut summary = ArchiveSummary {
        assets_written: fetched.written,
        assets_skipped: fetched.skipped,
        ..ArchiveSummary::default()
    };

    for thread in &threads {
        match write_thread(thread, out_dir, options.render, &rewriter) {
            Ok(()) => summary.issues += 1,
            Err(e) => match options.on_error {
                FailurePolicy::Abort => return Err(e.for_issue(thread.number)),
                FailurePolicy::Skip => {
                    warn!(issue = thread.number, error = %e, "skipping issue");
                    summary.issues_skipped += 1;
                }
            },
        }
    }

    info!(issues = summary.issues, "wrote documents");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;
    use crate::fetch::tests::FakeTransport;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_690_000_000 + secs, 0).unwrap()
    }

    fn issue(number: u64, title: &str, body: &str) -> Issue {
        Issue {
            key: format!("https://api.github.com/repos/acme/widgets/issues/{}", number),
            number,
            title: title.to_string(),
            body: body.to_string(),
            author: "alice".to_string(),
            created_at: at(0),
            is_pull_request: false,
            comments: Vec::new(),
        }
    }

    fn comment(id: u64, number: u64, secs: i64, body: &str) -> Comment {
        Comment {
            id,
            issue_key: format!("https://api.github.com/repos/acme/widgets/issues/{}", number),
            body: body.to_string(),
            author: "bob".to_string(),
            created_at: at(secs),
        }
    }

    /// In-memory source serving fixed issues and comments, paged like the API
    struct FakeSource {
        issues: Vec<Issue>,
        comments: Vec<Comment>,
    }

    impl FakeSource {
        fn new(issues: Vec<Issue>, comments: Vec<Comment>) -> Self {
            Self { issues, comments }
        }
    }

    fn page<T: Clone>(items: &[T], page: usize, per_page: usize) -> Vec<T> {
        items
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect()
    }

    impl IssueSource for FakeSource {
        fn list_issues(&self, p: usize, per_page: usize) -> Result<Vec<Issue>> {
            Ok(page(&self.issues, p, per_page))
        }

        fn list_issue_comments(&self, issue: &Issue, p: usize, per_page: usize) -> Result<Vec<Comment>> {
            let scoped: Vec<Comment> = self
                .comments
                .iter()
                .filter(|c| c.issue_key == issue.key)
                .cloned()
                .collect();
            Ok(page(&scoped, p, per_page))
        }

        fn list_repo_comments(&self, p: usize, per_page: usize) -> Result<Vec<Comment>> {
            Ok(page(&self.comments, p, per_page))
        }
    }

    const IMAGE: &str = "https://user-images.githubusercontent.com/501/crash.png";

    fn crash_source() -> FakeSource {
        FakeSource::new(
            vec![issue(7, "Crash on load", &format!("Boom\n\n![screenshot]({})", IMAGE))],
            vec![
                comment(2, 7, 200, "second reply"),
                comment(1, 7, 100, "first reply"),
            ],
        )
    }

    #[test]
    fn archives_issue_with_comments_assets_and_html() {
        let dir = tempfile::tempdir().unwrap();
        let source = crash_source();
        let transport = FakeTransport::default().serve(IMAGE, "image/png", b"\x89PNG");
        let repo = RepoName::new("acme", "widgets");

        let summary = run_archive(&source, &transport, "tok", &repo, dir.path(), &ArchiveOptions::default()).unwrap();

        assert_eq!(
            summary,
            ArchiveSummary {
                issues: 1,
                issues_skipped: 0,
                assets_written: 1,
                assets_skipped: 0,
            }
        );

        let md = std::fs::read_to_string(dir.path().join("issue_7.md")).unwrap();
        let first = md.find("first reply").unwrap();
        let second = md.find("second reply").unwrap();
        assert!(first < second);
        assert!(md.contains("Crash on load"));

        assert_eq!(std::fs::read(dir.path().join("assets/501/crash.png")).unwrap(), b"\x89PNG");

        let html = std::fs::read_to_string(dir.path().join("issue_7.html")).unwrap();
        assert!(html.contains("src=\"./assets/501/crash.png\""));
        assert!(!html.contains(IMAGE));

        assert_eq!(transport.requests.borrow()[0].1, None);
    }

    #[cfg(unix)]
    #[test]
    fn output_root_is_private_without_assets() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("acme").join("widgets");
        let source = FakeSource::new(vec![issue(1, "No images", "plain text")], vec![]);
        let transport = FakeTransport::default();
        let repo = RepoName::new("acme", "widgets");

        run_archive(&source, &transport, "tok", &repo, &out, &ArchiveOptions::default()).unwrap();

        assert!(out.join("issue_1.md").exists());
        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn per_issue_and_global_scopes_agree() {
        let comments: Vec<Comment> = (0..250).map(|i| comment(i, i % 3 + 1, (i % 17) as i64, "c")).collect();
        let issues = vec![issue(3, "c", ""), issue(1, "a", ""), issue(2, "b", "")];
        let source = FakeSource::new(issues, comments);

        let per_issue = collect_threads(&source, &ArchiveOptions::default()).unwrap();
        let global = collect_threads(
            &source,
            &ArchiveOptions {
                comment_scope: CommentScope::Global,
                ..ArchiveOptions::default()
            },
        )
        .unwrap();

        let numbers: Vec<u64> = per_issue.iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        for (a, b) in per_issue.iter().zip(&global) {
            assert_eq!(a.comments, b.comments);
        }
        let total: usize = per_issue.iter().map(|t| t.comments.len()).sum();
        assert_eq!(total, 250);
    }

    #[test]
    fn pull_requests_are_dropped_unless_requested() {
        let mut pr = issue(2, "PR", "");
        pr.is_pull_request = true;
        let source = FakeSource::new(vec![issue(1, "a", ""), pr], vec![comment(1, 2, 0, "on pr")]);

        let threads = collect_threads(
            &source,
            &ArchiveOptions {
                comment_scope: CommentScope::Global,
                ..ArchiveOptions::default()
            },
        )
        .unwrap();
        assert_eq!(threads.len(), 1);
        assert!(threads[0].comments.is_empty());

        let threads = collect_threads(
            &source,
            &ArchiveOptions {
                include_pull_requests: true,
                ..ArchiveOptions::default()
            },
        )
        .unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[1].comments.len(), 1);
    }

    #[test]
    fn asset_failure_aborts_before_documents() {
        let dir = tempfile::tempdir().unwrap();
        let source = crash_source();
        let transport = FakeTransport::default().fail(IMAGE, 404, "text/html", "<html/>");
        let repo = RepoName::new("acme", "widgets");

        let err = run_archive(&source, &transport, "tok", &repo, dir.path(), &ArchiveOptions::default()).unwrap_err();

        assert!(err.to_string().contains("issue 7"));
        assert!(!dir.path().join("issue_7.md").exists());
    }

    #[test]
    fn skip_policy_still_writes_documents() {
        let dir = tempfile::tempdir().unwrap();
        let source = crash_source();
        let transport = FakeTransport::default();
        let repo = RepoName::new("acme", "widgets");
        let options = ArchiveOptions {
            on_error: FailurePolicy::Skip,
            ..ArchiveOptions::default()
        };

        let summary = run_archive(&source, &transport, "tok", &repo, dir.path(), &options).unwrap();

        assert_eq!(summary.assets_skipped, 1);
        assert_eq!(summary.issues, 1);
        assert!(dir.path().join("issue_7.md").exists());
    }

    #[test]
    fn source_errors_carry_issue_context() {
        struct Failing;
        impl IssueSource for Failing {
            fn list_issues(&self, _: usize, _: usize) -> Result<Vec<Issue>> {
                Ok(vec![issue(4, "x", "")])
            }
            fn list_issue_comments(&self, _: &Issue, _: usize, _: usize) -> Result<Vec<Comment>> {
                Err(ArchiveError::Source("HTTP 502".to_string()))
            }
            fn list_repo_comments(&self, _: usize, _: usize) -> Result<Vec<Comment>> {
                Ok(vec![])
            }
        }

        let err = collect_threads(&Failing, &ArchiveOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "issue 4: source API error: HTTP 502");
    }
}
