//! Correlating issues with their comments

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::models::{Comment, Issue};

/// Attach comments to their parent issues
///
/// Issues come back in input order, each with its comments sorted ascending
/// by creation time. The sort is stable, so comments sharing a timestamp keep
/// their input order. Comments whose parent is not among `issues` are dropped
/// with a warning, and a comment id seen twice is kept once. If two issues
/// share a key only the first one is kept.
pub fn aggregate(issues: Vec<Issue>, comments: Vec<Comment>) -> Vec<Issue> {
    let mut threads: Vec<Issue> = Vec::with_capacity(issues.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(issues.len());

    for issue in issues {
        if index.contains_key(&issue.key) {
            warn!(key = %issue.key, number = issue.number, "duplicate issue, keeping the first");
            continue;
        }
        index.insert(issue.key.clone(), threads.len());
        threads.push(issue);
    }

    let mut seen: HashSet<u64> = threads
        .iter()
        .flat_map(|t| t.comments.iter().map(|c| c.id))
        .collect();
    let mut orphans = 0usize;

    for comment in comments {
        let Some(&slot) = index.get(&comment.issue_key) else {
            warn!(issue = %comment.issue_key, comment = comment.id, "skipping comment for unknown issue");
            orphans += 1;
            continue;
        };
        if !seen.insert(comment.id) {
            debug!(comment = comment.id, "skipping duplicate comment");
            continue;
        }
        threads[slot].comments.push(comment);
    }

    for thread in &mut threads {
        thread.comments.sort_by_key(|c| c.created_at);
    }

    debug!(issues = threads.len(), orphans, "aggregated comment threads");
    threads
}
