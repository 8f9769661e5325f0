//! Rewriting remote asset URLs to their local copies

use aho_corasick::{AhoCorasick, MatchKind};

use crate::error::{ArchiveError, Result};

/// Literal prefix replacement over rendered text
///
/// Every occurrence of any remote prefix is replaced by the local prefix in a
/// single left-to-right pass, so text produced by one replacement is never
/// rescanned.
pub struct UrlRewriter {
    matcher: Option<AhoCorasick>,
    local_prefix: String,
}

impl UrlRewriter {
    /// Build a rewriter
    ///
    /// Fails if the local prefix itself contains a remote prefix, since the
    /// rewrite would then not be idempotent.
    pub fn new<S: AsRef<str>>(remote_prefixes: &[S], local_prefix: &str) -> Result<Self> {
        if let Some(p) = non_empty(remote_prefixes).find(|p| local_prefix.contains(*p)) {
            return Err(ArchiveError::Config(format!(
                "local asset prefix '{}' contains remote prefix '{}'",
                local_prefix, p
            )));
        }
        Self::single_pass(remote_prefixes, local_prefix)
    }

    /// Build a rewriter without checking the local prefix against the remote ones
    fn single_pass<S: AsRef<str>>(remote_prefixes: &[S], local_prefix: &str) -> Result<Self> {
        let prefixes: Vec<&str> = non_empty(remote_prefixes).collect();

        let matcher = if prefixes.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::LeftmostLongest)
                    .build(&prefixes)
                    .map_err(|e| ArchiveError::Config(format!("building URL matcher: {}", e)))?,
            )
        };

        Ok(Self {
            matcher,
            local_prefix: local_prefix.to_string(),
        })
    }

    pub fn rewrite(&self, text: &str) -> String {
        match &self.matcher {
            Some(matcher) => {
                let mut out = String::with_capacity(text.len());
                matcher.replace_all_with(text, &mut out, |_, _, dst| {
                    dst.push_str(&self.local_prefix);
                    true
                });
                out
            }
            None => text.to_string(),
        }
    }

    /// Same as [`UrlRewriter::rewrite`] over raw bytes, e.g. a file read back from disk
    pub fn rewrite_bytes(&self, bytes: &[u8]) -> Vec<u8> {
        match &self.matcher {
            Some(matcher) => {
                let mut out = Vec::with_capacity(bytes.len());
                matcher.replace_all_with_bytes(bytes, &mut out, |_, _, dst| {
                    dst.extend_from_slice(self.local_prefix.as_bytes());
                    true
                });
                out
            }
            None => bytes.to_vec(),
        }
    }
}

fn non_empty<S: AsRef<str>>(prefixes: &[S]) -> impl Iterator<Item = &str> {
    prefixes.iter().map(|p| p.as_ref()).filter(|p| !p.is_empty())
}

/// Replace every occurrence of each remote prefix in `text` with `local_prefix`
///
/// Same single pass as [`UrlRewriter`]: the earliest, then longest, prefix
/// wins at each position and replaced text is not matched again.
pub fn rewrite<S: AsRef<str>>(text: &str, remote_prefixes: &[S], local_prefix: &str) -> Result<String> {
    Ok(UrlRewriter::single_pass(remote_prefixes, local_prefix)?.rewrite(text))
}
