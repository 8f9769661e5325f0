//! Classification and local placement of asset URLs
//!
//! GitHub changed how attachments are authorized
//! (<https://github.blog/changelog/2023-05-09-more-secure-private-attachments/>).
//! Images on the older `user-images` host are fetched anonymously and reject
//! requests carrying an `Authorization` header; everything else needs the
//! bearer token.

use std::path::PathBuf;

use url::Url;

use crate::error::{ArchiveError, Result};
use crate::models::RepoName;

/// Host serving attachments that must be fetched without credentials
pub const ANONYMOUS_ASSET_HOST: &str = "user-images.githubusercontent.com";

/// Directory, relative to the output root, holding downloaded assets
pub const ASSETS_DIR: &str = "assets";

/// Prefix that rewritten asset links point at
pub const LOCAL_ASSET_PREFIX: &str = "./assets/";

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| ArchiveError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Whether fetching `url` needs the bearer token
pub fn requires_auth(url: &str) -> Result<bool> {
    let parsed = parse(url)?;
    Ok(parsed.host_str() != Some(ANONYMOUS_ASSET_HOST))
}

/// The decoded path component of `url`
pub fn derive_path(url: &str) -> Result<String> {
    let parsed = parse(url)?;
    let path = urlencoding::decode(parsed.path()).map_err(|_| unsafe_path(url))?;
    Ok(path.into_owned())
}

fn unsafe_path(url: &str) -> ArchiveError {
    ArchiveError::UnsafePath {
        url: url.to_string(),
    }
}

/// Where an asset lives relative to the output root
///
/// Path segments are percent-decoded, the `/<owner>/<repo>` prefix is
/// stripped, and the result is placed under `assets/` unless one of its
/// directories is already named `assets`. Dot segments are resolved by URL
/// parsing; a decoded segment that still carries a separator, or a path with
/// no file name, is rejected.
pub fn local_asset_path(url: &str, repo: &RepoName) -> Result<PathBuf> {
    let parsed = parse(url)?;
    let raw: Vec<&str> = parsed.path_segments().map(|s| s.collect()).unwrap_or_default();
    if raw.last().is_none_or(|s| s.is_empty()) {
        return Err(unsafe_path(url));
    }

    let mut segments = Vec::with_capacity(raw.len());
    for segment in raw.into_iter().filter(|s| !s.is_empty()) {
        let decoded = urlencoding::decode(segment).map_err(|_| unsafe_path(url))?;
        if decoded.contains(['/', '\\', '\0']) {
            return Err(unsafe_path(url));
        }
        segments.push(decoded);
    }

    let trimmed = match segments.as_slice() {
        [owner, name, rest @ ..] if !rest.is_empty() && *owner == repo.owner && *name == repo.name => rest,
        all => all,
    };
    let Some((basename, dirs)) = trimmed.split_last() else {
        return Err(unsafe_path(url));
    };

    let mut local = PathBuf::new();
    if !dirs.iter().any(|d| d == ASSETS_DIR) {
        local.push(ASSETS_DIR);
    }
    for dir in dirs {
        local.push(&**dir);
    }
    local.push(&**basename);
    Ok(local)
}

/// URL prefixes that [`LOCAL_ASSET_PREFIX`] replaces in rendered output
pub fn remote_asset_prefixes(repo: &RepoName) -> Vec<String> {
    vec![
        format!("https://{}/", ANONYMOUS_ASSET_HOST),
        format!("https://github.com/{}/{}/assets/", repo.owner, repo.name),
    ]
}
