//! Markdown image embed extraction

use regex::Regex;
use std::sync::LazyLock;

// Alt text is limited to lowercase alphanumerics and `_-.`; embeds with other
// alt text are not picked up.
static IMAGE_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[a-z0-9_\-.]*\]\(https://[^)\s]*\)").expect("valid image embed pattern")
});

static EMBED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((https://[^)\s]*)\)").expect("valid embed url pattern"));

/// Iterate over the `![alt](https://...)` embeds of a body, left to right
pub fn extract_image_embeds(body: &str) -> impl Iterator<Item = &str> + '_ {
    IMAGE_EMBED.find_iter(body).map(|m| m.as_str())
}

/// The URL inside an embed's parentheses, if any
pub fn extract_asset_url(embed: &str) -> Option<&str> {
    EMBED_URL
        .captures(embed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|url| !url.is_empty())
}

/// All asset URLs referenced by image embeds in `body`
pub fn extract_asset_urls(body: &str) -> Vec<&str> {
    extract_image_embeds(body)
        .filter_map(extract_asset_url)
        .collect()
}
