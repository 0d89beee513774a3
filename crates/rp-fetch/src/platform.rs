//! Source-platform classification.
//!
//! Twitter/X is the one platform whose extractor needs API-strategy
//! fallback; every other host gets a single extraction attempt.

use url::Url;

/// Host aliases for Twitter/X, matched after stripping a leading `www.`.
const TWITTER_HOSTS: &[&str] = &["twitter.com", "x.com", "mobile.twitter.com", "mobile.x.com"];

/// True when `url` points at Twitter/X.
pub fn is_twitter_url(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    TWITTER_HOSTS.contains(&host)
}
