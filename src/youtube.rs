use std::borrow::Cow;

use crate::error::{BookmarkError, Result};

use url::{Url, form_urlencoded};

const WATCH_SCHEME: &str = "https";
const WATCH_HOST: &str = "www.youtube.com";
const WATCH_PATH: &str = "/watch";

/// Extracts the video ID from a `https://www.youtube.com/watch?v=ID` link.
///
/// Scheme, host and path must match literally; `Url` alone would accept
/// `HTTPS://WWW.YouTube.com:443/watch` because it normalizes all three.
/// The ID is the first non-blank `v` value of the query, decoded but
/// otherwise taken as-is.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();
    let invalid = || BookmarkError::InvalidUrl {
        url: input.to_string(),
    };

    let parsed = Url::parse(input).map_err(|_| invalid())?;

    let (scheme, rest) = input.split_once("://").ok_or_else(invalid)?;
    if scheme != WATCH_SCHEME || parsed.scheme() != WATCH_SCHEME {
        return Err(invalid());
    }

    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (host, rest) = rest.split_at(host_end);
    if host != WATCH_HOST || parsed.host_str() != Some(WATCH_HOST) {
        return Err(invalid());
    }

    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    if &rest[..path_end] != WATCH_PATH || parsed.path() != WATCH_PATH {
        return Err(invalid());
    }

    // A trailing `?` leaves an empty query, which is rejected here rather
    // than by the strict parser.
    let query = parsed.query().unwrap_or_default();
    if query.is_empty() {
        return Err(invalid());
    }

    let params = parse_query_strict(query).ok_or_else(invalid)?;

    params
        .into_iter()
        .find(|(name, value)| name == "v" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .ok_or_else(invalid)
}

/// Parses `a=1&b=2` requiring every `&`-separated field to be `name=value`.
/// Returns `None` for empty or `=`-less fields.
fn parse_query_strict(query: &str) -> Option<Vec<(Cow<'_, str>, Cow<'_, str>)>> {
    query
        .split('&')
        .map(|field| {
            if !field.contains('=') {
                return None;
            }
            form_urlencoded::parse(field.as_bytes()).next()
        })
        .collect()
}
