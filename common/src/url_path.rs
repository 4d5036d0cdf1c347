//! Origin and full-path resolution.
//!
//! Relative urls are resolved against an optional base, the way an anchor
//! element resolves its `href` against the owning document.

use crate::{ErrorLocation, UrlError};

use std::panic::Location;

use url::Url;

#[track_caller]
fn resolve(url: &str, base: Option<&str>) -> Result<Url, UrlError> {
    let base = match base {
        Some(raw) if !raw.is_empty() => Some(Url::parse(raw).map_err(|e| UrlError::Parse {
            message: format!("Invalid base url \"{raw}\": {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?),
        _ => None,
    };

    Url::options()
        .base_url(base.as_ref())
        .parse(url)
        .map_err(|e| UrlError::Parse {
            message: format!("Invalid url \"{url}\": {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Scheme, host and port of `url` (default ports omitted), e.g. `http://localhost:81`.
///
/// Returns an empty string for an empty `url`. Urls without a tuple origin
/// (`about:blank`, `data:`) serialize as `"null"`.
#[track_caller]
pub fn origin_of(url: &str, base: Option<&str>) -> Result<String, UrlError> {
    if url.is_empty() {
        return Ok(String::new());
    }

    Ok(resolve(url, base)?.origin().ascii_serialization())
}

/// Origin followed by the path of `url`, without query or fragment.
///
/// Case is preserved; callers that compare paths lower-case both sides.
#[track_caller]
pub fn full_path_of(url: &str, base: Option<&str>) -> Result<String, UrlError> {
    if url.is_empty() {
        return Ok(String::new());
    }

    let resolved = resolve(url, base)?;
    Ok(format!(
        "{}{}",
        resolved.origin().ascii_serialization(),
        resolved.path()
    ))
}
