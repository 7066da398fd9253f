//! Base URL validation and endpoint path joining shared by the domain clients.

use url::Url;

use crate::error::RestError;

/// Validate a service base URL and strip any trailing `/`.
pub fn base_url(raw: &str) -> Result<String, RestError> {
    if raw.is_empty() {
        return Err(RestError::Configuration(
            "api client requires a base url".to_string(),
        ));
    }
    let parsed = Url::parse(raw)
        .map_err(|e| RestError::Configuration(format!("invalid base URL [{raw}]: {e}")))?;
    if !parsed.has_host() {
        return Err(RestError::Configuration(format!(
            "invalid base URL [{raw}]: missing host"
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// `{base}/{path}`, or `{base}/{path}/{id}` when an id is given.
///
/// The id is percent-encoded as a single path segment, so `/`, `?` and `#`
/// inside it cannot change the target resource.
pub fn join(base: &str, path: &str, id: Option<&str>) -> String {
    let collection = format!("{base}/{path}");
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        return collection;
    };
    let Ok(mut url) = Url::parse(&collection) else {
        return format!("{collection}/{id}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id);
    }
    url.into()
}
