//! Maps a document URL to a filesystem-safe filename.
//!
//! The name is built from host, path and query so that the same URL always
//! lands on the same file, which is what makes the "already downloaded" check
//! work across runs.

use url::Url;

/// Characters that never survive into a filename
const INVALID_CHARS: [char; 10] = ['"', '\\', '/', ':', '*', '?', '<', '>', '|', '-'];

/// Derive a sanitized, lower-cased filename ending in `.{extension}`.
///
/// Returns `None` when `raw_url` does not parse or has no host.
pub fn url_to_filename(raw_url: &str, extension: &str) -> Option<String> {
    let parsed = Url::parse(raw_url).ok()?;
    let host = parsed.host_str()?;

    let mut filename = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let path = parsed.path();
    if !path.is_empty() {
        filename.push('_');
        filename.push_str(&path.replace('/', "_"));
    }
    if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
        filename.push('_');
        filename.push_str(&query.replace('&', "_"));
    }

    let mut filename = filename.replace(INVALID_CHARS, "_").to_lowercase();

    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
    if !filename.ends_with(&suffix) {
        filename.push_str(&suffix);
    }

    Some(filename)
}
