//! Local filenames for fetched artifacts.

use url::Url;

/// Sanitizes a candidate filename for safe use on Linux.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes (Linux NAME_MAX)
pub fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let bad = c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace();
        if bad || c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

/// `filename="x"` or `filename=x` from a Content-Disposition value.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .filter_map(|param| param.trim().split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("filename"))
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// Last path segment, only when it looks like a file (has an extension).
/// `/descargas/{id}/pdf` style links therefore yield None.
fn filename_from_link(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(segment.to_string())
}

/// Content-Disposition first, then the link's last segment, then `<stem>.<ext>`.
pub fn choose_filename(url: &Url, disposition: Option<&str>, stem: &str, ext: &str) -> String {
    disposition
        .and_then(filename_from_disposition)
        .or_else(|| filename_from_link(url))
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            let stem = sanitize_filename(stem);
            let stem = if stem.is_empty() { "descarga".to_string() } else { stem };
            format!("{}.{}", stem, ext)
        })
}
