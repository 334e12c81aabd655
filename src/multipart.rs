//! Hand-rolled `multipart/form-data` decoding.
//!
//! The bridge decodes the body itself so the raw bytes can be size-routed
//! before anything upstream sees them. The decoder is a pure function over
//! `(bytes, boundary)` and is unit-tested offline.

use crate::error::BridgeError;

/// The multipart field the capture must arrive under.
pub const FILE_FIELD: &str = "file";

#[derive(Debug)]
pub struct FilePart {
    pub field_name: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct ParsedForm {
    /// Non-file fields in the order they appeared.
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

/// Pulls the `boundary` parameter out of a `multipart/form-data` content
/// type. Returns `None` when the type is not multipart or no boundary is
/// declared.
pub fn boundary_from_content_type(value: &str) -> Option<String> {
    let mut parts = value.split(';');
    let mime = parts.next()?.trim();
    if !mime.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    for param in parts {
        if let Some((key, val)) = param.trim().split_once('=') {
            if key.trim().eq_ignore_ascii_case("boundary") {
                let val = val.trim().trim_matches('"');
                if !val.is_empty() {
                    return Some(val.to_string());
                }
            }
        }
    }
    None
}

/// Splits `body` on `--boundary` delimiters and decodes each part. Text
/// fields are collected in order; the first part carrying a `filename`
/// becomes the file part and must be named [`FILE_FIELD`].
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<ParsedForm, BridgeError> {
    let delimiter = format!("--{}", boundary);
    let sections = split_on(body, delimiter.as_bytes());
    if sections.len() < 2 {
        return Err(BridgeError::BadRequest("malformed multipart body".into()));
    }

    let mut fields: Vec<(String, String)> = Vec::new();
    let mut file: Option<FilePart> = None;

    // sections[0] is the preamble before the first delimiter.
    for section in sections[1..].iter().copied() {
        if section.starts_with(b"--") {
            break; // closing delimiter
        }
        let section = section.strip_prefix(b"\r\n").unwrap_or(section);
        let section = section.strip_suffix(b"\r\n").unwrap_or(section);

        let header_end = find(section, b"\r\n\r\n")
            .ok_or_else(|| BridgeError::BadRequest("malformed multipart part".into()))?;
        let headers = String::from_utf8_lossy(&section[..header_end]);
        let content = &section[header_end + 4..];

        let mut name: Option<String> = None;
        let mut filename: Option<String> = None;
        let mut content_type: Option<String> = None;

        for line in headers.split("\r\n") {
            let Some((header, value)) = line.split_once(':') else {
                continue;
            };
            if header.trim().eq_ignore_ascii_case("content-disposition") {
                for param in value.split(';') {
                    if let Some((key, val)) = param.trim().split_once('=') {
                        let val = val.trim().trim_matches('"').to_string();
                        match key.trim() {
                            "name" => name = Some(val),
                            "filename" => filename = Some(val),
                            _ => {}
                        }
                    }
                }
            } else if header.trim().eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_string());
            }
        }

        match (name, filename) {
            (Some(name), Some(filename)) => {
                if file.is_none() {
                    file = Some(FilePart {
                        field_name: name,
                        filename,
                        content_type,
                        bytes: content.to_vec(),
                    });
                }
            }
            (Some(name), None) => {
                fields.push((name, String::from_utf8_lossy(content).into_owned()));
            }
            // A part without a field name carries nothing we can route.
            (None, _) => {}
        }
    }

    let file = file.ok_or_else(|| BridgeError::BadRequest("Missing file field".into()))?;
    if file.field_name != FILE_FIELD {
        return Err(BridgeError::BadRequest(format!(
            "file part must be named {:?}, got {:?}",
            FILE_FIELD, file.field_name
        )));
    }

    Ok(ParsedForm { fields, file })
}

/// Basename only, unsafe characters collapsed to `_`, guaranteed to carry an
/// HTML-family extension. Empty input becomes `archive.html`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let mut cleaned = String::with_capacity(base.len());
    let mut in_run = false;
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            cleaned.push(c);
            in_run = false;
        } else if !in_run {
            cleaned.push('_');
            in_run = true;
        }
    }

    let mut cleaned = cleaned
        .trim_matches(|c| c == '.' || c == '_')
        .to_string();
    if cleaned.is_empty() {
        cleaned = "archive".to_string();
    }

    let lowered = cleaned.to_ascii_lowercase();
    let has_html_ext = [".html", ".htm", ".xhtml"]
        .iter()
        .any(|ext| lowered.ends_with(ext));
    if !has_html_ext {
        cleaned.push_str(".html");
    }
    cleaned
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut out = Vec::new();
    let mut start = 0;
    while let Some(pos) = find(&haystack[start..], needle) {
        out.push(&haystack[start..start + pos]);
        start += pos + needle.len();
    }
    out.push(&haystack[start..]);
    out
}
