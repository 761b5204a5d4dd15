//! Filename derivation and conflict resolution for fetched images.
//!
//! Names come from the URL's last path segment when it looks like a file,
//! otherwise from the content digest plus an extension inferred from the
//! Content-Type. Collisions get a numeric suffix before the extension.

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use url::Url;

use super::hash::ContentDigest;
use super::validation::essence;

/// Extension used when the content type gives no usable hint.
const GENERIC_IMAGE_EXTENSION: &str = ".jpg";

/// Number of digest hex characters used in synthesized names.
const DIGEST_PREFIX_LEN: usize = 8;

const MAX_EXTENSION_LEN: usize = 10;

/// Longest stem kept from a URL, in bytes. Leaves room for a `_<n>` suffix
/// and the extension under the usual 255-byte name limit.
const MAX_STEM_BYTES: usize = 200;

/// Picks the name a new file should be saved under, before conflict resolution.
#[must_use]
pub fn derive_filename(url: &Url, content_type: Option<&str>, digest: &ContentDigest) -> String {
    if let Some(name) = filename_from_url(url) {
        return name;
    }
    let extension = extension_from_content_type(content_type);
    let name = format!("image_{}{extension}", digest.hex_prefix(DIGEST_PREFIX_LEN));
    debug!(filename = %name, "no usable filename in URL, synthesized from digest");
    name
}

/// Last URL path segment, percent-decoded and sanitized, if it has a plausible extension.
pub(crate) fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last).map_or_else(
        |e| {
            debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
            last.to_string()
        },
        std::borrow::Cow::into_owned,
    );
    let name = sanitize_filename(&decoded);
    has_plausible_extension(&name).then(|| truncate_stem(&name))
}

/// Shortens the part before the last dot to [`MAX_STEM_BYTES`], on a char boundary.
fn truncate_stem(name: &str) -> String {
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));
    if stem.len() <= MAX_STEM_BYTES {
        return name.to_string();
    }
    let mut end = MAX_STEM_BYTES;
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    debug!(original_len = name.len(), "URL filename too long, stem truncated");
    format!("{}.{ext}", &stem[..end])
}

fn has_plausible_extension(name: &str) -> bool {
    let Some(dot) = name.rfind('.') else {
        return false;
    };
    let (stem, ext) = (&name[..dot], &name[dot + 1..]);
    !stem.trim_matches('_').is_empty()
        && (1..=MAX_EXTENSION_LEN).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Guess an image file extension from a Content-Type header.
pub(crate) fn extension_from_content_type(content_type: Option<&str>) -> String {
    let Some(mime) = content_type.map(essence) else {
        return GENERIC_IMAGE_EXTENSION.to_string();
    };

    let known = match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/svg+xml" => Some(".svg"),
        "image/bmp" | "image/x-ms-bmp" => Some(".bmp"),
        "image/tiff" => Some(".tiff"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some(".ico"),
        "image/avif" => Some(".avif"),
        "image/heic" => Some(".heic"),
        _ => None,
    };
    if let Some(ext) = known {
        return ext.to_string();
    }

    match mime.strip_prefix("image/") {
        Some(subtype)
            if (1..=MAX_EXTENSION_LEN).contains(&subtype.len())
                && subtype.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{subtype}")
        }
        _ => GENERIC_IMAGE_EXTENSION.to_string(),
    }
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Resolves a path in `dir` that no entry occupies yet.
///
/// `cat.jpg` becomes `cat_1.jpg`, then `cat_2.jpg`, and so on. Symlinks count
/// as taken even when their target is missing.
#[must_use]
pub fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = sanitize_filename(filename);
    let base_path = dir.join(&filename);
    if !is_taken(&base_path) {
        return base_path;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename.as_str(), ""),
    };

    let mut counter: u64 = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{ext}"));
        if !is_taken(&candidate) {
            debug!(original = %filename, resolved = %candidate.display(), "filename taken, suffixed");
            return candidate;
        }
        counter += 1;
    }
}

fn is_taken(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}
