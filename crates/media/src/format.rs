//! Format resolution: derive a registry tag from a hint or a file name.

use crate::decoder::ImageDecoder;
use crate::registry::Registry;
use std::path::Path;

/// Text after the last `.` of `filename`.
///
/// Returns `None` when there is no `.` or nothing follows it. Directory
/// separators are not treated specially, so `archive.d/readme` yields
/// `d/readme`; pass a file name, or use [`path_extension`].
pub fn file_extension(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Extension of the final component of `path`.
pub fn path_extension(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(file_extension)
}

/// The tag to look up: the explicit hint verbatim, else the extension.
pub fn resolve_tag<'a>(hint: Option<&'a str>, path: Option<&'a Path>) -> Option<&'a str> {
    match hint {
        Some(hint) => Some(hint),
        None => path.and_then(path_extension),
    }
}

/// Resolve the decoder for a source.
pub fn resolve_decoder<'r>(
    registry: &'r Registry,
    hint: Option<&str>,
    path: Option<&Path>,
) -> Option<&'r dyn ImageDecoder> {
    resolve_tag(hint, path).and_then(|tag| registry.decoder(tag))
}
