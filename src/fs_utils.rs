//! Capability-scoped file reads shared by configuration and artifact
//! loading.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

/// Opens the parent directory of `path` and returns it with the file name.
pub(crate) fn open_parent_dir(path: &Utf8Path) -> std::io::Result<(Dir, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other("path must include a file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Reads a whole file as bytes.
pub(crate) fn read_bytes(path: &Utf8Path) -> std::io::Result<Vec<u8>> {
    let (dir, file_name) = open_parent_dir(path)?;
    dir.read(file_name)
}

/// Reads a whole file as UTF-8 text.
pub(crate) fn read_to_string(path: &Utf8Path) -> std::io::Result<String> {
    let (dir, file_name) = open_parent_dir(path)?;
    dir.read_to_string(file_name)
}
