//! Filesystem helpers for the linker.
use std::io;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns the I/O error from [`std::fs::create_dir_all`].
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Resolve `source` under `configs_dir` to an absolute, canonical path.
///
/// # Errors
///
/// Returns the I/O error from canonicalization; `NotFound` when the source
/// does not exist.
pub fn canonical_source(configs_dir: &Path, source: &Path) -> io::Result<PathBuf> {
    dunce::canonicalize(configs_dir.join(source))
}

/// Whether the symlink at `link` resolves to `expected`.
///
/// Relative link targets are interpreted against the link's parent
/// directory. A dangling link never matches.
#[must_use]
pub fn points_to(link: &Path, expected: &Path) -> bool {
    let Ok(target) = std::fs::read_link(link) else {
        return false;
    };
    let target = match link.parent() {
        Some(parent) if target.is_relative() => parent.join(target),
        _ => target,
    };
    dunce::canonicalize(target).is_ok_and(|resolved| resolved == expected)
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns the I/O error from the platform symlink call.
#[cfg(unix)]
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Symlinks are only created on Unix-like platforms.
///
/// # Errors
///
/// Always returns [`io::ErrorKind::Unsupported`].
#[cfg(not(unix))]
pub fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only supported on unix",
    ))
}

/// Recursively copy a directory tree.
///
/// Symlinks inside the tree are recreated as symlinks rather than followed,
/// so a copied tree is an exact replica of the original.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            create_symlink(&std::fs::read_link(&src_path)?, &dst_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Move `from` to `to`, preferring an atomic rename.
///
/// Only when the rename fails because the paths are on different
/// filesystems does this fall back to copying and then deleting the
/// original. The original is removed only after the copy succeeded.
///
/// # Errors
///
/// Returns the rename error, or the first error of the fallback.
pub fn move_path(from: &Path, to: &Path) -> io::Result<()> {
    match std::fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(from, to),
        other => other,
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let file_type = std::fs::symlink_metadata(from)?.file_type();
    if file_type.is_symlink() {
        create_symlink(&std::fs::read_link(from)?, to)?;
        std::fs::remove_file(from)
    } else if file_type.is_dir() {
        copy_dir_recursive(from, to)?;
        std::fs::remove_dir_all(from)
    } else {
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)
    }
}
