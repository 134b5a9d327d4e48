use std::path::{Component, Path, PathBuf};

use crate::error::ServeError;

/// Joins an untrusted request path onto `root`.
///
/// The join is lexical: leading separators never replace the root, `.` and
/// empty segments are dropped and `..` pops one component. The result must
/// still lie under `root`, otherwise the request is `Forbidden`.
///
/// Symlinks are not followed here; see [`revalidate`].
pub fn resolve(root: &Path, raw: &str) -> Result<PathBuf, ServeError> {
    let request = raw.trim();
    let mut joined = root.to_path_buf();

    for component in Path::new(request).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::ParentDir => {
                joined.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if !joined.starts_with(root) {
        tracing::debug!(request, "Request path escapes root");
        return Err(ServeError::Forbidden);
    }

    Ok(joined)
}

/// Canonicalizes an already resolved path and checks it is still inside
/// `root`. `root` must itself be canonical.
pub async fn revalidate(root: &Path, resolved: &Path) -> Result<PathBuf, ServeError> {
    let canonical = tokio::fs::canonicalize(resolved)
        .await
        .map_err(ServeError::NotFound)?;

    if !canonical.starts_with(root) {
        tracing::warn!(
            path = %resolved.display(),
            target = %canonical.display(),
            "Symlink points outside root"
        );
        return Err(ServeError::Forbidden);
    }

    Ok(canonical)
}

/// Root-relative form of `path` with `/` separators, as used in Gopher
/// selectors. The root itself maps to the empty string.
pub fn relative_selector(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
