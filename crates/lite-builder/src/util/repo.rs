//! Path handling for the three checkouts the builder stitches together.

use anyhow::{bail, Context, Result};
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute. Existing paths are canonicalized so symlinked
/// checkouts relativize against their real location; missing ones are only
/// made absolute and lexically normalized.
pub fn resolve(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return std::fs::canonicalize(path)
            .with_context(|| format!("Resolving {}", path.display()));
    }
    let abs = std::path::absolute(path)
        .with_context(|| format!("Making {} absolute", path.display()))?;
    Ok(normalize(&abs))
}

/// Resolve the JupyterLite root, which unlike the package directories must exist.
pub fn resolve_existing_dir(path: &Path) -> Result<PathBuf> {
    let resolved = resolve(path)?;
    if !resolved.is_dir() {
        bail!("JupyterLite repository not found at {}", resolved.display());
    }
    Ok(resolved)
}

/// Drop `.` components and fold `..` into the preceding component.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.last().copied();
                match last {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    // `..` at the root stays at the root
                    Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => out.push(c),
                }
            }
            _ => out.push(c),
        }
    }
    out.iter().collect()
}

/// Path of `path` relative to `base`, both absolute.
///
/// Fails when the two paths share no root (different drive prefixes), since
/// no relative path exists between them.
pub fn relative_path(path: &Path, base: &Path) -> Result<PathBuf> {
    if !path.is_absolute() || !base.is_absolute() {
        bail!(
            "Cannot relativize {} against {}: both paths must be absolute",
            path.display(),
            base.display()
        );
    }
    let path = normalize(path);
    let base = normalize(base);
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    fn roots<'a>(parts: &[Component<'a>]) -> Vec<Component<'a>> {
        parts
            .iter()
            .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
            .copied()
            .collect()
    }
    if roots(&path_parts) != roots(&base_parts) {
        bail!(
            "{} and {} are on different filesystem roots; no relative path exists",
            path.display(),
            base.display()
        );
    }

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Ok(rel)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
