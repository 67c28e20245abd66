use crate::manifest;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A subdirectory whose `package.json` declares a non-empty name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub dir: PathBuf,
}

impl Candidate {
    /// Last path component of the package directory, e.g. `application`.
    pub fn dir_name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Candidate packages directly under one base directory.
///
/// Nothing is read until iteration, and every call to [`Discovery::iter`]
/// lists the directory again.
#[derive(Clone, Debug)]
pub struct Discovery {
    base: PathBuf,
}

impl Discovery {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn exists(&self) -> bool {
        self.base.is_dir()
    }

    /// Immediate subdirectories with a usable manifest, in directory listing order.
    pub fn iter(&self) -> impl Iterator<Item = Candidate> + '_ {
        WalkDir::new(&self.base)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| {
                let dir = entry.into_path();
                manifest::package_name(&dir).map(|name| Candidate { name, dir })
            })
    }
}

/// Discovery over `base`, warning when it is not a usable directory.
///
/// A missing directory (or a file in its place) is not an error: its packages
/// simply contribute nothing.
pub fn discover(base: &Path) -> Discovery {
    let discovery = Discovery::new(base);
    if !discovery.exists() {
        if base.exists() {
            log::warn!("Path {} is not a directory", base.display());
        } else {
            log::warn!("Path {} does not exist", base.display());
        }
    }
    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn package(base: &Path, dir: &str, manifest: Option<&str>) {
        let d = base.join(dir);
        std::fs::create_dir_all(&d).unwrap();
        if let Some(m) = manifest {
            std::fs::write(d.join("package.json"), m).unwrap();
        }
    }

    fn sorted(discovery: &Discovery) -> Vec<(String, String)> {
        let mut found: Vec<_> = discovery
            .iter()
            .map(|c| (c.name.clone(), c.dir_name()))
            .collect();
        found.sort();
        found
    }

    #[test]
    fn finds_named_packages_and_skips_the_rest() {
        let tmp = TempDir::new().unwrap();
        package(tmp.path(), "application", Some(r#"{"name": "@jupyterlab/application"}"#));
        package(tmp.path(), "tree", Some(r#"{"name": "@jupyter-notebook/tree"}"#));
        package(tmp.path(), "no-manifest", None);
        package(tmp.path(), "empty-name", Some(r#"{"name": ""}"#));
        package(tmp.path(), "garbage", Some("not json at all"));
        package(tmp.path(), "array", Some(r#"["@jupyterlab/array"]"#));
        std::fs::write(tmp.path().join("package.json"), r#"{"name": "file-not-dir"}"#).unwrap();
        std::fs::write(tmp.path().join("README.md"), "# packages").unwrap();

        let found = sorted(&discover(tmp.path()));
        assert_eq!(
            found,
            [
                ("@jupyter-notebook/tree".to_string(), "tree".to_string()),
                ("@jupyterlab/application".to_string(), "application".to_string()),
            ]
        );
    }

    #[test]
    fn nested_packages_are_not_discovered() {
        let tmp = TempDir::new().unwrap();
        package(tmp.path(), "outer/inner", Some(r#"{"name": "@jupyterlab/inner"}"#));
        assert_eq!(discover(tmp.path()).iter().count(), 0);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let discovery = discover(&tmp.path().join("jupyterlab/packages"));
        assert!(!discovery.exists());
        assert_eq!(discovery.iter().count(), 0);
    }

    #[test]
    fn regular_file_in_place_of_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("packages");
        std::fs::write(&base, r#"{"name": "@jupyterlab/not-a-dir"}"#).unwrap();

        let discovery = discover(&base);
        assert!(!discovery.exists());
        assert_eq!(discovery.iter().count(), 0);
    }

    #[test]
    fn iteration_is_restartable_and_sees_new_packages() {
        let tmp = TempDir::new().unwrap();
        package(tmp.path(), "a", Some(r#"{"name": "@jupyterlab/a"}"#));
        let discovery = discover(tmp.path());
        assert_eq!(discovery.iter().count(), 1);
        assert_eq!(discovery.iter().count(), 1);

        package(tmp.path(), "b", Some(r#"{"name": "@jupyterlab/b"}"#));
        assert_eq!(discovery.iter().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_package_directories_are_followed() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        package(&real, "ui", Some(r#"{"name": "@jupyterlab/ui-components"}"#));
        let base = tmp.path().join("packages");
        std::fs::create_dir_all(&base).unwrap();
        std::os::unix::fs::symlink(real.join("ui"), base.join("ui-components")).unwrap();

        let found: Vec<_> = discover(&base).iter().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "@jupyterlab/ui-components");
        assert_eq!(found[0].dir_name(), "ui-components");
    }
}
