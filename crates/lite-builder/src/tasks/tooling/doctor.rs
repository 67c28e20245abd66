use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::manifest::MANIFEST_FILE;
use crate::tasks::lite::pipeline::{BUILD_REQUIREMENTS, CORE_PY_PACKAGE};
use crate::tasks::{HATCH, JLPM};

pub fn run(jupyterlite_path: &Path, python: &str) -> Result<()> {
    let mut ok = true;

    for tool in [JLPM, HATCH, python] {
        match which::which(tool) {
            Ok(found) => eprintln!("[OK] {tool} ({})", found.display()),
            Err(_) => {
                eprintln!("[FAIL] missing `{tool}` in PATH");
                ok = false;
            }
        }
    }

    for (path, present) in layout_checks(jupyterlite_path) {
        if present {
            eprintln!("[OK] {}", path.display());
        } else {
            eprintln!("[FAIL] missing: {}", path.display());
            ok = false;
        }
    }

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(())
}

/// Files a JupyterLite checkout needs for `build`, and whether each is there.
fn layout_checks(root: &Path) -> Vec<(PathBuf, bool)> {
    let files = [root.join(MANIFEST_FILE), root.join(BUILD_REQUIREMENTS)];
    let dirs = [root.join(CORE_PY_PACKAGE)];
    files
        .into_iter()
        .map(|f| {
            let present = f.is_file();
            (f, present)
        })
        .chain(dirs.into_iter().map(|d| {
            let present = d.is_dir();
            (d, present)
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn layout_checks_report_missing_pieces() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILE), "{}").unwrap();

        let checks = layout_checks(tmp.path());
        let missing: Vec<_> = checks.iter().filter(|(_, ok)| !ok).map(|(p, _)| p).collect();
        assert_eq!(
            missing,
            [
                &tmp.path().join(BUILD_REQUIREMENTS),
                &tmp.path().join(CORE_PY_PACKAGE)
            ]
        );
    }

    #[test]
    fn complete_layout_passes() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILE), "{}").unwrap();
        std::fs::write(tmp.path().join(BUILD_REQUIREMENTS), "").unwrap();
        std::fs::create_dir_all(tmp.path().join(CORE_PY_PACKAGE)).unwrap();
        assert!(layout_checks(tmp.path()).iter().all(|(_, ok)| *ok));
    }

    #[test]
    fn doctor_fails_without_tools_or_checkout() {
        let tmp = TempDir::new().unwrap();
        assert!(run(&tmp.path().join("nope"), "lite-builder-missing-python").is_err());
    }
}
