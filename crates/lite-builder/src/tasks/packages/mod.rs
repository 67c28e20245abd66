//! Local package families and their injection into JupyterLite's `package.json`.
//!
//! - `discover` - candidate packages under a family's `packages/` directory
//! - `link` - build a family, then write `file:` entries for its packages

pub mod discover;
pub mod link;

use std::path::{Path, PathBuf};

/// Only packages whose name starts with one of these are linked.
pub const RECOGNIZED_PREFIXES: &[&str] = &["@jupyterlab", "@jupyter-notebook"];

/// A directory of sibling packages from one upstream checkout.
#[derive(Clone, Debug)]
pub struct Family {
    pub label: &'static str,
    pub base: PathBuf,
}

impl Family {
    pub fn jupyterlab(base: &Path) -> Self {
        Self {
            label: "JupyterLab",
            base: base.to_path_buf(),
        }
    }

    pub fn notebook(base: &Path) -> Self {
        Self {
            label: "Notebook",
            base: base.to_path_buf(),
        }
    }
}
