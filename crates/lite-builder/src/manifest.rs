//! `package.json` access.
//!
//! Candidate manifests are only ever asked for their `name`. The root manifest
//! is loaded as a generic JSON object so every key other than `dependencies`
//! and `resolutions` survives a rewrite untouched, in its original order.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_FILE: &str = "package.json";

pub const DEPENDENCIES: &str = "dependencies";
pub const RESOLUTIONS: &str = "resolutions";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: top-level value is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("{}: \"{key}\" is not a JSON object", .path.display())]
    FieldNotAnObject { path: PathBuf, key: &'static str },

    #[error("failed to serialize {}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Name declared by `<dir>/package.json`.
///
/// Missing, unreadable or malformed manifests, top-level values other than an
/// object, and missing, non-string or empty names all yield `None`: such a
/// directory is simply not a recognizable package.
pub fn package_name(dir: &Path) -> Option<String> {
    let path = dir.join(MANIFEST_FILE);
    let text = std::fs::read_to_string(&path).ok()?;
    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("skipping {}: {e}", path.display());
            return None;
        }
    };
    let Some(fields) = value.as_object() else {
        log::debug!("skipping {}: top-level value is not an object", path.display());
        return None;
    };
    fields
        .get("name")?
        .as_str()
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// The target repository's root `package.json`.
#[derive(Debug, Clone)]
pub struct RootManifest {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl RootManifest {
    /// Load `<root>/package.json`.
    pub fn load_from_root(root: &Path) -> Result<Self, ManifestError> {
        Self::load(&root.join(MANIFEST_FILE))
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let Value::Object(doc) = value else {
            return Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            });
        };
        let manifest = Self {
            path: path.to_path_buf(),
            doc,
        };
        // A non-object map is rejected on load so a later write can't clobber it.
        for key in [DEPENDENCIES, RESOLUTIONS] {
            if manifest.doc.get(key).is_some_and(|v| !v.is_object()) {
                return Err(manifest.field_error(key));
            }
        }
        Ok(manifest)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point both `dependencies[name]` and `resolutions[name]` at `specifier`,
    /// creating either map if absent and overwriting any previous entry.
    pub fn link(&mut self, name: &str, specifier: &str) -> Result<(), ManifestError> {
        for key in [DEPENDENCIES, RESOLUTIONS] {
            self.map_mut(key)?
                .insert(name.to_string(), Value::String(specifier.to_string()));
        }
        Ok(())
    }

    /// Create `dependencies` and `resolutions` as empty maps if they are missing.
    pub fn ensure_link_maps(&mut self) -> Result<(), ManifestError> {
        for key in [DEPENDENCIES, RESOLUTIONS] {
            self.map_mut(key)?;
        }
        Ok(())
    }

    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.entry(DEPENDENCIES, name)
    }

    #[cfg(test)]
    pub fn resolution(&self, name: &str) -> Option<&str> {
        self.entry(RESOLUTIONS, name)
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// Two-space indented JSON with a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String, ManifestError> {
        let mut out =
            serde_json::to_string_pretty(&self.doc).map_err(|source| ManifestError::Serialize {
                path: self.path.clone(),
                source,
            })?;
        out.push('\n');
        Ok(out)
    }

    /// Rewrite the manifest at the path it was loaded from.
    ///
    /// Nothing is written unless the whole document serialized.
    pub fn save(&self) -> Result<(), ManifestError> {
        let text = self.to_pretty_string()?;
        std::fs::write(&self.path, text).map_err(|source| {
            ManifestError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn entry(&self, key: &str, name: &str) -> Option<&str> {
        self.doc.get(key)?.get(name)?.as_str()
    }

    fn map_mut(&mut self, key: &'static str) -> Result<&mut Map<String, Value>, ManifestError> {
        let path = &self.path;
        self.doc
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ManifestError::FieldNotAnObject {
                path: path.clone(),
                key,
            })
    }

    fn field_error(&self, key: &'static str) -> ManifestError {
        ManifestError::FieldNotAnObject {
            path: self.path.clone(),
            key,
        }
    }
}
