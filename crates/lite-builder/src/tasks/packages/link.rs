use anyhow::{Context, Result};
use std::path::Path;

use super::discover::{discover, Candidate};
use super::{Family, RECOGNIZED_PREFIXES};
use crate::manifest::RootManifest;
use crate::tasks::JLPM;
use crate::util::cmd::{Action, Runner, Step};
use crate::util::repo;

/// A package written into the root manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedPackage {
    pub name: String,
    pub specifier: String,
}

pub fn is_recognized(name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p))
}

/// `file:<rel>/<dir_name>`, with `/` separators on every platform.
pub fn location_specifier(rel: &Path, dir_name: &str) -> String {
    format!("file:{}/{}", repo::to_slash(rel), dir_name)
}

/// Install and build a family's packages in place before they are linked.
pub fn package_build_actions(base: &Path) -> Vec<Action> {
    vec![
        Step::new(JLPM, base).into(),
        Step::new(JLPM, base).args(["run", "build"]).into(),
    ]
}

/// Write a `file:` entry into both `dependencies` and `resolutions` of
/// `<lite_root>/package.json` for every candidate whose name matches one of
/// `prefixes`. Existing entries for those names are overwritten; every other
/// key is left alone.
pub fn merge_packages<I>(
    base: &Path,
    lite_root: &Path,
    candidates: I,
    prefixes: &[&str],
) -> Result<Vec<LinkedPackage>>
where
    I: IntoIterator<Item = Candidate>,
{
    let rel = repo::relative_path(base, lite_root)
        .context("Computing package path relative to the JupyterLite root")?;

    let mut manifest = RootManifest::load_from_root(lite_root)?;
    manifest.ensure_link_maps()?;

    let mut linked = Vec::new();
    for candidate in candidates {
        if !is_recognized(&candidate.name, prefixes) {
            log::debug!("ignoring {} ({})", candidate.name, candidate.dir.display());
            continue;
        }
        log::info!("Adding package: {}", candidate.name);
        let specifier = location_specifier(&rel, &candidate.dir_name());
        if let Some(previous) = manifest.dependency(&candidate.name) {
            log::debug!("{}: replacing {previous}", candidate.name);
        }
        manifest.link(&candidate.name, &specifier)?;
        linked.push(LinkedPackage {
            name: candidate.name,
            specifier,
        });
    }

    manifest.save()?;
    log::debug!(
        "wrote {} ({} package(s) linked)",
        manifest.path().display(),
        linked.len()
    );
    Ok(linked)
}

/// Build one family and link its recognized packages into the root manifest.
///
/// A missing family directory only warns; the manifest is then left untouched.
pub fn link_family(
    family: &Family,
    lite_root: &Path,
    runner: &mut dyn Runner,
    build_packages: bool,
) -> Result<Vec<LinkedPackage>> {
    let discovery = discover(&family.base);
    if !discovery.exists() {
        return Ok(Vec::new());
    }

    if build_packages {
        log::info!("Building packages in {}...", family.base.display());
        runner
            .execute_all(&package_build_actions(discovery.base()))
            .with_context(|| format!("Building {} packages", family.label))?;
    }

    merge_packages(
        discovery.base(),
        lite_root,
        discovery.iter(),
        RECOGNIZED_PREFIXES,
    )
    .with_context(|| format!("Linking {} packages", family.label))
}
