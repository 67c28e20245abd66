//! The fixed JupyterLite build sequence.
//!
//! Order: prepare the JupyterLite checkout, link JupyterLab packages, link
//! Notebook packages, then build and package JupyterLite. The first failing
//! step aborts the run. Nothing is rolled back, so a `package.json` linked
//! before a later failure stays linked.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::{ExecArgs, PathArgs};
use crate::tasks::packages::link::{link_family, LinkedPackage};
use crate::tasks::packages::Family;
use crate::tasks::{HATCH, JLPM};
use crate::util::cmd::{Action, Runner, Step};
use crate::util::repo;

pub const BUILD_REQUIREMENTS: &str = "requirements-build.txt";
pub const DOIT_DB: &str = ".doit.db";
pub const CORE_PY_PACKAGE: &str = "py/jupyterlite-core";

/// Resolved inputs of a build.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    pub jupyterlab: PathBuf,
    pub notebook: PathBuf,
    pub jupyterlite: PathBuf,
    pub python: String,
    pub build_packages: bool,
}

impl BuildOptions {
    /// Make every path absolute; the JupyterLite checkout has to exist.
    pub fn resolve(paths: &PathArgs, exec: &ExecArgs) -> Result<Self> {
        Ok(Self {
            jupyterlab: repo::resolve(&paths.jupyterlab_path)?,
            notebook: repo::resolve(&paths.notebook_path)?,
            jupyterlite: repo::resolve_existing_dir(&paths.jupyterlite_path)?,
            python: exec.python.clone(),
            build_packages: true,
        })
    }

    /// Link order. When both families ship the same package name the later
    /// family's entry wins.
    pub fn families(&self) -> [Family; 2] {
        [
            Family::jupyterlab(&self.jupyterlab),
            Family::notebook(&self.notebook),
        ]
    }
}

/// Build requirements and JS dependencies of the JupyterLite checkout.
pub fn prepare_actions(lite_root: &Path, python: &str) -> Vec<Action> {
    vec![
        Step::new(python, lite_root)
            .args(["-m", "pip", "install", "-r", BUILD_REQUIREMENTS])
            .into(),
        Step::new(JLPM, lite_root).into(),
    ]
}

/// Everything after linking: clean doit state, reinstall, dedupe, build, pack, hatch.
pub fn lite_build_actions(lite_root: &Path) -> Vec<Action> {
    vec![
        Action::RemovePath(lite_root.join(DOIT_DB)),
        Step::new(JLPM, lite_root).into(),
        Step::new(JLPM, lite_root).arg("deduplicate").into(),
        Step::new(JLPM, lite_root).args(["run", "build"]).into(),
        Step::new(JLPM, lite_root).args(["run", "pack:app"]).into(),
        Step::new(HATCH, &lite_root.join(CORE_PY_PACKAGE))
            .arg("build")
            .into(),
    ]
}

/// Link every family in order and return what ended up linked.
pub fn link_all(opts: &BuildOptions, runner: &mut dyn Runner) -> Result<Vec<LinkedPackage>> {
    let mut linked = Vec::new();
    for family in opts.families() {
        log::info!("Adding {} packages...", family.label);
        linked.extend(link_family(
            &family,
            &opts.jupyterlite,
            runner,
            opts.build_packages,
        )?);
    }
    Ok(linked)
}

/// Full build: prepare, link both families, build JupyterLite.
pub fn run_build(opts: &BuildOptions, runner: &mut dyn Runner) -> Result<()> {
    log::info!("JupyterLite: {}", opts.jupyterlite.display());

    runner
        .execute_all(&prepare_actions(&opts.jupyterlite, &opts.python))
        .context("Preparing the JupyterLite checkout")?;

    let linked = link_all(opts, runner)?;
    log::info!("Linked {} local package(s)", linked.len());

    log::info!("Building JupyterLite...");
    runner
        .execute_all(&lite_build_actions(&opts.jupyterlite))
        .context("Building JupyterLite")?;

    log::info!("Done.");
    Ok(())
}

/// Only the link passes, without the surrounding JupyterLite build.
pub fn run_link(opts: &BuildOptions, runner: &mut dyn Runner) -> Result<()> {
    let linked = link_all(opts, runner)?;
    for pkg in &linked {
        log::debug!("{} -> {}", pkg.name, pkg.specifier);
    }
    log::info!("Linked {} local package(s)", linked.len());
    Ok(())
}
