use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lite-builder")]
#[command(about = "Build JupyterLite with local JupyterLab/Notebook package links")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter derived from the -v/-q flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Link the local packages and run the full JupyterLite build.
    ///
    /// Steps: pip install build requirements, jlpm, link JupyterLab packages,
    /// link Notebook packages, jlpm deduplicate/build/pack:app, hatch build.
    Build {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        exec: ExecArgs,
    },

    /// Build the local package families and link them into JupyterLite's package.json.
    Link {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        exec: ExecArgs,

        #[arg(
            long = "skip-package-build",
            help = "Do not run `jlpm` / `jlpm run build` inside the package directories before linking."
        )]
        skip_package_build: bool,
    },

    /// Check that jlpm, hatch and python are available and the JupyterLite checkout looks complete.
    Doctor {
        #[arg(
            long = "jupyterlite-path",
            env = "LITE_BUILDER_JUPYTERLITE_PATH",
            default_value = "./jupyterlite"
        )]
        jupyterlite_path: PathBuf,

        #[arg(long, env = "LITE_BUILDER_PYTHON", default_value = "python")]
        python: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Path to JupyterLab packages.
    #[arg(
        long = "jupyterlab-path",
        env = "LITE_BUILDER_JUPYTERLAB_PATH",
        default_value = "./jupyterlab/packages"
    )]
    pub jupyterlab_path: PathBuf,

    /// Path to Notebook packages.
    #[arg(
        long = "notebook-path",
        env = "LITE_BUILDER_NOTEBOOK_PATH",
        default_value = "./notebook/packages"
    )]
    pub notebook_path: PathBuf,

    /// Path to the JupyterLite repository.
    #[arg(
        long = "jupyterlite-path",
        env = "LITE_BUILDER_JUPYTERLITE_PATH",
        default_value = "./jupyterlite"
    )]
    pub jupyterlite_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Python interpreter used for `-m pip install`.
    #[arg(long, env = "LITE_BUILDER_PYTHON", default_value = "python")]
    pub python: String,

    /// Print the external steps instead of running them. package.json is still rewritten.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_uses_documented_defaults() {
        let cli = Cli::try_parse_from(["lite-builder", "build"]).unwrap();
        let Cmd::Build { paths, exec } = cli.cmd else {
            unreachable!("expected build");
        };
        assert_eq!(paths.jupyterlab_path, PathBuf::from("./jupyterlab/packages"));
        assert_eq!(paths.notebook_path, PathBuf::from("./notebook/packages"));
        assert_eq!(paths.jupyterlite_path, PathBuf::from("./jupyterlite"));
        assert_eq!(exec.python, "python");
        assert!(!exec.dry_run);
    }

    #[test]
    fn link_accepts_paths_and_skip_flag() {
        let cli = Cli::try_parse_from([
            "lite-builder",
            "link",
            "--jupyterlab-path",
            "/src/lab/packages",
            "--skip-package-build",
        ])
        .unwrap();
        let Cmd::Link {
            paths,
            skip_package_build,
            ..
        } = cli.cmd
        else {
            unreachable!("expected link");
        };
        assert_eq!(paths.jupyterlab_path, PathBuf::from("/src/lab/packages"));
        assert!(skip_package_build);
    }

    #[test]
    fn log_level_follows_flags() {
        let quiet = Cli::try_parse_from(["lite-builder", "-q", "doctor"]).unwrap();
        assert_eq!(quiet.log_level(), "warn");
        let plain = Cli::try_parse_from(["lite-builder", "doctor"]).unwrap();
        assert_eq!(plain.log_level(), "info");
        let debug = Cli::try_parse_from(["lite-builder", "doctor", "-v"]).unwrap();
        assert_eq!(debug.log_level(), "debug");
        let trace = Cli::try_parse_from(["lite-builder", "-vv", "build"]).unwrap();
        assert_eq!(trace.log_level(), "trace");
    }
}
