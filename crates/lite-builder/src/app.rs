use anyhow::Result;

use crate::cli::{Cmd, ExecArgs};
use crate::tasks::lite::pipeline::{self, BuildOptions};
use crate::util::cmd::{DryRunner, Runner, SystemRunner};

pub fn run(cli: crate::cli::Cli) -> Result<()> {
    match cli.cmd {
        Cmd::Build { paths, exec } => {
            let opts = BuildOptions::resolve(&paths, &exec)?;
            pipeline::run_build(&opts, &mut *runner_for(&exec))
        }
        Cmd::Link {
            paths,
            exec,
            skip_package_build,
        } => {
            let mut opts = BuildOptions::resolve(&paths, &exec)?;
            opts.build_packages = !skip_package_build;
            pipeline::run_link(&opts, &mut *runner_for(&exec))
        }
        Cmd::Doctor {
            jupyterlite_path,
            python,
        } => crate::tasks::tooling::doctor::run(&jupyterlite_path, &python),
    }
}

fn runner_for(exec: &ExecArgs) -> Box<dyn Runner> {
    if exec.dry_run {
        Box::new(DryRunner)
    } else {
        Box::new(SystemRunner)
    }
}
