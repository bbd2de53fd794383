// src/main.rs

use anyhow::Result;
use clap::Parser;
use lpak::{FetchConfig, ManifestOverrides, ScriptConfig};
use std::time::Duration;

mod cli;
mod commands;

use cli::{Cli, Commands, PkgCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so manifests and scripts on stdout stay clean
    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Pkg(cmd)) => run_pkg(cmd),
        Some(Commands::Completions { shell }) => commands::cmd_completions(shell),
        None => {
            // No command provided, show help
            println!("lpak v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'lpak --help' for usage information");
            Ok(())
        }
    }
}

fn run_pkg(cmd: PkgCommands) -> Result<()> {
    match cmd {
        PkgCommands::Create {
            name,
            pkg_version,
            release,
            description,
            summary,
            package_type,
            platform_id,
            provides,
            requires,
            format,
            output,
            archives,
        } => {
            let overrides = ManifestOverrides {
                release,
                description,
                summary,
                package_type,
                platform_id,
                provides,
                requires,
            };
            commands::cmd_pkg_create(
                &name,
                &pkg_version,
                overrides,
                &archives,
                format.into(),
                output.as_deref(),
            )
        }
        PkgCommands::Fetch {
            sourcedir,
            force,
            progress,
            timeout,
            output,
            manifests,
        } => {
            let config = FetchConfig {
                force,
                progress,
                timeout: timeout.map(Duration::from_secs),
            };
            commands::cmd_pkg_fetch(&manifests, &sourcedir, config, output.as_deref())
        }
        PkgCommands::Build {
            buildroot,
            sourcedir,
            force,
            progress,
            manifests,
        } => {
            let config = FetchConfig {
                force,
                progress,
                ..Default::default()
            };
            commands::cmd_pkg_build(&manifests, &buildroot, &sourcedir, config).map(|_| ())
        }
        PkgCommands::Script {
            manifest,
            builddir,
            srcdir,
            destdir,
            pkgdir,
            output,
        } => {
            let config = ScriptConfig {
                build_dir: builddir,
                src_dir: srcdir,
                dest_dir: destdir,
                pkg_dir: pkgdir,
            };
            commands::cmd_pkg_script(&manifest, &config, output.as_deref())
        }
        PkgCommands::Convert {
            manifest,
            format,
            pretty,
            output,
        } => commands::cmd_pkg_convert(&manifest, format.into(), pretty, output.as_deref()),
        PkgCommands::Archive {
            source_dir,
            output,
            package_type,
            exclude,
        } => commands::cmd_pkg_archive(&source_dir, &output, &package_type, &exclude).map(|_| ()),
        PkgCommands::Compare { first, second } => {
            commands::cmd_pkg_compare(&first, &second).map(|_| ())
        }
    }
}
