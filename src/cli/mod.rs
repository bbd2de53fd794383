// src/cli/mod.rs
//! CLI definitions for lpak
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

mod pkg;

pub use pkg::PkgCommands;

#[derive(Parser)]
#[command(name = "lpak")]
#[command(author = "lpak Contributors")]
#[command(version)]
#[command(about = "Fetch, verify, and script source package builds", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package manifest commands
    #[command(subcommand)]
    Pkg(PkgCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from(["lpak", "--debug", "pkg", "fetch", "--force", "foo.yaml"])
            .unwrap();
        assert!(cli.debug);
        match cli.command {
            Some(Commands::Pkg(PkgCommands::Fetch {
                sourcedir,
                force,
                manifests,
                ..
            })) => {
                assert_eq!(sourcedir, "/src");
                assert!(force);
                assert_eq!(manifests, vec!["foo.yaml"]);
            }
            _ => panic!("expected pkg fetch"),
        }
    }

    #[test]
    fn test_documented_pkg_flags_parse() {
        let invocations: &[&[&str]] = &[
            &["pkg", "create", "--name", "foo", "--version", "1.0", "--format", "json", "--provides", "a,b"],
            &["pkg", "fetch", "--progress", "--timeout", "30", "foo.yaml"],
            &["pkg", "build", "--progress", "--buildroot", "/tmp/b", "foo.yaml"],
            &["pkg", "script", "--builddir", "/b", "--srcdir", "/s", "--destdir", "/d", "--pkgdir", "/p", "foo.yaml"],
            &["pkg", "convert", "--pretty", "-f", "yaml", "foo.json"],
            &["pkg", "archive", "--package", "tar.zst", "--exclude", ".git", "-o", "out.tar.zst", "dir"],
            &["pkg", "compare", "a.yaml", "b.yaml"],
        ];
        for args in invocations {
            let argv = std::iter::once("lpak").chain(args.iter().copied());
            assert!(Cli::try_parse_from(argv).is_ok(), "failed to parse {:?}", args);
        }
    }

    #[test]
    fn test_create_requires_name_and_version() {
        assert!(Cli::try_parse_from(["lpak", "pkg", "create", "--name", "foo"]).is_err());
        assert!(
            Cli::try_parse_from(["lpak", "pkg", "create", "--name", "foo", "--version", "1.0"])
                .is_ok()
        );
    }
}
