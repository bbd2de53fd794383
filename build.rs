// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: source download directory
fn sourcedir_arg() -> Arg {
    Arg::new("sourcedir")
        .long("sourcedir")
        .value_name("DIR")
        .default_value("/src")
        .help("Directory to download sources into")
}

/// Common argument: force re-download
fn force_arg() -> Arg {
    Arg::new("force")
        .long("force")
        .action(clap::ArgAction::SetTrue)
        .help("Download even if the file already exists")
}

/// Common argument: progress bars
fn progress_arg() -> Arg {
    Arg::new("progress")
        .long("progress")
        .action(clap::ArgAction::SetTrue)
        .help("Show download progress bars")
}

/// Common argument: output path
fn output_arg(help: &'static str) -> Arg {
    Arg::new("output").short('o').long("output").value_name("PATH").help(help)
}

/// Common argument: manifest serialization
fn format_arg(default: &'static str) -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .value_parser(["yaml", "json"])
        .default_value(default)
        .help("Output format")
}

fn manifests_arg() -> Arg {
    Arg::new("manifests")
        .required(true)
        .num_args(1..)
        .help("Manifest files (YAML or JSON)")
}

fn list_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .action(clap::ArgAction::Append)
        .value_delimiter(',')
        .help(help)
}

fn script_dir_arg(name: &'static str, default: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("DIR").default_value(default).help(help)
}

fn build_pkg() -> Command {
    Command::new("pkg")
        .about("Package manifest commands")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("Create a manifest, optionally describing local source archives")
                .arg(Arg::new("name").long("name").required(true).help("Package name"))
                .arg(Arg::new("version").long("version").required(true).help("Package version"))
                .arg(Arg::new("release").long("release").help("Release identifier (generated if omitted)"))
                .arg(Arg::new("description").long("description").help("Description (defaults to \"<Name> <version> <release>\")"))
                .arg(Arg::new("summary").long("summary").help("Summary (defaults to the description)"))
                .arg(Arg::new("package").long("package").help("Package type (tar.xz, tar.gz, tgz)"))
                .arg(Arg::new("platform_id").long("platform-id").help("Platform ID (x86_64-gnu-linux-9)"))
                .arg(list_arg("provides", "Provided capabilities (repeatable or comma separated)"))
                .arg(list_arg("requires", "Required packages (repeatable or comma separated)"))
                .arg(format_arg("yaml"))
                .arg(output_arg("Write the manifest to a file instead of stdout"))
                .arg(Arg::new("archives").num_args(0..).help("Local source archives to checksum and add")),
        )
        .subcommand(
            Command::new("fetch")
                .about("Fetch and verify the sources of one or more manifests")
                .arg(sourcedir_arg())
                .arg(force_arg())
                .arg(progress_arg())
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64))
                        .help("Per-request timeout in seconds (none by default)"),
                )
                .arg(output_arg("Write the updated manifest (with file records) here"))
                .arg(manifests_arg()),
        )
        .subcommand(
            Command::new("build")
                .about("Fetch sources and stage a build script for each manifest")
                .arg(
                    Arg::new("buildroot")
                        .long("buildroot")
                        .default_value("/tmp")
                        .help("Root under which each package's build directory is created"),
                )
                .arg(sourcedir_arg())
                .arg(force_arg())
                .arg(progress_arg())
                .arg(manifests_arg()),
        )
        .subcommand(
            Command::new("script")
                .about("Print the build script for a manifest")
                .arg(Arg::new("manifest").required(true).help("Manifest file"))
                .arg(script_dir_arg("builddir", "/build", "BUILDDIR value"))
                .arg(script_dir_arg("srcdir", "/src", "SRCDIR value"))
                .arg(script_dir_arg("destdir", "/install", "DESTDIR value"))
                .arg(script_dir_arg("pkgdir", "/package", "PKGDIR value"))
                .arg(output_arg("Write the script to a file instead of stdout")),
        )
        .subcommand(
            Command::new("convert")
                .about("Re-encode a manifest as YAML or JSON")
                .arg(Arg::new("manifest").required(true).help("Manifest file"))
                .arg(format_arg("json"))
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(clap::ArgAction::SetTrue)
                        .help("Indent JSON output"),
                )
                .arg(output_arg("Write the result to a file instead of stdout")),
        )
        .subcommand(
            Command::new("archive")
                .about("Archive a directory tree as a package")
                .arg(Arg::new("source_dir").required(true).help("Directory to archive"))
                .arg(output_arg("Output archive path").required(true))
                .arg(
                    Arg::new("package")
                        .long("package")
                        .default_value("tar.xz")
                        .help("Package type (tar.xz, tar.gz, tgz, tar.zst, tar)"),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .action(clap::ArgAction::Append)
                        .help("Entry names to leave out (repeatable, children of a matching directory are kept)"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare the releases of two manifests")
                .arg(Arg::new("first").required(true).help("First manifest"))
                .arg(Arg::new("second").required(true).help("Second manifest")),
        )
}

fn build_cli() -> Command {
    Command::new("lpak")
        .version(env!("CARGO_PKG_VERSION"))
        .author("lpak Contributors")
        .about("Fetch, verify, and script source package builds")
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(clap::ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(build_pkg())
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("lpak.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
