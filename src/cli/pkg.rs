// src/cli/pkg.rs
//! Package manifest commands

use clap::{Subcommand, ValueEnum};
use lpak::ManifestFormat;

/// Manifest serialization selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl From<OutputFormat> for ManifestFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => ManifestFormat::Yaml,
            OutputFormat::Json => ManifestFormat::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum PkgCommands {
    /// Create a manifest, optionally describing local source archives
    Create {
        /// Package name
        #[arg(long)]
        name: String,

        /// Package version
        #[arg(long = "version")]
        pkg_version: String,

        /// Release identifier (generated if omitted)
        #[arg(long)]
        release: Option<String>,

        /// Description (defaults to "<Name> <version> <release>")
        #[arg(long)]
        description: Option<String>,

        /// Summary (defaults to the description)
        #[arg(long)]
        summary: Option<String>,

        /// Package type (tar.xz, tar.gz, tgz)
        #[arg(long = "package")]
        package_type: Option<String>,

        /// Platform ID (x86_64-gnu-linux-9)
        #[arg(long)]
        platform_id: Option<String>,

        /// Provided capabilities (repeatable or comma separated)
        #[arg(long, value_delimiter = ',')]
        provides: Vec<String>,

        /// Required packages (repeatable or comma separated)
        #[arg(long, value_delimiter = ',')]
        requires: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,

        /// Write the manifest to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Local source archives to checksum and add
        archives: Vec<String>,
    },

    /// Fetch and verify the sources of one or more manifests
    Fetch {
        /// Directory to download sources into
        #[arg(long, default_value = "/src")]
        sourcedir: String,

        /// Download even if the file already exists
        #[arg(long)]
        force: bool,

        /// Show download progress bars
        #[arg(long)]
        progress: bool,

        /// Per-request timeout in seconds (none by default)
        #[arg(long)]
        timeout: Option<u64>,

        /// Write the updated manifest (with file records) here
        #[arg(short, long)]
        output: Option<String>,

        /// Manifest files
        #[arg(required = true)]
        manifests: Vec<String>,
    },

    /// Fetch sources and stage a build script for each manifest
    Build {
        /// Root under which each package's build directory is created
        #[arg(long, default_value = "/tmp")]
        buildroot: String,

        /// Directory to download sources into
        #[arg(long, default_value = "/src")]
        sourcedir: String,

        /// Download even if the file already exists
        #[arg(long)]
        force: bool,

        /// Show download progress bars
        #[arg(long)]
        progress: bool,

        /// Manifest files
        #[arg(required = true)]
        manifests: Vec<String>,
    },

    /// Print the build script for a manifest
    Script {
        /// Manifest file
        manifest: String,

        /// BUILDDIR value
        #[arg(long, default_value = "/build")]
        builddir: String,

        /// SRCDIR value
        #[arg(long, default_value = "/src")]
        srcdir: String,

        /// DESTDIR value
        #[arg(long, default_value = "/install")]
        destdir: String,

        /// PKGDIR value
        #[arg(long, default_value = "/package")]
        pkgdir: String,

        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Re-encode a manifest as YAML or JSON
    Convert {
        /// Manifest file
        manifest: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Archive a directory tree as a package
    Archive {
        /// Directory to archive
        source_dir: String,

        /// Output archive path
        #[arg(short, long)]
        output: String,

        /// Package type (tar.xz, tar.gz, tgz, tar.zst, tar)
        #[arg(long = "package", default_value = "tar.xz")]
        package_type: String,

        /// Entry names to leave out (repeatable, children of a matching directory are kept)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Compare the releases of two manifests
    Compare {
        /// First manifest
        first: String,

        /// Second manifest
        second: String,
    },
}
