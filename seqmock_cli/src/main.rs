// vim: tw=80
//! seqmock-gen: write mocks for the types of a Rust source file
//!
//! ```bash
//! # Mock Store and Clock from src/store.rs, into src/mocks/
//! seqmock-gen --source src/store.rs --outdir src/mocks --revision 3 \
//!     --mocksuffix Store Clock:FakeClock
//! ```

use std::{
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf}
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use seqmock_gen::{
    GenConfig,
    GeneratedMock,
    MockTarget,
    SourcePackage,
    Strategy,
    generate_all
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "seqmock-gen",
    version,
    about = "Generate mocks for the public methods of Rust types"
)]
struct Cli {
    /// Rust source file defining the types to mock
    #[arg(long, short)]
    source: PathBuf,

    /// Name of the package the mocks belong to [default: name of OUTDIR]
    #[arg(long, short)]
    package: Option<String>,

    /// Directory to write the mocks to
    #[arg(long, short, default_value = ".")]
    outdir: PathBuf,

    /// Mock revision: 1 (queues), 2 (grouped queues) or 3 (call sequence)
    #[arg(long, short, default_value_t = 3)]
    revision: u32,

    /// Compile the mocks only in test builds, rather than behind a feature
    #[arg(long)]
    fortest: bool,

    /// Name mocks `{Type}Mock` unless given a name explicitly
    #[arg(long)]
    mocksuffix: bool,

    /// Feature that enables the mocks
    #[arg(long, default_value = "mock")]
    tag: String,

    /// Write the mocks unformatted, on one line
    #[arg(long)]
    noformat: bool,

    /// Log every generated mock
    #[arg(long, short)]
    verbose: bool,

    /// Types to mock, each as `Type` or `Type:MockName`
    #[arg(value_name = "TYPE[:MOCK]", required = true)]
    targets: Vec<MockTarget>
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// The package name implied by the output directory: its last component,
/// once made absolute.
fn package_name(outdir: &Path) -> Result<String> {
    let abs = outdir.canonicalize()
        .with_context(|| format!("invalid output directory {}",
                                 outdir.display()))?;
    match abs.file_name() {
        Some(name) => Ok(name.to_string_lossy().into_owned()),
        None => bail!("can't name a package after {}", abs.display())
    }
}

/// Write `mock` into `outdir`, leaving no partial file behind on failure.
fn write_mock(outdir: &Path, mock: &GeneratedMock) -> io::Result<()> {
    let path = outdir.join(&mock.filename);
    let r = fs::write(&path, &mock.source);
    if r.is_err() {
        let _ = fs::remove_file(&path);
    }
    r?;
    debug!(path = %path.display(), "wrote {}", mock.mock_name);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let strategy = Strategy::from_revision(cli.revision)?;
    let cfg = GenConfig {
        for_plain_test: cli.fortest,
        mock_suffix: cli.mocksuffix,
        tag: cli.tag,
        format: !cli.noformat
    };
    let text = fs::read_to_string(&cli.source)
        .with_context(|| format!("can't read {}", cli.source.display()))?;
    let source_pkg = cli.source.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let pkg = SourcePackage::parse(source_pkg, &text)
        .with_context(|| format!("can't parse {}", cli.source.display()))?;
    fs::create_dir_all(&cli.outdir)
        .with_context(|| format!("can't create {}", cli.outdir.display()))?;
    let target_pkg = match cli.package {
        Some(name) => name,
        None => package_name(&cli.outdir)?
    };
    generate_all(&cfg, strategy, &target_pkg, &cli.targets, &pkg, |mock| {
        Ok(write_mock(&cli.outdir, &mock)?)
    })?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
