use anyhow::{anyhow, Result};
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::Shell;
use fbquota::config::CredentialStore;
use fbquota::render::OutputFormat;
use fbquota::report::{self, ReportOptions};
use fbquota::client;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fbquota", about = "Per-user quota and usage report for FlashBlade arrays", version)]
struct Cli {
    /// FlashBlade name, as listed in the sessions file
    #[arg(short = 'n', long = "name", required_unless_present = "completions")]
    name: Option<String>,

    /// Report on this filesystem only
    #[arg(short = 'f', long = "filesystem")]
    filesystem: Option<String>,

    /// Only show rows for this user (exact match)
    #[arg(short = 'u', long = "user")]
    user: Option<String>,

    /// Output comma-separated rows without a header
    #[arg(short = 'c', long = "csv", conflicts_with = "json")]
    csv: bool,

    /// Print a JSON snapshot instead of a table
    #[arg(long)]
    json: bool,

    /// List the array's filesystems and exit
    #[arg(short = 'l', long, conflicts_with_all = ["csv", "filesystem", "user"])]
    list_filesystems: bool,

    /// Sessions (credentials) file; defaults to <config dir>/fbquota/sessions.yaml
    #[arg(long, env = "FBQUOTA_SESSIONS")]
    sessions: Option<PathBuf>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Print a shell completion script and exit
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures; everything else exits 1.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "fbquota", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);

    let name = cli.name.as_deref().ok_or_else(|| anyhow!("-n <NAME> is required"))?;
    let path = match &cli.sessions {
        Some(p) => p.clone(),
        None    => CredentialStore::default_path()?,
    };
    let store = CredentialStore::load(&path)?;
    let creds = report::resolve_array(&store, name)?;
    let session = client::connect(creds, Duration::from_secs(cli.timeout))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list_filesystems {
        report::list_filesystems(&session, name, cli.json, &mut out)?;
        return Ok(());
    }

    let format = if cli.json {
        OutputFormat::Json
    } else if cli.csv {
        OutputFormat::Csv
    } else {
        OutputFormat::Table
    };
    let opts = ReportOptions {
        array_name: name,
        filesystem: cli.filesystem.as_deref(),
        user:       cli.user.as_deref(),
        format,
    };
    let rows = report::run(&session, &opts, &mut out)?;
    tracing::info!(rows, api = session.version(), "report complete");
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("error,fbquota={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
