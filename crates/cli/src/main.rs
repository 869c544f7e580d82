use anyhow::Result;
use clap::{Parser, Subcommand};
use droid_triage::commands::{
    add_bundle_command, case_info_command, init_case_command, list_bundles_command,
    list_runs_command, modules_command, run_command,
};

/// Evidence-bundle triage assistant CLI.
///
/// This CLI is a thin wrapper around `triage-core` (exposed in code as
/// `triage_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "droid-triage",
    version,
    about = "Evidence-bundle triage assistant for Android mobile forensics",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new triage case at the given root.
    ///
    /// This will:
    /// - Create a `.triage` metadata directory.
    /// - Create a `reports` directory.
    /// - Write a `.triage/case.json` config file.
    InitCase {
        /// Case root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional case name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show basic information about an existing triage case.
    ///
    /// This reads `.triage/case.json` and reports key paths and counts.
    CaseInfo {
        /// Case root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,
    },

    /// Register an evidence bundle (a directory of collected artifacts)
    /// in the case database.
    ///
    /// This does not run any analysis; it just records that the bundle
    /// exists and where it lives relative to the case root.
    AddBundle {
        /// Case root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Path to the bundle directory to register.
        #[arg(long)]
        path: String,

        /// Optional human-friendly name. Defaults to the directory name.
        #[arg(long)]
        name: Option<String>,

        /// Skip hashing the bundle's dumpsys artifact (stores no hash).
        #[arg(long, default_value_t = false)]
        skip_hash: bool,
    },

    /// List all bundles registered in the case database.
    ListBundles {
        /// Case root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run artifact modules against a registered bundle.
    ///
    /// Writes one JSON report per module under `reports/<bundle>/`, records
    /// each run in the case database, and keeps going when a single module
    /// fails.
    Run {
        /// Case root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Name of the registered bundle to analyse.
        #[arg(long)]
        bundle: String,

        /// Optional indicator file (.json, .yaml or .yml) to match against.
        #[arg(long)]
        iocs: Option<String>,

        /// Run a single module instead of every registered one.
        #[arg(long)]
        module: Option<String>,

        /// Overwrite existing reports for this bundle.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// List module runs recorded in the case database.
    ListRuns {
        /// Case root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Only show runs for this bundle.
        #[arg(long)]
        bundle: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the artifact modules this build knows about.
    Modules {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::InitCase { root, name } => init_case_command(&root, name)?,
        Command::CaseInfo { root } => case_info_command(&root)?,
        Command::AddBundle { root, path, name, skip_hash } => {
            add_bundle_command(&root, &path, name, skip_hash)?
        }
        Command::ListBundles { root, json } => list_bundles_command(&root, json)?,
        Command::Run { root, bundle, iocs, module, force } => {
            run_command(&root, &bundle, iocs.as_deref(), module.as_deref(), force)?
        }
        Command::ListRuns { root, bundle, json } => {
            list_runs_command(&root, bundle.as_deref(), json)?
        }
        Command::Modules { json } => modules_command(json)?,
    }

    Ok(())
}

/// Install the process-wide subscriber. Logs go to stderr so stdout stays
/// machine-readable for the `--json` listings.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
