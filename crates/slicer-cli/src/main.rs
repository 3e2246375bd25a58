use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use slicer_config::{Settings, UnusedKeyPolicy};

mod commands;

#[derive(Parser)]
#[command(name = "slicer")]
#[command(about = "Slicer selection reconciliation tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON step script against a recording host and print the transcript (JSON lines)
    Replay {
        /// Script path
        script: String,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// View mode override (flat | tree)
        #[arg(long)]
        mode: Option<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> widget -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Report config leaf keys that nothing reads
    ConfigReport {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,

        /// View mode the report is computed for (defaults to widget.mode)
        #[arg(long)]
        mode: Option<String>,

        /// Exit non-zero when unused keys exist
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Print the format-pane instances of one settings object
    FormatPane {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,

        /// Object name (behavior | formatting | search)
        #[arg(long)]
        object: String,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience, e.g. RUST_LOG)
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Replay {
            script,
            config_paths,
            mode,
        } => {
            for line in commands::replay_lines(&script, &config_paths, mode.as_deref())? {
                println!("{}", line);
            }
        }

        Commands::ConfigHash { paths } => {
            let (loaded, _) = commands::load_config(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::ConfigReport {
            paths,
            mode,
            strict,
        } => {
            let (loaded, widget) = commands::load_config(&paths)?;
            let mode = match mode {
                Some(m) => commands::parse_view_mode(&m)?,
                None => widget.mode,
            };
            let policy = if strict {
                UnusedKeyPolicy::Fail
            } else {
                UnusedKeyPolicy::Warn
            };
            let report = slicer_config::report_unused_keys(mode, &loaded.config_json, policy)?;
            println!("mode={}", report.mode.as_str());
            println!("unused={}", report.unused_leaf_pointers.len());
            for p in &report.unused_leaf_pointers {
                println!("{}", p);
            }
        }

        Commands::FormatPane { paths, object } => {
            let (_, widget) = commands::load_config(&paths)?;
            let instances = format_pane(&widget.settings, &object)?;
            println!("{}", serde_json::to_string_pretty(&instances)?);
        }
    }

    Ok(())
}

fn format_pane(settings: &Settings, object: &str) -> Result<Vec<serde_json::Value>> {
    let instances = settings.object_instances(object.trim());
    if instances.is_empty() {
        bail!(
            "unknown --object '{}'. expected one of: behavior | formatting | search",
            object
        );
    }
    Ok(instances)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
