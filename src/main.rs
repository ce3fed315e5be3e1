use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser, Subcommand};

use doctrack::config::{Config, CONFIG_ENV};
use doctrack::profile::{AppState, FileTokenStore, MemoryTokenStore, TokenStore};
use doctrack::scanner::{ScanOutcome, ScanSession};
use doctrack::{import, ranking, report, tracking};

#[derive(Parser)]
#[command(name = "doctrack")]
#[command(about = "Tracking-code and supplier leaderboard tools for Doctrack", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode and validate a scanned tracking code
    Decode {
        code: String,
        #[arg(long)]
        json: bool,
    },
    /// Replay scanned payloads, one per line, through a scan session
    Scan {
        #[arg(long)]
        input: PathBuf,
        /// Resume scanning after each committed code
        #[arg(long)]
        reset_after_commit: bool,
    },
    /// Rank suppliers from a JSON or CSV ratings file
    Rank {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Write a markdown supplier leaderboard
    Report {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the user profile carried by an access token
    #[command(group(
        ArgGroup::new("source")
            .args(["token", "token_file"])
            .required(true)
            .multiple(false)
    ))]
    Profile {
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        token_file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Decode { code, json } => {
            let decoded = tracking::decode_and_validate(&config.scan, &code)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&decoded)?);
            } else {
                println!("Tracking number: {}", decoded.tracking_number);
                println!("Year: {}", decoded.year);
            }
        }
        Commands::Scan {
            input,
            reset_after_commit,
        } => {
            let file = std::fs::File::open(&input)
                .with_context(|| format!("failed to open {}", input.display()))?;
            let mut session = ScanSession::new(config.scan.clone());
            let mut committed = 0usize;

            for line in std::io::BufReader::new(file).lines() {
                let line = line?;
                let payload = Some(line.trim_end_matches('\r')).filter(|l| !l.is_empty());
                match session.on_scan(payload) {
                    ScanOutcome::Committed(code) => {
                        committed += 1;
                        println!("committed {} ({})", code.tracking_number, code.year);
                        if reset_after_commit {
                            session.reset();
                        }
                    }
                    ScanOutcome::Rejected(err) => println!("rejected: {err}"),
                    ScanOutcome::Ignored => println!("ignored"),
                }
            }

            if committed == 0 {
                bail!("no valid tracking code in {}", input.display());
            }
        }
        Commands::Rank { input, limit, json } => {
            let records = import::read_suppliers(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let ranked = ranking::rank(&records);
            let limit = limit.unwrap_or(config.leaderboard_limit);
            let shown = &ranked[..ranked.len().min(limit)];

            if json {
                println!("{}", serde_json::to_string_pretty(shown)?);
            } else if shown.is_empty() {
                println!("No supplier ratings found.");
            } else {
                println!("Supplier leaderboard:");
                for entry in shown {
                    println!("{}", report::summary_line(entry));
                }
            }
        }
        Commands::Report { input, out, limit } => {
            let records = import::read_suppliers(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let ranked = ranking::rank(&records);
            let source = input.display().to_string();
            let leaderboard = report::build_leaderboard(
                Some(&source),
                chrono::Utc::now(),
                &ranked,
                limit.unwrap_or(config.leaderboard_limit),
            );
            std::fs::write(&out, leaderboard)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Profile { token, token_file } => {
            let token = match (token, token_file) {
                (Some(token), _) => token,
                (None, Some(path)) => FileTokenStore::new(&path)
                    .load()?
                    .with_context(|| format!("no token stored in {}", path.display()))?,
                (None, None) => bail!("either --token or --token-file is required"),
            };

            let mut state = AppState::new();
            let profile = state.sign_in(&mut MemoryTokenStore::default(), &token)?;
            println!("User: {} ({})", profile.name, profile.user_id);
            if let Some(office) = &profile.office {
                println!("Office: {office}");
            }
            if let Some(position) = &profile.position {
                println!("Position: {position}");
            }
            if let Some(role) = &profile.role {
                println!("Role: {role}");
            }
            if let Some(expires_at) = profile.expires_at {
                let status = if profile.is_expired(chrono::Utc::now()) {
                    "expired"
                } else {
                    "valid"
                };
                println!("Expires: {} ({status})", expires_at.to_rfc3339());
            }
        }
    }

    Ok(())
}
