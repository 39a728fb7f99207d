use clap::{Parser, Subcommand};
use std::env;
use tracing::{error, info};

use issue_key_fixer::config::Config;
use issue_key_fixer::error::{FixerError, Result};
use issue_key_fixer::fixer::{fix_or_fail, Fixer};
use issue_key_fixer::{logging, outputs};

#[derive(Parser)]
#[command(name = "issue-key-fixer")]
#[command(about = "Normalizes issue-tracker references in pull-request titles")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every issue key in the title into canonical PREFIX-123 form
    Fix {
        /// The pull-request title to fix
        title: String,
        /// Known issue prefixes (comma-separated). Defaults to ISSUE_PREFIXES, then config.toml
        #[arg(long)]
        prefixes: Option<String>,
    },
    /// List the issue keys recognized in the title without rewriting it
    Check {
        /// The pull-request title to scan
        title: String,
        /// Known issue prefixes (comma-separated). Defaults to ISSUE_PREFIXES, then config.toml
        #[arg(long)]
        prefixes: Option<String>,
    },
}

fn split_prefixes(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolution order: --prefixes flag, then ISSUE_PREFIXES, then config.toml.
fn resolve_prefixes(flag: Option<String>) -> Result<Vec<String>> {
    if let Some(list) = flag {
        return Ok(split_prefixes(&list));
    }
    if let Ok(list) = env::var("ISSUE_PREFIXES") {
        return Ok(split_prefixes(&list));
    }
    if let Ok(config) = Config::load() {
        return Ok(config.fixer.prefixes);
    }
    Err(FixerError::Config(
        "no issue prefixes supplied (use --prefixes, ISSUE_PREFIXES, or config.toml)".to_string(),
    ))
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fix { title, prefixes } => {
            let prefixes = resolve_prefixes(prefixes)?;
            match fix_or_fail(&prefixes, &title).await {
                Ok(fixed) => {
                    let changed = fixed != title;
                    info!(changed, "title fixed");
                    outputs::write_action_outputs(&fixed, changed)?;
                    println!("{}", fixed);
                }
                Err(e) => {
                    error!("{}", e);
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { title, prefixes } => {
            let prefixes = resolve_prefixes(prefixes)?;
            let mut fixer = Fixer::new(&prefixes, &title);
            let mut found = 0usize;
            while let Some(m) = fixer.next_match() {
                println!(
                    "{}\t(prefix: {}, number: {}, offset: {})",
                    m.text, m.prefix, m.number, m.offset
                );
                found += 1;
            }
            if found == 0 {
                let e = FixerError::NoIssueKeysFound(title);
                error!("{}", e);
                eprintln!("{}", e);
                std::process::exit(1);
            }
            info!(found, "issue keys located");
        }
    }

    Ok(())
}
