use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linea_tools::logging::init_logger;
use linea_tools::settings::Settings;
use linea_tools::{LoadOptions, Session, ToolchainConfig, VerificationTarget};

#[derive(Parser)]
#[command(name = "linea-tools")]
#[command(about = "Toolchain configuration for deploying and verifying contracts on Linea")]
struct Cli {
    /// Toolchain descriptor (defaults to toolchain.toml, or the shipped one)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Untracked secrets file
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    /// Reject verification entries that name undeclared networks
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration
    Config {
        /// Fail when any network is missing credentials
        #[arg(short, long)]
        validate: bool,
        /// Print the plain descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// List configured networks
    Networks,
    /// Prepare a contract deployment without sending it
    Deploy {
        /// Network to deploy to
        #[arg(short, long, default_value = "linea_testnet")]
        network: String,
        /// Compiled contract artifact
        #[arg(short, long)]
        artifact: PathBuf,
        /// Chain id reported by the endpoint, checked against the configuration
        #[arg(long)]
        chain_id: Option<u64>,
    },
    /// Resolve the verification endpoint for a network
    Verify {
        /// Network whose contracts are verified
        #[arg(short, long, default_value = "linea_mainnet")]
        network: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new().context("reading LINEA_TOOLS_* settings")?;
    init_logger(settings.log_format);

    let descriptor = cli.config.or(settings.config_path);
    let env_file = cli.env_file.unwrap_or(settings.env_file);
    let options = LoadOptions {
        strict: cli.strict || settings.strict,
    };
    let config = ToolchainConfig::load_from(descriptor.as_deref(), &env_file, options)
        .with_context(|| match &descriptor {
            Some(path) => format!("loading {}", path.display()),
            None => "loading toolchain descriptor".to_string(),
        })?;

    match cli.command {
        Commands::Config { validate, json } => {
            if json {
                println!("{}", config.to_json()?);
            } else {
                println!("{config}");
            }
            if validate {
                let incomplete: Vec<&str> = config
                    .networks()
                    .filter(|n| !n.is_ready())
                    .map(|n| n.name())
                    .collect();
                if !incomplete.is_empty() {
                    anyhow::bail!("missing credentials for: {}", incomplete.join(", "));
                }
            }
            Ok(())
        }
        Commands::Networks => {
            for network in config.networks() {
                let chain = network
                    .chain_id()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let status = if network.is_ready() { "ready" } else { "missing credentials" };
                println!("{:<20} {:>10}  {}", network.name(), chain, status);
            }
            Ok(())
        }
        Commands::Deploy {
            network,
            artifact,
            chain_id,
        } => {
            let payload = std::fs::read(&artifact)
                .with_context(|| format!("reading artifact {}", artifact.display()))?;
            let session = Session::new(&config);
            if let Some(reported) = chain_id {
                session.confirm_chain(&network, reported)?;
            }
            let submission = session.sign_and_submit(&network, &payload)?;
            println!("{}", serde_json::to_string_pretty(&submission)?);
            Ok(())
        }
        Commands::Verify { network } => {
            match Session::new(&config).verification_target(&network)? {
                VerificationTarget::Etherscan {
                    chain_id,
                    api_url,
                    browser_url,
                    ..
                } => {
                    println!("Verifier:  etherscan-compatible");
                    println!("Chain ID:  {chain_id}");
                    println!("API URL:   {api_url}");
                    println!("Browser:   {browser_url}");
                }
                VerificationTarget::Sourcify {
                    chain_id,
                    server_url,
                    ..
                } => {
                    println!("Verifier:  sourcify");
                    println!("Chain ID:  {chain_id}");
                    println!("Server:    {server_url}");
                }
            }
            Ok(())
        }
    }
}
