mod agent;
mod commands;
mod config;
mod menu;
mod prompt;
mod render;

use std::time::Duration;

use clap::{Parser, Subcommand};
use tsp_sdk::AdminClient;
use tsp_sdk::offers::{DegreeInput, Moment, OfferContext, generate_credential_offer};
use tsp_sdk::proofs::{ProofRequestOptions, generate_proof_request_web_request};
use tsp_sdk::protocol::{Aip, CredentialFormat};

use agent::{EndorserRole, IssuerAgent, Settings};
use render::{CYAN, GREEN, RED, RESET, print_section};

#[derive(Parser)]
#[command(
    name = "tsp",
    about = "Controller for the Trust Service Provider credential issuer agent",
    version
)]
struct Cli {
    /// Admin API URL of the running agent (overrides config)
    #[arg(long, env = "TSP_ADMIN_URL", global = true)]
    admin_url: Option<String>,

    /// Admin API key sent as X-API-Key (overrides config)
    #[arg(long, env = "TSP_ADMIN_API_KEY", global = true)]
    api_key: Option<String>,

    /// Enable verbose debug output (can also set RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Aries Interop Profile level: 10 or 20
    #[arg(long, default_value = "20", value_parser = parse_aip, global = true)]
    aip: Aip,

    /// Credential format: indy or json-ld
    #[arg(long, default_value = "indy", value_parser = parse_format, global = true)]
    cred_type: CredentialFormat,

    /// Issue revocable credentials and enable the revocation menu
    #[arg(long, global = true)]
    revocation: bool,

    /// Enable sub-wallet management
    #[arg(long, global = true)]
    multitenant: bool,

    /// Ledger writes go through an endorser, with this agent in the given role
    #[arg(long, value_enum, global = true)]
    endorser_role: Option<EndorserRole>,

    /// Invite with the public DID so holders reuse existing connections
    #[arg(long, global = true)]
    reuse_connections: bool,

    /// Print the agent's timing statistics on exit
    #[arg(long, global = true)]
    timing: bool,

    /// Ask the agent to trace credential exchanges
    #[arg(long, global = true)]
    trace_exchanges: bool,

    /// Request a self-attested attribute in proof requests
    #[arg(
        long,
        env = "SELF_ATTESTED",
        value_parser = clap::builder::FalseyValueParser::new(),
        global = true
    )]
    self_attested: bool,

    /// Revocation registry size for new credential definitions
    #[arg(
        long,
        env = "TAILS_FILE_COUNT",
        default_value_t = tsp_sdk::schema::DEFAULT_TAILS_FILE_COUNT,
        global = true
    )]
    tails_file_count: u32,

    /// Wallet type for new sub-wallets
    #[arg(long, default_value = "askar", global = true)]
    wallet_type: String,

    /// Webhook target registered for new sub-wallets on request
    #[arg(long, global = true)]
    webhook_url: Option<String>,

    /// Seconds to wait for a holder to accept an invitation
    #[arg(long, default_value_t = 300, global = true)]
    invitation_timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the agent, invite a holder and open the issuer menu (default)
    Run,
    /// Check that the agent admin API is reachable
    Health,
    /// Save the admin URL and API key to the config file
    Setup {
        /// Admin API URL to store
        #[arg(long)]
        url: String,
        /// Admin API key to store
        #[arg(long)]
        key: Option<String>,
    },
    /// Print a credential offer body without sending it
    Offer {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        degree: String,
        /// Credential definition the offer refers to
        #[arg(long)]
        cred_def_id: String,
        #[arg(long)]
        connection_id: Option<String>,
    },
    /// Print a proof request body without sending it
    ProofRequest {
        /// Target connection (omit for a connectionless request)
        #[arg(long)]
        connection_id: Option<String>,
    },
}

fn parse_aip(s: &str) -> Result<Aip, String> {
    let level: u16 = s
        .parse()
        .map_err(|_| format!("'{s}' is not an AIP level"))?;
    Aip::try_from(level).map_err(|e| e.to_string())
}

fn parse_format(s: &str) -> Result<CredentialFormat, String> {
    s.parse().map_err(|e: tsp_sdk::AdminError| e.to_string())
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            aip: self.aip,
            format: self.cred_type,
            revocation: self.revocation,
            multitenant: self.multitenant,
            endorser_role: self.endorser_role,
            reuse_connections: self.reuse_connections,
            timing: self.timing,
            exchange_tracing: self.trace_exchanges,
            self_attested: self.self_attested,
            tails_file_count: self.tails_file_count,
            wallet_type: self.wallet_type.clone(),
            webhook_url: self.webhook_url.clone(),
            invitation_timeout: Duration::from_secs(self.invitation_timeout),
            ..Settings::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing: --verbose enables debug for both crates, or respect RUST_LOG
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("tsp_cli=debug,tsp_sdk=debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let tsp_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: could not load config: {e}");
            config::TspConfig::default()
        }
    };
    let admin_url = tsp_config.resolve_admin_url(cli.admin_url.clone());
    let api_key = tsp_config.resolve_api_key(cli.api_key.clone());
    let settings = cli.settings();

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            render::print_banner();
            let client = AdminClient::new(&admin_url).with_api_key(api_key);
            cmd_run(IssuerAgent::new(client, settings)).await
        }
        Commands::Health => {
            let client = AdminClient::new(&admin_url).with_api_key(api_key);
            cmd_health(&client).await
        }
        Commands::Setup { url, key } => cmd_setup(url, key),
        Commands::Offer {
            name,
            age,
            degree,
            cred_def_id,
            connection_id,
        } => cmd_offer(
            &settings,
            DegreeInput { name, age, degree },
            &cred_def_id,
            connection_id.as_deref(),
        ),
        Commands::ProofRequest { connection_id } => {
            cmd_proof_request(&settings, connection_id.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ── Command handlers ────────────────────────────────────────────────

async fn cmd_run(mut agent: IssuerAgent) -> Result<(), Box<dyn std::error::Error>> {
    let mut prompter = prompt::TerminalPrompter::new();
    menu::run_session(&mut agent, &mut prompter).await
}

async fn cmd_health(client: &AdminClient) -> Result<(), Box<dyn std::error::Error>> {
    print_section("Agent");
    println!("  {CYAN}{:<13}{RESET} {}", "Admin URL", client.base_url());

    match client.status().await {
        Ok(status) => {
            let version = status
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            println!(
                "  {CYAN}{:<13}{RESET} {GREEN}✓{RESET} ok (v{version})",
                "Service"
            );
            if let Some(label) = status.get("label").and_then(|v| v.as_str()) {
                println!("  {CYAN}{:<13}{RESET} {label}", "Label");
            }
        }
        Err(e) => {
            println!(
                "  {CYAN}{:<13}{RESET} {RED}✗{RESET} unreachable ({e})",
                "Service"
            );
            return Ok(());
        }
    }

    match client.public_did().await {
        Ok(Some(did)) => println!("  {CYAN}{:<13}{RESET} {did}", "Public DID"),
        Ok(None) => println!("  {CYAN}{:<13}{RESET} (not set)", "Public DID"),
        Err(e) => println!("  {CYAN}{:<13}{RESET} {RED}✗{RESET} {e}", "Public DID"),
    }
    Ok(())
}

fn cmd_setup(url: String, key: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::TspConfig {
        admin_url: Some(url.trim_end_matches('/').to_string()),
        api_key: key,
    };
    let path = config::save_config(&config)?;
    println!("Config saved to: {}", path.display());
    if let Some(url) = &config.admin_url {
        println!("  Admin URL: {url}");
    }
    Ok(())
}

fn cmd_offer(
    settings: &Settings,
    input: DegreeInput,
    cred_def_id: &str,
    connection_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = OfferContext {
        aip: settings.aip,
        format: settings.offer_format(),
        cred_def_id,
        connection_id,
        exchange_tracing: settings.exchange_tracing,
    };
    let mut cache = tsp_sdk::offers::CredentialAttributes::default();
    let offer = generate_credential_offer(&mut cache, &ctx, &input, Moment::now())?;
    println!("{}", serde_json::to_string_pretty(&offer)?);
    Ok(())
}

fn cmd_proof_request(
    settings: &Settings,
    connection_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let opts = ProofRequestOptions {
        aip: settings.aip,
        format: settings.offer_format(),
        revocation: settings.revocation,
        exchange_tracing: settings.exchange_tracing,
        self_attested: settings.self_attested,
        connection_id,
    };
    let request = generate_proof_request_web_request(&opts, Moment::now())?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_run_interactive_session() {
        let cli = Cli::try_parse_from(["tsp"]).unwrap();
        assert!(cli.command.is_none());
        let settings = cli.settings();
        assert_eq!(settings.aip, Aip::V20);
        assert_eq!(settings.format, CredentialFormat::Indy);
        assert!(!settings.revocation);
        assert_eq!(settings.invitation_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_agent_flags_map_to_settings() {
        let cli = Cli::try_parse_from([
            "tsp",
            "--aip",
            "10",
            "--revocation",
            "--multitenant",
            "--endorser-role",
            "author",
            "--tails-file-count",
            "25",
            "run",
        ])
        .unwrap();
        let settings = cli.settings();
        assert_eq!(settings.aip, Aip::V10);
        assert!(settings.revocation && settings.multitenant && settings.is_author());
        assert_eq!(settings.tails_file_count, 25);
        assert_eq!(settings.offer_format(), None);
    }

    #[test]
    fn test_invalid_aip_rejected() {
        assert!(Cli::try_parse_from(["tsp", "--aip", "30"]).is_err());
        assert!(Cli::try_parse_from(["tsp", "--cred-type", "mdoc"]).is_err());
    }

    #[test]
    fn test_json_ld_format() {
        let cli = Cli::try_parse_from(["tsp", "--cred-type", "json-ld", "proof-request"]).unwrap();
        assert_eq!(cli.settings().offer_format(), Some(CredentialFormat::JsonLd));
        assert!(matches!(
            cli.command,
            Some(Commands::ProofRequest { connection_id: None })
        ));
    }

    #[test]
    fn test_offer_command_rejects_json_ld() {
        let settings = Settings {
            format: CredentialFormat::JsonLd,
            ..Settings::default()
        };
        let input = DegreeInput {
            name: "Alice".into(),
            age: "30".into(),
            degree: "Physics".into(),
        };
        let err = cmd_offer(&settings, input, "cd:1", None).unwrap_err();
        assert_eq!(err.to_string(), "Error invalid credential type: json-ld");
    }
}
