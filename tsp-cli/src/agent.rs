use std::time::Duration;

use tracing::{debug, info};
use tsp_sdk::AdminClient;
use tsp_sdk::client::{CreateWalletRequest, Invitation};
use tsp_sdk::offers::CredentialAttributes;
use tsp_sdk::protocol::{Aip, CredentialFormat};
use tsp_sdk::schema::{
    CredentialDefinitionRequest, DEGREE_SCHEMA_NAME, DEGREE_SCHEMA_VERSION, SchemaRequest,
};

use crate::render::{log_msg, log_status, log_warn};

/// Role of this agent when ledger writes go through an endorser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EndorserRole {
    Author,
    Endorser,
}

/// How the issuer session was started.
#[derive(Debug, Clone)]
pub struct Settings {
    pub aip: Aip,
    pub format: CredentialFormat,
    pub revocation: bool,
    pub multitenant: bool,
    pub endorser_role: Option<EndorserRole>,
    pub reuse_connections: bool,
    pub timing: bool,
    pub exchange_tracing: bool,
    pub self_attested: bool,
    pub tails_file_count: u32,
    pub wallet_type: String,
    /// Webhook target offered to new sub-wallets.
    pub webhook_url: Option<String>,
    pub poll_interval: Duration,
    pub invitation_timeout: Duration,
    /// Pause between accepting a proposal and deleting its record.
    pub record_cleanup_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aip: Aip::V20,
            format: CredentialFormat::Indy,
            revocation: false,
            multitenant: false,
            endorser_role: None,
            reuse_connections: false,
            timing: false,
            exchange_tracing: false,
            self_attested: false,
            tails_file_count: tsp_sdk::schema::DEFAULT_TAILS_FILE_COUNT,
            wallet_type: "askar".to_string(),
            webhook_url: None,
            poll_interval: Duration::from_secs(1),
            invitation_timeout: Duration::from_secs(300),
            record_cleanup_delay: Duration::from_secs(1),
        }
    }
}

impl Settings {
    /// Format passed to payload builders; AIP 1.0 has no format choice.
    pub fn offer_format(&self) -> Option<CredentialFormat> {
        match self.aip {
            Aip::V10 => None,
            Aip::V20 => Some(self.format),
        }
    }

    pub fn is_author(&self) -> bool {
        self.endorser_role == Some(EndorserRole::Author)
    }
}

/// The issuer's view of its agent: admin client plus session state.
pub struct IssuerAgent {
    pub client: AdminClient,
    pub settings: Settings,
    pub connection_id: Option<String>,
    pub cred_def_id: Option<String>,
    pub cred_attrs: CredentialAttributes,
}

impl IssuerAgent {
    pub fn new(client: AdminClient, settings: Settings) -> Self {
        Self {
            client,
            settings,
            connection_id: None,
            cred_def_id: None,
            cred_attrs: CredentialAttributes::default(),
        }
    }

    /// Active connection, required by messaging and revocation notices.
    pub fn require_connection(&self) -> Result<&str, Box<dyn std::error::Error>> {
        self.connection_id
            .as_deref()
            .ok_or_else(|| "no connection established yet, create an invitation first".into())
    }

    /// Check the agent is reachable and register what the chosen credential
    /// format needs before issuing.
    pub async fn provision(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log_status("#1 Provision an agent and wallet, get back configuration details");
        let status = self.client.status().await?;
        debug!(?status, "agent status");

        match self.settings.format {
            CredentialFormat::Indy => {
                match self.client.public_did().await? {
                    Some(did) => log_msg(&format!("Public DID: {did}")),
                    None => log_warn("Agent has no public DID; ledger writes may fail"),
                }
                self.create_schema_and_cred_def().await?;
            }
            CredentialFormat::JsonLd => {
                info!("json-ld credentials need no schema registration");
            }
        }
        Ok(())
    }

    /// Publish the degree schema and a credential definition for it.
    pub async fn create_schema_and_cred_def(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        log_status("#3/4 Create a new schema/cred def on the ledger");
        let schema_id = self.client.create_schema(&SchemaRequest::degree()).await?;
        log_msg(&format!("Schema ID: {schema_id}"));

        let req = CredentialDefinitionRequest::new(
            &schema_id,
            self.settings.revocation,
            self.settings.tails_file_count,
        );
        let cred_def_id = self.client.create_credential_definition(&req).await?;
        log_msg(&format!("Cred def ID: {cred_def_id}"));

        self.cred_def_id = Some(cred_def_id.clone());
        Ok(cred_def_id)
    }

    /// Point offers at the degree credential definition the current wallet
    /// already created, or at none if it has not created one.
    pub async fn load_cred_def(&mut self) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let cred_def_id = self
            .client
            .created_credential_definitions(DEGREE_SCHEMA_NAME, DEGREE_SCHEMA_VERSION)
            .await?
            .pop();
        match &cred_def_id {
            Some(id) => log_msg(&format!("Cred def ID: {id}")),
            None => log_warn("Wallet has no degree credential definition"),
        }
        self.cred_def_id = cred_def_id.clone();
        Ok(cred_def_id)
    }

    /// Create an invitation for the holder and, with `wait`, block until the
    /// resulting connection is usable.
    pub async fn generate_invitation(
        &mut self,
        wait: bool,
    ) -> Result<Invitation, Box<dyn std::error::Error>> {
        log_status("#7 Create a connection to the holder and print out the invite details");
        let invitation = self
            .client
            .create_invitation(self.settings.aip, self.settings.reuse_connections)
            .await?;

        log_msg("Use the following invitation URL to connect:");
        log_msg(&invitation.invitation_url);
        if let Some(connection_id) = &invitation.connection_id {
            self.connection_id = Some(connection_id.clone());
        }

        if wait {
            log_msg("Waiting for connection...");
            let connection_id = self.wait_for_connection(&invitation).await?;
            log_status(&format!("Connected: {connection_id}"));
            self.connection_id = Some(connection_id);
        }
        Ok(invitation)
    }

    async fn wait_for_connection(
        &self,
        invitation: &Invitation,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let deadline = tokio::time::Instant::now() + self.settings.invitation_timeout;
        loop {
            let ready = match (&invitation.connection_id, &invitation.invi_msg_id) {
                (Some(connection_id), _) => {
                    let record = self.client.connection(connection_id).await?;
                    record.is_ready().then_some(record.connection_id)
                }
                (None, Some(invi_msg_id)) => self
                    .client
                    .connections_for_invitation(invi_msg_id)
                    .await?
                    .into_iter()
                    .find(|c| c.is_ready())
                    .map(|c| c.connection_id),
                (None, None) => {
                    return Err("invitation carries neither a connection nor a message id".into());
                }
            };
            if let Some(connection_id) = ready {
                return Ok(connection_id);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(format!(
                    "no connection within {}s",
                    self.settings.invitation_timeout.as_secs()
                )
                .into());
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    /// Switch to the named sub-wallet, creating it first if it does not exist.
    /// Returns `true` when a wallet was created.
    pub async fn register_or_switch_wallet(
        &mut self,
        wallet_name: &str,
        webhook: bool,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        // Wallet management happens as the base wallet
        self.client.set_token(None);

        if let Some(existing) = self.client.wallets_named(wallet_name).await?.into_iter().next() {
            let token = self.client.wallet_token(&existing.wallet_id).await?;
            self.client.set_token(Some(token));
            log_msg(&format!("Switched to wallet: {wallet_name} ({})", existing.wallet_id));
            return Ok(false);
        }

        let webhook_urls = match (webhook, &self.settings.webhook_url) {
            (true, Some(url)) => Some(vec![url.clone()]),
            (true, None) => {
                log_warn("No --webhook-url configured, creating wallet without webhook target");
                None
            }
            (false, _) => None,
        };
        let req = CreateWalletRequest {
            wallet_name: wallet_name.to_string(),
            wallet_key: uuid::Uuid::new_v4().to_string(),
            wallet_type: self.settings.wallet_type.clone(),
            key_management_mode: "managed".to_string(),
            label: wallet_name.to_string(),
            wallet_webhook_urls: webhook_urls,
        };
        let created = self.client.create_wallet(&req).await?;
        let token = created
            .token
            .ok_or("agent did not return a token for the new wallet")?;
        self.client.set_token(Some(token));
        log_msg(&format!("Created wallet: {wallet_name} ({})", created.wallet_id));
        Ok(true)
    }

    /// Print the agent's per-operation timing, when it collects any.
    pub async fn show_timing(&self) -> Result<(), Box<dyn std::error::Error>> {
        let status = self.client.status().await?;
        if let Some(timing) = status.get("timing") {
            for line in crate::render::format_timing(timing) {
                log_msg(&line);
            }
        }
        Ok(())
    }
}
