use std::collections::BTreeMap;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::AdminError;
use crate::protocol::{self, Aip};
use crate::schema::{CredentialDefinitionRequest, SchemaRequest, ledger_id};

const API_KEY_HEADER: &str = "X-API-Key";
const DIDEXCHANGE_PROTOCOL: &str = "https://didcomm.org/didexchange/1.0";

/// HTTP client for an agent's admin API.
pub struct AdminClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    token: Option<String>,
}

// ── Request / Response types ────────────────────────────────────────

/// A freshly created invitation.
#[derive(Debug, Clone, Deserialize)]
pub struct Invitation {
    /// Set by the connections API; out-of-band invitations only get a
    /// connection once the invitee responds.
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub invi_msg_id: Option<String>,
    pub invitation_url: String,
    #[serde(default)]
    pub invitation: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionRecord {
    pub connection_id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub rfc23_state: Option<String>,
    #[serde(default)]
    pub their_label: Option<String>,
}

impl ConnectionRecord {
    /// Connection finished its handshake and can carry messages.
    pub fn is_ready(&self) -> bool {
        matches!(self.state.as_deref(), Some("active") | Some("completed"))
            || self.rfc23_state.as_deref() == Some("completed")
    }
}

#[derive(Debug, Deserialize)]
struct ConnectionList {
    #[serde(default)]
    results: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevokeRequest {
    pub rev_reg_id: String,
    pub cred_rev_id: String,
    pub publish: bool,
    /// Serialized as `null` when there is no connection to notify.
    pub connection_id: Option<String>,
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublishRevocationsResponse {
    /// Revocation registry id to the credential revocation ids published.
    #[serde(default)]
    pub rrid2crid: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWalletRequest {
    pub wallet_name: String,
    pub wallet_key: String,
    pub wallet_type: String,
    pub key_management_mode: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_webhook_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletRecord {
    pub wallet_id: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WalletList {
    #[serde(default)]
    results: Vec<WalletRecord>,
}

#[derive(Debug, Deserialize)]
struct CreatedCredentialDefinitions {
    #[serde(default)]
    credential_definition_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Percent-encode characters that are not safe in URL path segments.
///
/// Ledger identifiers and record ids may contain `/`, `#` or `?`.
fn encode_path_segment(s: &str) -> String {
    s.replace('%', "%25")
        .replace('#', "%23")
        .replace('?', "%3F")
        .replace('/', "%2F")
}

// ── REST helpers ────────────────────────────────────────────────────

impl AdminClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            token: None,
        }
    }

    /// Send `X-API-Key` with every request.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Bearer token selecting a multitenant sub-wallet (`None` for the base wallet).
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "admin request");
        let mut req = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn handle_response(resp: reqwest::Response) -> Result<Value, AdminError> {
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            debug!(%status, body = %text, "admin request failed");
            return Err(AdminError::Status { status, body: text });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Send an arbitrary request and return the parsed JSON response body.
    pub async fn admin_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, &str)],
    ) -> Result<Value, AdminError> {
        let mut req = self.request(method, path);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::handle_response(resp).await
    }

    pub async fn get(&self, path: &str) -> Result<Value, AdminError> {
        self.admin_request(Method::GET, path, None, &[]).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, AdminError> {
        self.admin_request(Method::POST, path, Some(body), &[]).await
    }

    pub async fn post_with_params(
        &self,
        path: &str,
        body: &Value,
        params: &[(&str, &str)],
    ) -> Result<Value, AdminError> {
        self.admin_request(Method::POST, path, Some(body), params)
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, AdminError> {
        self.admin_request(Method::DELETE, path, None, &[]).await
    }
}

// ── Typed calls ─────────────────────────────────────────────────────

impl AdminClient {
    /// GET /status
    pub async fn status(&self) -> Result<Value, AdminError> {
        self.get(protocol::STATUS).await
    }

    /// The wallet's public DID, if one has been assigned.
    pub async fn public_did(&self) -> Result<Option<String>, AdminError> {
        let resp = self.get(protocol::PUBLIC_DID).await?;
        Ok(resp
            .get("result")
            .and_then(|r| r.get("did"))
            .and_then(|d| d.as_str())
            .map(str::to_string))
    }

    /// Publish a schema and return its id.
    pub async fn create_schema(&self, req: &SchemaRequest) -> Result<String, AdminError> {
        let resp = self
            .post(protocol::SCHEMAS, &serde_json::to_value(req)?)
            .await?;
        ledger_id(&resp, "schema_id")
            .ok_or_else(|| AdminError::UnexpectedResponse("schema_id missing".into()))
    }

    /// Publish a credential definition and return its id.
    pub async fn create_credential_definition(
        &self,
        req: &CredentialDefinitionRequest,
    ) -> Result<String, AdminError> {
        let resp = self
            .post(protocol::CREDENTIAL_DEFINITIONS, &serde_json::to_value(req)?)
            .await?;
        ledger_id(&resp, "credential_definition_id").ok_or_else(|| {
            AdminError::UnexpectedResponse("credential_definition_id missing".into())
        })
    }

    /// Credential definitions this wallet created over the named schema.
    pub async fn created_credential_definitions(
        &self,
        schema_name: &str,
        schema_version: &str,
    ) -> Result<Vec<String>, AdminError> {
        let resp = self
            .admin_request(
                Method::GET,
                protocol::CREDENTIAL_DEFINITIONS_CREATED,
                None,
                &[("schema_name", schema_name), ("schema_version", schema_version)],
            )
            .await?;
        Ok(serde_json::from_value::<CreatedCredentialDefinitions>(resp)?.credential_definition_ids)
    }

    /// Create an invitation: out-of-band at AIP 2.0, connections API at AIP 1.0.
    pub async fn create_invitation(
        &self,
        aip: Aip,
        reuse_connections: bool,
    ) -> Result<Invitation, AdminError> {
        let resp = match aip {
            Aip::V20 => {
                let body = json!({
                    "handshake_protocols": [DIDEXCHANGE_PROTOCOL],
                    "use_public_did": reuse_connections,
                });
                self.post(protocol::OOB_CREATE_INVITATION, &body).await?
            }
            Aip::V10 => {
                self.post(protocol::CONNECTIONS_CREATE_INVITATION, &json!({}))
                    .await?
            }
        };
        Ok(serde_json::from_value(resp)?)
    }

    pub async fn connection(&self, connection_id: &str) -> Result<ConnectionRecord, AdminError> {
        let path = format!(
            "{}/{}",
            protocol::CONNECTIONS,
            encode_path_segment(connection_id)
        );
        Ok(serde_json::from_value(self.get(&path).await?)?)
    }

    /// Connections created in response to an out-of-band invitation.
    pub async fn connections_for_invitation(
        &self,
        invi_msg_id: &str,
    ) -> Result<Vec<ConnectionRecord>, AdminError> {
        let resp = self
            .admin_request(
                Method::GET,
                protocol::CONNECTIONS,
                None,
                &[("invitation_msg_id", invi_msg_id)],
            )
            .await?;
        Ok(serde_json::from_value::<ConnectionList>(resp)?.results)
    }

    /// POST a credential offer built by [`crate::offers`].
    pub async fn send_offer(&self, aip: Aip, offer: &Value) -> Result<Value, AdminError> {
        self.post(aip.send_offer_path(), offer).await
    }

    /// GET /issue-credential-2.0/records
    pub async fn credential_exchanges(&self) -> Result<Value, AdminError> {
        self.get(protocol::ISSUE_CREDENTIAL_V2_RECORDS).await
    }

    pub async fn delete_credential_exchange(&self, cred_ex_id: &str) -> Result<(), AdminError> {
        let path = format!(
            "{}/{}",
            protocol::ISSUE_CREDENTIAL_V2_RECORDS,
            encode_path_segment(cred_ex_id)
        );
        self.delete(&path).await?;
        Ok(())
    }

    /// Answer a holder's proposal with an offer.
    pub async fn send_offer_for_exchange(&self, cred_ex_id: &str) -> Result<Value, AdminError> {
        let path = format!(
            "{}/{}/send-offer",
            protocol::ISSUE_CREDENTIAL_V2_RECORDS,
            encode_path_segment(cred_ex_id)
        );
        self.post(&path, &json!({})).await
    }

    pub async fn send_message(&self, connection_id: &str, content: &str) -> Result<(), AdminError> {
        let path = format!(
            "{}/{}/send-message",
            protocol::CONNECTIONS,
            encode_path_segment(connection_id)
        );
        self.post(&path, &json!({ "content": content })).await?;
        Ok(())
    }

    pub async fn revoke(&self, req: &RevokeRequest) -> Result<Value, AdminError> {
        self.post(protocol::REVOCATION_REVOKE, &serde_json::to_value(req)?)
            .await
    }

    pub async fn publish_revocations(&self) -> Result<PublishRevocationsResponse, AdminError> {
        let resp = self.post(protocol::REVOCATION_PUBLISH, &json!({})).await?;
        Ok(serde_json::from_value(resp)?)
    }

    pub async fn set_endorser_info(
        &self,
        connection_id: &str,
        endorser_did: &str,
    ) -> Result<Value, AdminError> {
        let path = format!(
            "{}/{}/set-endorser-info",
            protocol::TRANSACTIONS,
            encode_path_segment(connection_id)
        );
        self.post_with_params(&path, &json!({}), &[("endorser_did", endorser_did)])
            .await
    }

    // ── Multitenancy ────────────────────────────────────────────────

    pub async fn wallets_named(&self, wallet_name: &str) -> Result<Vec<WalletRecord>, AdminError> {
        let resp = self
            .admin_request(
                Method::GET,
                protocol::MULTITENANCY_WALLETS,
                None,
                &[("wallet_name", wallet_name)],
            )
            .await?;
        Ok(serde_json::from_value::<WalletList>(resp)?.results)
    }

    pub async fn create_wallet(&self, req: &CreateWalletRequest) -> Result<WalletRecord, AdminError> {
        let resp = self
            .post(protocol::MULTITENANCY_WALLET, &serde_json::to_value(req)?)
            .await?;
        Ok(serde_json::from_value(resp)?)
    }

    pub async fn wallet_token(&self, wallet_id: &str) -> Result<String, AdminError> {
        let path = format!(
            "{}/{}/token",
            protocol::MULTITENANCY_WALLET,
            encode_path_segment(wallet_id)
        );
        let resp = self.post(&path, &json!({})).await?;
        Ok(serde_json::from_value::<TokenResponse>(resp)?.token)
    }
}
