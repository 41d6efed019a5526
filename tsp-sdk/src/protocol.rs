use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

// Standard protocol types used in credential offers and proof requests
pub const CRED_PREVIEW_TYPE: &str = "https://didcomm.org/issue-credential/2.0/credential-preview";
pub const SIG_TYPE_BLS: &str = "BbsBlsSignature2020";

// ── Admin API paths ─────────────────────────────────────────────────

pub const STATUS: &str = "/status";
pub const PUBLIC_DID: &str = "/wallet/did/public";
pub const SCHEMAS: &str = "/schemas";
pub const CREDENTIAL_DEFINITIONS: &str = "/credential-definitions";
pub const CREDENTIAL_DEFINITIONS_CREATED: &str = "/credential-definitions/created";

pub const OOB_CREATE_INVITATION: &str = "/out-of-band/create-invitation";
pub const CONNECTIONS_CREATE_INVITATION: &str = "/connections/create-invitation";
pub const CONNECTIONS: &str = "/connections";

pub const ISSUE_CREDENTIAL_V1_SEND_OFFER: &str = "/issue-credential/send-offer";
pub const ISSUE_CREDENTIAL_V2_SEND_OFFER: &str = "/issue-credential-2.0/send-offer";
pub const ISSUE_CREDENTIAL_V2_RECORDS: &str = "/issue-credential-2.0/records";

pub const REVOCATION_REVOKE: &str = "/revocation/revoke";
pub const REVOCATION_PUBLISH: &str = "/revocation/publish-revocations";

pub const TRANSACTIONS: &str = "/transactions";

pub const MULTITENANCY_WALLET: &str = "/multitenancy/wallet";
pub const MULTITENANCY_WALLETS: &str = "/multitenancy/wallets";

/// Aries Interop Profile level the agent is running with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aip {
    V10,
    V20,
}

impl Aip {
    pub fn as_number(self) -> u16 {
        match self {
            Self::V10 => 10,
            Self::V20 => 20,
        }
    }

    /// Path used to send a free-standing credential offer at this level.
    pub fn send_offer_path(self) -> &'static str {
        match self {
            Self::V10 => ISSUE_CREDENTIAL_V1_SEND_OFFER,
            Self::V20 => ISSUE_CREDENTIAL_V2_SEND_OFFER,
        }
    }
}

impl TryFrom<u16> for Aip {
    type Error = AdminError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(Self::V10),
            20 => Ok(Self::V20),
            other => Err(AdminError::InvalidAip(other)),
        }
    }
}

impl fmt::Display for Aip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// Credential format the issuer registers and offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialFormat {
    #[serde(rename = "indy")]
    Indy,
    #[serde(rename = "json-ld")]
    JsonLd,
}

impl CredentialFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Indy => "indy",
            Self::JsonLd => "json-ld",
        }
    }
}

impl FromStr for CredentialFormat {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indy" => Ok(Self::Indy),
            "json-ld" => Ok(Self::JsonLd),
            other => Err(AdminError::InvalidCredentialType(other.to_string())),
        }
    }
}

impl fmt::Display for CredentialFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describe an optional format the way error messages expect.
pub(crate) fn format_label(format: Option<CredentialFormat>) -> String {
    format.map_or_else(|| "None".to_string(), |f| f.to_string())
}
