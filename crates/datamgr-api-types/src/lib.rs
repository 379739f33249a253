//! Wire types shared between the data manager server and its clients.
//!
//! Field names follow the server's JSON exactly (`Result`, `credentialId`,
//! `cspType`), so most structs carry explicit serde renames.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Envelope returned by every job-triggering endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicResponse {
    #[serde(rename = "Result", default)]
    pub result: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// A stored cloud credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub credential_id: u64,
    pub csp_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_json: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl Credential {
    /// Label used when presenting the credential as a selectable option.
    pub fn option_label(&self) -> String {
        match self.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => format!("{} ({})", name, self.csp_type),
            None => format!("#{} ({})", self.credential_id, self.csp_type),
        }
    }
}

/// Creation body. The server decodes `credentialJson` as a raw JSON
/// document, so it travels as an object rather than a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCreateRequest {
    pub csp_type: String,
    pub name: String,
    pub credential_json: Value,
}

/// Update body. Updates store `credentialJson` verbatim, as text.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CredentialUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csp_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_json: Option<String>,
}

/// Cloud vendor identifier carried by point descriptors and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    Aws,
    Ncp,
    Gcp,
    OnPremise,
    Other(String),
}

impl Provider {
    pub fn as_str(&self) -> &str {
        match self {
            Provider::Aws => "aws",
            Provider::Ncp => "ncp",
            Provider::Gcp => "gcp",
            Provider::OnPremise => "on-premise",
            Provider::Other(value) => value.as_str(),
        }
    }
}

impl From<&str> for Provider {
    fn from(value: &str) -> Self {
        match value {
            "aws" => Provider::Aws,
            "ncp" => Provider::Ncp,
            "gcp" => Provider::Gcp,
            "on-premise" => Provider::OnPremise,
            other => Provider::Other(other.to_string()),
        }
    }
}

impl From<String> for Provider {
    fn from(value: String) -> Self {
        Provider::from(value.as_str())
    }
}

impl From<Provider> for String {
    fn from(value: Provider) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
