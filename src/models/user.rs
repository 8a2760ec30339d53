//! User principal models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional sections of the user principals response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalField {
    /// Streamer subscription keys
    StreamerSubscriptionKeys,
    /// Streamer connection info
    StreamerConnectionInfo,
    /// Preferences
    Preferences,
    /// Surrogate ids
    SurrogateIds,
}

impl PrincipalField {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalField::StreamerSubscriptionKeys => "streamerSubscriptionKeys",
            PrincipalField::StreamerConnectionInfo => "streamerConnectionInfo",
            PrincipalField::Preferences => "preferences",
            PrincipalField::SurrogateIds => "surrogateIds",
        }
    }
}

/// The authenticated user and the accounts it can reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrincipals {
    /// User id
    pub user_id: String,
    /// Primary account id
    #[serde(default)]
    pub primary_account_id: Option<String>,
    /// Accounts of the user
    #[serde(default)]
    pub accounts: Vec<PrincipalAccount>,
    /// Streamer keys (when requested)
    #[serde(default)]
    pub streamer_subscription_keys: Option<StreamerSubscriptionKeys>,
    /// Remaining fields as returned by the API
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Account summary inside [`UserPrincipals`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalAccount {
    /// Account id
    pub account_id: String,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Account CD domain id
    #[serde(default)]
    pub account_cd_domain_id: Option<String>,
    /// Company code
    #[serde(default)]
    pub company: Option<String>,
    /// Segment code
    #[serde(default)]
    pub segment: Option<String>,
}

/// Keys needed to open a streaming session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamerSubscriptionKeys {
    /// One key per account
    #[serde(default)]
    pub keys: Vec<SubscriptionKey>,
}

/// A streamer subscription key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionKey {
    /// Key value
    pub key: String,
}
