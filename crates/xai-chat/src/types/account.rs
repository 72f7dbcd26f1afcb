//! API key metadata

use std::fmt;

use jiff::Timestamp;

use crate::wire::RawApiKeyInfo;

/// Whether an API key may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyStatus {
    Active,
    /// Disabled by its owner
    Disabled,
    /// Blocked by the service
    Blocked,
    /// The owning team is blocked
    TeamBlocked,
}

impl fmt::Display for ApiKeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Blocked => "blocked",
            Self::TeamBlocked => "team_blocked",
        })
    }
}

/// Metadata of the API key the client authenticates with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyInfo {
    /// Key with all but a short prefix and suffix masked
    pub redacted_key: String,
    pub key_id: String,
    pub name: String,
    pub user_id: String,
    pub team_id: String,
    /// Permissions granted to the key
    pub acls: Vec<String>,
    pub status: ApiKeyStatus,
    pub created_at: Option<Timestamp>,
    pub modified_at: Option<Timestamp>,
    pub modified_by: String,
}

impl ApiKeyInfo {
    pub fn is_active(&self) -> bool {
        self.status == ApiKeyStatus::Active
    }

    /// Whether `acl` was granted verbatim
    pub fn has_acl(&self, acl: &str) -> bool {
        self.acls.iter().any(|granted| granted == acl)
    }
}

impl From<RawApiKeyInfo> for ApiKeyInfo {
    fn from(raw: RawApiKeyInfo) -> Self {
        // disabling outranks a key block, which outranks a team block
        let status = if raw.disabled {
            ApiKeyStatus::Disabled
        } else if raw.api_key_blocked {
            ApiKeyStatus::Blocked
        } else if raw.team_blocked {
            ApiKeyStatus::TeamBlocked
        } else {
            ApiKeyStatus::Active
        };

        Self {
            redacted_key: raw.redacted_api_key,
            key_id: raw.api_key_id,
            name: raw.name,
            user_id: raw.user_id,
            team_id: raw.team_id,
            acls: raw.acls,
            status,
            created_at: raw.create_time.and_then(|secs| Timestamp::from_second(secs).ok()),
            modified_at: raw.modify_time.and_then(|secs| Timestamp::from_second(secs).ok()),
            modified_by: raw.modified_by,
        }
    }
}
