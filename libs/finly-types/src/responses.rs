use serde::{Deserialize, Serialize};

/// Token pair returned by login, register, refresh, and the password
/// change endpoints. Field names match the wire format used by the web
/// client (`token` / `refreshToken`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub token: String,
    pub refresh_token: String,
}

/// Public fields of the authenticated user, as returned by `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: Option<String>,
}

/// Error envelope used for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailResponse {
    pub status: String,
    pub message: String,
}

impl FailResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "fail".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_wire_names() {
        let pair = TokenPairResponse {
            token: "acc".to_string(),
            refresh_token: "ref".to_string(),
        };

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["token"], "acc");
        assert_eq!(json["refreshToken"], "ref");
    }

    #[test]
    fn test_fail_response_envelope() {
        let fail = FailResponse::new("Invalid token. Please log in again.");
        let json = serde_json::to_value(&fail).unwrap();

        assert_eq!(json["status"], "fail");
        assert_eq!(json["message"], "Invalid token. Please log in again.");
    }
}
