use serde::{Deserialize, Serialize};

/// Claims carried by finly tokens.
///
/// Access and refresh tokens share this shape; the token class is
/// determined by which secret signed it, not by the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,

    /// Token issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Token expiration (Unix timestamp, seconds)
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_claims_serde() {
        let claims = TokenClaims {
            sub: "a2c2dbe2-6f4f-4a43-9c32-0c1e35c9f8aa".to_string(),
            iat: 1735603200,
            exp: 1735604100,
        };

        let json = serde_json::to_string(&claims).unwrap();
        let parsed: TokenClaims = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.sub, claims.sub);
        assert_eq!(parsed.iat, 1735603200);
        assert_eq!(parsed.exp, 1735604100);
    }
}
