use serde::{Deserialize, Serialize};

/// QQ Mini Program AppID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("AppId must not be empty".to_string());
        }
        if id.chars().any(char::is_whitespace) {
            return Err(format!("AppId must not contain whitespace, got {:?}", id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// QQ Mini Program AppSecret
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppSecret(String);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, String> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err("AppSecret must not be empty".to_string());
        }
        Ok(Self(secret))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AppSecret([REDACTED])")
    }
}

/// Per-user identifier under a single Mini Program
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpenId(String);

impl OpenId {
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("OpenId must not be empty".to_string());
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// QQ Access Token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, String> {
        let token = token.into();
        if token.is_empty() {
            return Err("AccessToken must not be empty".to_string());
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_valid() {
        let app_id = AppId::new("1110797565").unwrap();
        assert_eq!(app_id.as_str(), "1110797565");
    }

    #[test]
    fn test_app_id_empty() {
        assert!(AppId::new("").is_err());
    }

    #[test]
    fn test_app_id_whitespace() {
        let result = AppId::new("1110 797565");
        assert!(result.unwrap_err().contains("whitespace"));
    }

    #[test]
    fn test_app_secret_valid() {
        let app_secret = AppSecret::new("abc123").unwrap();
        assert_eq!(app_secret.as_str(), "abc123");
    }

    #[test]
    fn test_app_secret_empty() {
        assert!(AppSecret::new("").is_err());
    }

    #[test]
    fn test_app_secret_debug_is_redacted() {
        let app_secret = AppSecret::new("super_secret").unwrap();
        let debug = format!("{:?}", app_secret);
        assert!(!debug.contains("super_secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_open_id() {
        let open_id = OpenId::new("O1").unwrap();
        assert_eq!(open_id.as_str(), "O1");
        assert_eq!(open_id.into_inner(), "O1");
        assert!(OpenId::new("").is_err());
    }

    #[test]
    fn test_access_token() {
        let token = AccessToken::new("token1234567890abcdef").unwrap();
        assert_eq!(token.as_str(), "token1234567890abcdef");
        assert!(AccessToken::new("").is_err());
    }
}
