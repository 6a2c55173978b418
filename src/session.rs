use crate::config::Config;

/// The authenticated user for the lifetime of the process. The token is
/// private so nothing outside the HTTP layer can leak it into the UI.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_name: String,
    pub user_email: String,
    token: String,
    pub push_token: Option<String>,
}

impl Session {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_name: config.user_name.clone(),
            user_email: config.user_email.clone(),
            token: config.token.clone(),
            push_token: config.push_token.clone(),
        }
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        toml::from_str(
            r#"
            api_url = "https://api.example.com"
            token = "jwt-abc"
            user_name = "Ana"
            user_email = "ana@example.com"
            push_token = "ExponentPushToken[xyz]"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_session_from_config() {
        let session = Session::from_config(&config());
        assert_eq!(session.user_name, "Ana");
        assert_eq!(session.bearer(), "jwt-abc");
        assert_eq!(
            session.push_token.as_deref(),
            Some("ExponentPushToken[xyz]")
        );
    }
}
