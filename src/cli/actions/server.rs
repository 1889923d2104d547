use crate::api::{self, AuthConfig};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub session_ttl_seconds: i64,
    pub secure_cookies: bool,
}

impl Args {
    fn auth_config(&self) -> AuthConfig {
        AuthConfig::default()
            .with_session_ttl_seconds(self.session_ttl_seconds)
            .with_session_cookie_secure(self.secure_cookies)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database cannot be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let auth_config = args.auth_config();

    api::new(args.port, &args.dsn, auth_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_follows_args() {
        let args = Args {
            port: 8080,
            dsn: "sqlite::memory:".to_string(),
            session_ttl_seconds: 900,
            secure_cookies: true,
        };
        let config = args.auth_config();
        assert_eq!(config.session_ttl_seconds(), 900);
        assert!(config.session_cookie_secure());
    }
}
