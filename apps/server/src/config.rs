use std::{net::SocketAddr, time::Duration};

use crate::auth::{decode_secret_key, AuthConfig};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub uploads_dir: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub auth: Option<AuthConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("OB_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid OB_LISTEN_ADDR");
        let db_path = std::env::var("OB_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let uploads_dir = std::env::var("OB_UPLOADS_DIR").unwrap_or_else(|_| "./uploads".into());
        let cors_allow = std::env::var("OB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("OB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let auth = match std::env::var("OB_AUTH_PASSWORD_HASH") {
            Ok(password_hash) if !password_hash.trim().is_empty() => {
                let secret = std::env::var("OB_SECRET_KEY")
                    .expect("OB_SECRET_KEY is required when OB_AUTH_PASSWORD_HASH is set");
                let jwt_secret = decode_secret_key(&secret).expect("Invalid OB_SECRET_KEY");
                let ttl_secs: u64 = std::env::var("OB_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "43200".into())
                    .parse()
                    .unwrap_or(43200);
                Some(AuthConfig {
                    password_hash,
                    jwt_secret,
                    access_token_ttl: Duration::from_secs(ttl_secs),
                })
            }
            _ => None,
        };

        Self {
            listen_addr,
            db_path,
            uploads_dir,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            auth,
        }
    }
}
