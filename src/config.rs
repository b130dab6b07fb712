use serde::Deserialize;

const DEFAULT_JWT_SECRET: &str = "super-secret-key-change-in-production";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gateway_port: u16,
    pub auth_port: u16,
    pub profile_port: u16,
    pub product_port: u16,
    pub inventory_port: u16,

    /// Base URLs other services (and the gateway) use to reach each backend.
    pub auth_service_url: String,
    pub profile_service_url: String,
    pub product_service_url: String,
    pub inventory_service_url: String,

    /// HS256 signing secret for issued credentials.
    pub jwt_secret: String,
    /// Credential time-to-live in seconds.
    pub token_ttl_secs: i64,
}

fn env_port(name: &str, default: u16) -> u16 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_url(name: &str, default_port: u16) -> String {
    std::env::var(name).unwrap_or_else(|_| format!("http://localhost:{default_port}"))
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.into());
    if jwt_secret == DEFAULT_JWT_SECRET {
        tracing::warn!(
            "JWT_SECRET is not set — using the insecure development default. \
             Set a real secret before exposing these services."
        );
    }

    let gateway_port = env_port("GATEWAY_PORT", 3000);
    let auth_port = env_port("AUTH_PORT", 3001);
    let profile_port = env_port("PROFILE_PORT", 3002);
    let product_port = env_port("PRODUCT_PORT", 3003);
    let inventory_port = env_port("INVENTORY_PORT", 3004);

    Ok(Config {
        gateway_port,
        auth_port,
        profile_port,
        product_port,
        inventory_port,
        auth_service_url: env_url("AUTH_SERVICE_URL", auth_port),
        profile_service_url: env_url("PROFILE_SERVICE_URL", profile_port),
        product_service_url: env_url("PRODUCT_SERVICE_URL", product_port),
        inventory_service_url: env_url("INVENTORY_SERVICE_URL", inventory_port),
        jwt_secret,
        token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600),
    })
}
