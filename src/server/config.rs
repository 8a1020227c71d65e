use std::env;

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Absolute base for generated short links, e.g. "https://example.com".
    pub public_base_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let public_base_url =
            env::var("PUBLIC_BASE_URL").map_err(|_| "PUBLIC_BASE_URL must be set".to_string())?;

        Ok(ServerConfig {
            bind_addr,
            jwt_secret,
            public_base_url,
        })
    }
}
