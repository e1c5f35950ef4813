use std::env;

// Development fallback. Any real deployment overrides this through TOKEN_SECRET.
const DEFAULT_TOKEN_SECRET: &str = "taskhaven-secret-key-32-characters!!";

pub struct Config {
    pub token_secret: String,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            token_secret: env::var("TOKEN_SECRET")
                .unwrap_or_else(|_| DEFAULT_TOKEN_SECRET.to_string()),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("TOKEN_TTL_HOURS must be a number"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            token_ttl_hours: 24,
        }
    }
}
