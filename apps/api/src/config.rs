use anyhow::{bail, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Object storage settings for salary proofs.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Database and S3 are optional; without them the service keeps reports and
/// proofs in memory.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub s3: Option<S3Config>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
    /// Browser origins allowed by CORS. Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            s3: s3_from_env()?,
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_allowed_origins: optional_env("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origin_list(&v))
                .unwrap_or_default(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            s3: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 8080,
            rust_log: "info".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Comma-separated origins, e.g. `https://unsan.kr, http://localhost:5173`.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

const S3_KEYS: [&str; 4] = [
    "S3_BUCKET",
    "S3_ENDPOINT",
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
];

/// All four S3 variables or none of them.
fn s3_from_env() -> Result<Option<S3Config>> {
    s3_from_lookup(optional_env)
}

fn s3_from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Option<S3Config>> {
    let missing: Vec<&str> = S3_KEYS.iter().copied().filter(|k| get(k).is_none()).collect();

    match (
        get("S3_BUCKET"),
        get("S3_ENDPOINT"),
        get("AWS_ACCESS_KEY_ID"),
        get("AWS_SECRET_ACCESS_KEY"),
    ) {
        (None, None, None, None) => Ok(None),
        (Some(bucket), Some(endpoint), Some(access_key_id), Some(secret_access_key)) => {
            Ok(Some(S3Config {
                bucket,
                endpoint,
                region: get("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id,
                secret_access_key,
            }))
        }
        _ => bail!("Incomplete S3 configuration, missing: {}", missing.join(", ")),
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
