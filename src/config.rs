use clap::Parser;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Clone)]
#[command(name = "food-scan-gateway")]
#[command(about = "Proxy that turns food photos into nutrition JSON via Gemini")]
pub struct Args {
    // Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Gemini credential, the scan endpoint fails closed without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    // The single origin allowed to call us from a browser
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:5173")]
    pub allowed_origin: String,

    // Rate limit max requests per window
    #[arg(long, env = "RATE_LIMIT", default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // Request body cap for the scan endpoint (base64 of a 10MiB image fits)
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 16 * 1024 * 1024)]
    pub max_body_bytes: usize,

    // Upstream timeout in seconds, unset means wait as long as the platform allows
    #[arg(long, env = "UPSTREAM_TIMEOUT")]
    pub upstream_timeout: Option<u64>,
}

impl Args {
    // Credential with surrounding whitespace removed; blank counts as missing
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
