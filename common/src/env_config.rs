use std::{env, sync::Arc, time::Duration};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to initialize and run the marketplace service:
/// database connection details, JWT configuration, server binding,
/// CORS, logging, billing webhook secret, rate limits and the
/// web-vitals reporter settings.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// File the logger mirrors its output to.
    pub log_file: String,
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,
    /// Requests per second accepted across the whole server.
    pub global_rate_limit: u32,
    /// Downloads per minute accepted for a single user.
    pub download_rate_limit_per_minute: u32,
    /// Web-vitals reporter settings.
    pub metrics: MetricsConfig,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign JWTs and
/// the expiration time in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in hours.
    pub expiration_hours: i64,
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Flush as soon as this many metrics are buffered.
    pub batch_size: usize,
    /// Flush whatever is buffered at this interval.
    pub flush_interval: Duration,
    /// Capacity of the ingest queue.
    pub queue_capacity: usize,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// - `JWT_SECRET`: Required. The secret key for JWT signing.
    /// - `JWT_EXPIRATION_HOURS`: Optional. Defaults to 24 hours if not provided.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or `JWT_EXPIRATION_HOURS` is not a number.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        JwtConfig {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
        }
    }
}

impl MetricsConfig {
    pub fn from_env() -> Self {
        let batch_size = env_or("METRICS_BATCH_SIZE", 50usize).max(1);
        MetricsConfig {
            batch_size,
            flush_interval: Duration::from_secs(env_or("METRICS_FLUSH_SECS", 10u64).max(1)),
            queue_capacity: env_or("METRICS_QUEUE_CAPACITY", batch_size * 20),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: `development` or `production`
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT signing (via `JwtConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `LOG_FILE`: Log file path (default: "marketplace.log")
    /// - `STRIPE_WEBHOOK_SECRET`: Stripe webhook signing secret (default: empty)
    /// - `GLOBAL_RATE_LIMIT`: Requests per second (default: 50)
    /// - `DOWNLOAD_RATE_LIMIT_PER_MINUTE`: Downloads per user per minute (default: 10)
    /// - `METRICS_BATCH_SIZE`, `METRICS_FLUSH_SECS`, `METRICS_QUEUE_CAPACITY`
    ///
    /// # Panics
    ///
    /// Panics if required environment variables are missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env_or("PORT", 8080),
            num_workers: env_or("WORKERS", 4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "marketplace.log".to_string()),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            global_rate_limit: env_or("GLOBAL_RATE_LIMIT", 50u32).max(1),
            download_rate_limit_per_minute: env_or("DOWNLOAD_RATE_LIMIT_PER_MINUTE", 10u32).max(1),
            metrics: MetricsConfig::from_env(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
