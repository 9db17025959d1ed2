//! Configuration loader
//!
//! Loads application configuration from environment variables. A `.env`
//! file in the working directory is honored when present.
//!
//! ## Environment Variables
//! Required:
//! - `TESSERA_STORE_URL`, `TESSERA_STORE_ADMIN_SECRET`
//! - `TESSERA_CLASSIFIER_URL`
//! - `TESSERA_BLOB_URL`, `TESSERA_BLOB_BUCKET`
//! - `TESSERA_SOLVER_URL`, `TESSERA_SOLVER_USERNAME`,
//!   `TESSERA_SOLVER_PASSWORD`, `TESSERA_SOLVER_CALLBACK_URL`
//!
//! Optional (with defaults):
//! - `TESSERA_BLOB_API_KEY`
//! - `TESSERA_CLASSIFIER_MIN_SCORE`
//! - `TESSERA_SOLVER_SHORT_DURATION_SECS`, `TESSERA_SOLVER_DURATION_SECS`
//! - `TESSERA_CONCURRENCY`, `TESSERA_HTTP_TIMEOUT_SECS`,
//!   `TESSERA_HTTP_MAX_ATTEMPTS`

use std::str::FromStr;

use tessera_domain::{
    BlobConfig, ClassifierConfig, Config, PipelineConfig, Result, SolverConfig, StoreConfig,
    TesseraError,
};

/// Load configuration, honoring a `.env` file when present.
pub fn load() -> Result<Config> {
    // Absence of a .env file is not an error
    let _ = dotenvy::dotenv();
    let config = load_from_env()?;
    tracing::info!("configuration loaded from environment");
    Ok(config)
}

/// Load configuration from environment variables only.
///
/// # Errors
/// Returns `TesseraError::Config` when a required variable is missing or a
/// numeric variable fails to parse.
pub fn load_from_env() -> Result<Config> {
    let store = StoreConfig {
        base_url: env_var("TESSERA_STORE_URL")?,
        admin_secret: env_var("TESSERA_STORE_ADMIN_SECRET")?,
    };

    let mut classifier = ClassifierConfig::new(env_var("TESSERA_CLASSIFIER_URL")?);
    if let Some(min_score) = env_opt("TESSERA_CLASSIFIER_MIN_SCORE")? {
        classifier.min_score = min_score;
    }

    let blob = BlobConfig {
        base_url: env_var("TESSERA_BLOB_URL")?,
        bucket: env_var("TESSERA_BLOB_BUCKET")?,
        api_key: std::env::var("TESSERA_BLOB_API_KEY").ok(),
    };

    let mut solver = SolverConfig::new(
        env_var("TESSERA_SOLVER_URL")?,
        env_var("TESSERA_SOLVER_USERNAME")?,
        env_var("TESSERA_SOLVER_PASSWORD")?,
        env_var("TESSERA_SOLVER_CALLBACK_URL")?,
    );
    if let Some(short) = env_opt("TESSERA_SOLVER_SHORT_DURATION_SECS")? {
        solver.short_duration_secs = short;
    }
    if let Some(long) = env_opt("TESSERA_SOLVER_DURATION_SECS")? {
        solver.duration_secs = long;
    }

    let mut pipeline = PipelineConfig::default();
    if let Some(concurrency) = env_opt("TESSERA_CONCURRENCY")? {
        pipeline.concurrency = concurrency;
    }
    if let Some(timeout) = env_opt("TESSERA_HTTP_TIMEOUT_SECS")? {
        pipeline.http_timeout_secs = timeout;
    }
    if let Some(attempts) = env_opt("TESSERA_HTTP_MAX_ATTEMPTS")? {
        pipeline.http_max_attempts = attempts;
    }

    Ok(Config { store, classifier, blob, solver, pipeline })
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| TesseraError::Config(format!("missing environment variable {name}")))
}

fn env_opt<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|err| TesseraError::Config(format!("invalid {name}: {err}"))),
        Err(_) => Ok(None),
    }
}
