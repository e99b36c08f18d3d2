use clap::Parser;
use std::{env, fmt};
use thiserror::Error;

pub const ACCOUNT_ID_VAR: &str = "R2_ACCOUNT_ID";
pub const ACCESS_ID_VAR: &str = "R2_ACCESS_ID";
pub const ACCESS_SECRET_VAR: &str = "R2_ACCESS_SECRET";
pub const BUCKET_NAME_VAR: &str = "R2_BUCKET_NAME";
pub const HEARTBEAT_URL_VAR: &str = "UPTIME_HEARTBEAT";

pub const DEFAULT_BUCKET: &str = "my-bucket";
pub const DEFAULT_REGION: &str = "auto";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable `{0}` is not set")]
    MissingVar(&'static str),
}

/// Variable lookup against the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Centralized run configuration.
/// Combines environment variables and CLI arguments; CLI values win.
#[derive(Clone)]
pub struct AppConfig {
    pub account_id: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub force_path_style: bool,
    pub heartbeat_url: Option<String>,
    pub dry_run: bool,
}

/// Command-line configuration.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove duplicate and expired objects from an R2 bucket"
)]
pub struct Args {
    /// Bucket to sweep (overrides R2_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Storage endpoint (overrides the endpoint derived from R2_ACCOUNT_ID)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Signing region
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    #[arg(long)]
    pub force_path_style: bool,

    /// Log what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl AppConfig {
    /// Build the config from CLI args and an arbitrary variable lookup.
    ///
    /// Empty values count as missing. Fails on the first missing credential,
    /// checked in the order account id, access id, access secret.
    pub fn from_args_with<F>(args: Args, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let account_id = require(ACCOUNT_ID_VAR)?;
        let access_key_id = require(ACCESS_ID_VAR)?;
        let access_key_secret = require(ACCESS_SECRET_VAR)?;

        let bucket = args
            .bucket
            .or_else(|| get(BUCKET_NAME_VAR))
            .unwrap_or_else(|| DEFAULT_BUCKET.into());

        Ok(Self {
            account_id,
            access_key_id,
            access_key_secret,
            bucket,
            endpoint: args.endpoint,
            region: args.region,
            force_path_style: args.force_path_style,
            heartbeat_url: get(HEARTBEAT_URL_VAR),
            dry_run: args.dry_run,
        })
    }

    /// Storage endpoint: the explicit override, or the account's R2 host.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.r2.cloudflarestorage.com", self.account_id))
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint())
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .field("heartbeat_url", &self.heartbeat_url.is_some())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
