//! Client configuration and construction of the signed transport and chat model.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use hunyuan::HunyuanConfig;
//!
//! let config = HunyuanConfig::new("AKIDexample", "secret-key")
//!     .with_region("ap-guangzhou")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_model("hunyuan-lite");
//!
//! let api = hunyuan::build_api(&config).expect("valid credentials");
//! assert_eq!(api.base_url(), "https://hunyuan.tencentcloudapi.com");
//! ```

use std::sync::Arc;
use std::time::Duration;

use hchat::{ChatModel, DEFAULT_MAX_TOOL_ROUNDS};
use hcommon::ChatOptions;
use hprovider::hunyuan::{
    DEFAULT_BASE_URL, DEFAULT_HOST, DEFAULT_MODEL, HunyuanHttpApi, SigningTarget, Tc3Signer,
};
use hprovider::{
    Credentials, NoopOperationHooks, ProviderError, ProviderOperationHooks, RetryPolicy,
    SecretString,
};
use htooling::ToolRuntime;
use reqwest::Client;

pub const ENV_SECRET_ID: &str = "HUNYUAN_SECRET_ID";
pub const ENV_SECRET_KEY: &str = "HUNYUAN_SECRET_KEY";
pub const ENV_BASE_URL: &str = "HUNYUAN_BASE_URL";
pub const ENV_REGION: &str = "HUNYUAN_REGION";
pub const ENV_MODEL: &str = "HUNYUAN_MODEL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Clone)]
pub struct HunyuanConfig {
    pub base_url: String,
    pub host: String,
    pub region: Option<String>,
    pub secret_id: String,
    pub secret_key: SecretString,
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub default_options: ChatOptions,
    pub max_tool_rounds: u32,
    pub operation_hooks: Arc<dyn ProviderOperationHooks>,
}

impl HunyuanConfig {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            region: None,
            secret_id: secret_id.into(),
            secret_key: SecretString::new(secret_key),
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            default_options: ChatOptions::default().with_model(DEFAULT_MODEL),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            operation_hooks: Arc::new(NoopOperationHooks),
        }
    }

    /// Reads credentials and overrides from the process environment.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`HunyuanConfig::from_env`] with an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let secret_id = read(ENV_SECRET_ID).ok_or_else(|| {
            ProviderError::configuration(format!("{ENV_SECRET_ID} is not set"))
        })?;
        let secret_key = read(ENV_SECRET_KEY).ok_or_else(|| {
            ProviderError::configuration(format!("{ENV_SECRET_KEY} is not set"))
        })?;

        let mut config = Self::new(secret_id, secret_key);
        if let Some(base_url) = read(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        if let Some(region) = read(ENV_REGION) {
            config = config.with_region(region);
        }
        if let Some(model) = read(ENV_MODEL) {
            config = config.with_model(model);
        }

        Ok(config)
    }

    /// Points the client at another endpoint. The signed host follows the URL's authority.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if let Some(host) = authority(&base_url) {
            self.host = host.to_string();
        }
        self.base_url = base_url;
        self
    }

    /// Overrides the `Host` header, which is signed and sent as given.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_default_options(mut self, options: ChatOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_options = self.default_options.with_model(model);
        self
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn with_operation_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.operation_hooks = hooks;
        self
    }

    pub fn credentials(&self) -> Result<Credentials, ProviderError> {
        Credentials::new(self.secret_id.trim(), self.secret_key.expose())
    }

    pub fn signing_target(&self) -> SigningTarget {
        let target = SigningTarget::default().with_host(self.host.clone());
        match &self.region {
            Some(region) => target.with_region(region.clone()),
            None => target,
        }
    }
}

impl std::fmt::Debug for HunyuanConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HunyuanConfig")
            .field("base_url", &self.base_url)
            .field("host", &self.host)
            .field("region", &self.region)
            .field("secret_id", &self.secret_id)
            .field("secret_key", &self.secret_key)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .field("default_options", &self.default_options)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish_non_exhaustive()
    }
}

fn authority(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split('/').next()?;
    (!authority.is_empty()).then_some(authority)
}

/// Builds the signed HTTP transport. Fails before any network call on empty credentials.
pub fn build_api(config: &HunyuanConfig) -> Result<HunyuanHttpApi, ProviderError> {
    let signer = Tc3Signer::new(config.credentials()?, config.signing_target());
    let http = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    Ok(HunyuanHttpApi::new(http, signer).with_base_url(config.base_url.clone()))
}

/// Builds the chat orchestrator over [`build_api`] with the configured defaults.
pub fn build_chat_model(
    config: &HunyuanConfig,
    tool_runtime: Arc<dyn ToolRuntime>,
) -> Result<ChatModel, ProviderError> {
    config
        .default_options
        .validate()
        .map_err(ProviderError::configuration)?;
    let api = build_api(config)?;

    Ok(ChatModel::builder(Arc::new(api))
        .default_options(config.default_options.clone())
        .tool_runtime(tool_runtime)
        .retry_policy(config.retry_policy.clone())
        .operation_hooks(Arc::clone(&config.operation_hooks))
        .max_tool_rounds(config.max_tool_rounds)
        .build())
}
