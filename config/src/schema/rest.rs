//! # REST Server Settings
//!
//! HTTP listener settings plus the middleware sections a REST server usually
//! wires in: compression, CORS, TLS, profiling endpoints, rate limiting,
//! security headers and static file mounts.

use crate::field::{ConfigSchema, FieldSpec, ValueKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// HTTP server settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Listener address, request and shutdown timeouts, URL layout and the
/// nested middleware sections. Every scalar has a default; `base_url` is
/// optional.
///
/// ## Fields
/// - `host` / `port`: Listen address (default: 0.0.0.0:8080)
/// - `read_timeout` / `write_timeout` / `idle_timeout`: Connection timeouts
/// - `handler_timeout`: Per-request handler budget (default: 15s)
/// - `shutdown_timeout`: Graceful shutdown budget (default: 15s)
/// - `base_url`: Public base URL for generated links, written as `baseURL`
/// - `base_path`: Route prefix (default: "/")
/// - `max_request_body_size`: Body limit in bytes (default: 10MB)
/// - `static_files`: Static file mounts, each with its own defaults
/// - `trusted_proxies`: Proxy CIDRs trusted for client addresses
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rest {
    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    #[serde(with = "crate::duration")]
    pub read_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub write_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub idle_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub handler_timeout: Duration,

    #[serde(with = "crate::duration")]
    pub shutdown_timeout: Duration,

    #[serde(rename = "baseURL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[validate(custom(function = "validate_path_prefix"))]
    pub base_path: String,

    pub max_request_body_size: u64,

    #[validate(nested)]
    pub compression: RestCompression,

    #[validate(nested)]
    pub cors: RestCors,

    #[validate(nested)]
    pub tls: RestTls,

    #[validate(nested)]
    pub profiling: RestProfiling,

    #[validate(nested)]
    pub rate_limit: RestRateLimit,

    #[validate(nested)]
    pub security_headers: RestSecurityHeaders,

    #[validate(nested)]
    pub static_files: Vec<RestStaticFiles>,

    pub trusted_proxies: Vec<String>,
}

fn validate_path_prefix(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("Path must start with /"))
    }
}

impl ConfigSchema for Rest {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("host").env("REST_HOST").default("0.0.0.0"),
            FieldSpec::integer("port").env("REST_PORT").default("8080"),
            FieldSpec::duration("readTimeout").env("REST_READ_TIMEOUT").default("10s"),
            FieldSpec::duration("writeTimeout").env("REST_WRITE_TIMEOUT").default("10s"),
            FieldSpec::duration("idleTimeout").env("REST_IDLE_TIMEOUT").default("60s"),
            FieldSpec::duration("handlerTimeout")
                .env("REST_HANDLER_TIMEOUT")
                .default("15s"),
            FieldSpec::duration("shutdownTimeout")
                .env("REST_SHUTDOWN_TIMEOUT")
                .default("15s"),
            FieldSpec::string("baseURL").env("REST_BASE_URL"),
            FieldSpec::string("basePath").env("REST_BASE_PATH").default("/"),
            FieldSpec::integer("maxRequestBodySize")
                .env("REST_MAX_REQUEST_BODY_SIZE")
                .default("10485760"),
            FieldSpec::nested("compression", RestCompression::fields),
            FieldSpec::nested("cors", RestCors::fields),
            FieldSpec::nested("tls", RestTls::fields),
            FieldSpec::nested("profiling", RestProfiling::fields),
            FieldSpec::nested("rateLimit", RestRateLimit::fields),
            FieldSpec::nested("securityHeaders", RestSecurityHeaders::fields),
            FieldSpec::nested_list("staticFiles", RestStaticFiles::fields),
            FieldSpec::list("trustedProxies", ValueKind::String).env("REST_TRUSTED_PROXIES"),
        ]
    }
}

/// Response compression. Level -1 selects the encoder's default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct RestCompression {
    pub enabled: bool,

    #[validate(range(min = -1, max = 9))]
    pub level: i32,
}

impl ConfigSchema for RestCompression {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled")
                .env("REST_COMPRESSION_ENABLED")
                .default("false"),
            FieldSpec::integer("level").env("REST_COMPRESSION_LEVEL").default("-1"),
        ]
    }
}

/// Cross-origin resource sharing policy.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestCors {
    pub enabled: bool,

    /// Empty allows none; `["*"]` allows every origin
    pub allowed_origins: Vec<String>,

    pub allowed_methods: Vec<String>,

    pub allowed_headers: Vec<String>,

    pub exposed_headers: Vec<String>,

    pub allow_credentials: bool,

    #[serde(with = "crate::duration")]
    pub max_age: Duration,

    pub options_passthrough: bool,

    pub debug: bool,
}

impl ConfigSchema for RestCors {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled").env("REST_CORS_ENABLED").default("false"),
            FieldSpec::list("allowedOrigins", ValueKind::String)
                .env("REST_CORS_ALLOWED_ORIGINS")
                .default(""),
            FieldSpec::list("allowedMethods", ValueKind::String)
                .env("REST_CORS_ALLOWED_METHODS")
                .default("GET,POST,PUT,DELETE,OPTIONS"),
            FieldSpec::list("allowedHeaders", ValueKind::String)
                .env("REST_CORS_ALLOWED_HEADERS")
                .default("Origin,Content-Type,Accept,Authorization"),
            FieldSpec::list("exposedHeaders", ValueKind::String)
                .env("REST_CORS_EXPOSED_HEADERS")
                .default(""),
            FieldSpec::boolean("allowCredentials")
                .env("REST_CORS_ALLOW_CREDENTIALS")
                .default("false"),
            FieldSpec::duration("maxAge").env("REST_CORS_MAX_AGE").default("300s"),
            FieldSpec::boolean("optionsPassthrough")
                .env("REST_CORS_OPTIONS_PASSTHROUGH")
                .default("false"),
            FieldSpec::boolean("debug").env("REST_CORS_DEBUG").default("false"),
        ]
    }
}

/// TLS termination, either from files or through automatic certificates.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestTls {
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,

    pub auto_cert: bool,

    pub auto_cert_cache_dir: String,

    pub auto_cert_host_whitelist: Vec<String>,
}

impl ConfigSchema for RestTls {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled").env("REST_TLS_ENABLED").default("false"),
            FieldSpec::string("certFile").env("REST_TLS_CERT_FILE"),
            FieldSpec::string("keyFile").env("REST_TLS_KEY_FILE"),
            FieldSpec::boolean("autoCert").env("REST_TLS_AUTO_CERT").default("false"),
            FieldSpec::string("autoCertCacheDir")
                .env("REST_TLS_AUTO_CERT_CACHE_DIR")
                .default(".autocert"),
            FieldSpec::list("autoCertHostWhitelist", ValueKind::String)
                .env("REST_TLS_AUTO_CERT_HOST_WHITELIST")
                .default(""),
        ]
    }
}

/// Profiling endpoints mounted under `prefix`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct RestProfiling {
    pub enabled: bool,

    #[validate(custom(function = "validate_path_prefix"))]
    pub prefix: String,
}

impl ConfigSchema for RestProfiling {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled").env("REST_PROFILING_ENABLED").default("false"),
            FieldSpec::string("prefix")
                .env("REST_PROFILING_PREFIX")
                .default("/debug/pprof"),
        ]
    }
}

/// Per-client token bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestRateLimit {
    pub enabled: bool,

    /// Requests per second
    #[validate(range(min = 0.0))]
    pub rps: f64,

    pub burst: u32,

    #[serde(with = "crate::duration")]
    pub cleanup_interval: Duration,
}

impl ConfigSchema for RestRateLimit {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled")
                .env("REST_RATE_LIMIT_ENABLED")
                .default("false"),
            FieldSpec::float("rps").env("REST_RATE_LIMIT_RPS").default("100"),
            FieldSpec::integer("burst").env("REST_RATE_LIMIT_BURST").default("20"),
            FieldSpec::duration("cleanupInterval")
                .env("REST_RATE_LIMIT_CLEANUP_INTERVAL")
                .default("1m"),
        ]
    }
}

/// Response security headers.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestSecurityHeaders {
    pub enabled: bool,

    pub hsts_max_age_seconds: u64,

    pub hsts_include_subdomains: bool,

    pub hsts_preload: bool,

    pub content_type_nosniff: bool,

    #[validate(custom(function = "validate_frame_options"))]
    pub frame_options: String,

    pub xss_protection: String,

    pub content_security_policy: String,

    pub referrer_policy: String,

    pub permissions_policy: String,
}

fn validate_frame_options(value: &str) -> Result<(), ValidationError> {
    match value {
        "DENY" | "SAMEORIGIN" => Ok(()),
        _ => Err(ValidationError::new("frameOptions must be DENY or SAMEORIGIN")),
    }
}

impl ConfigSchema for RestSecurityHeaders {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled")
                .env("REST_SECURITY_HEADERS_ENABLED")
                .default("true"),
            FieldSpec::integer("hstsMaxAgeSeconds")
                .env("REST_SECURITY_HEADERS_HSTS_MAX_AGE_SECONDS")
                .default("31536000"),
            FieldSpec::boolean("hstsIncludeSubdomains")
                .env("REST_SECURITY_HEADERS_HSTS_INCLUDE_SUBDOMAINS")
                .default("true"),
            FieldSpec::boolean("hstsPreload")
                .env("REST_SECURITY_HEADERS_HSTS_PRELOAD")
                .default("false"),
            FieldSpec::boolean("contentTypeNosniff")
                .env("REST_SECURITY_HEADERS_CONTENT_TYPE_NOSNIFF")
                .default("true"),
            FieldSpec::string("frameOptions")
                .env("REST_SECURITY_HEADERS_FRAME_OPTIONS")
                .default("SAMEORIGIN"),
            FieldSpec::string("xssProtection")
                .env("REST_SECURITY_HEADERS_XSS_PROTECTION")
                .default("0"),
            FieldSpec::string("contentSecurityPolicy")
                .env("REST_SECURITY_HEADERS_CONTENT_SECURITY_POLICY")
                .default("default-src 'self'"),
            FieldSpec::string("referrerPolicy")
                .env("REST_SECURITY_HEADERS_REFERRER_POLICY")
                .default("strict-origin-when-cross-origin"),
            FieldSpec::string("permissionsPolicy")
                .env("REST_SECURITY_HEADERS_PERMISSIONS_POLICY")
                .default(""),
        ]
    }
}

/// One static file mount. List elements take defaults but no env overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestStaticFiles {
    pub enabled: bool,

    /// Should end with `/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_root: Option<String>,

    #[serde(rename = "cacheTtl", with = "crate::duration")]
    pub cache_ttl: Duration,

    #[validate(length(min = 1))]
    pub index_file: String,

    /// Serve `index_file` for unknown paths
    pub spa: bool,
}

impl ConfigSchema for RestStaticFiles {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::boolean("enabled").default("false"),
            FieldSpec::string("urlPrefix"),
            FieldSpec::string("fsRoot"),
            FieldSpec::duration("cacheTtl").default("1h"),
            FieldSpec::string("indexFile").default("index.html"),
            FieldSpec::boolean("spa").default("false"),
        ]
    }
}
