use crate::field::{ConfigSchema, FieldSpec};
use crate::schema::validate_http_url;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// S3-compatible object storage settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Endpoint, region and credentials for an object store. `proxy_url` is
/// optional and `None` when not configured.
///
/// ## Fields
/// - `endpoint`: Service URL (`S3_ENDPOINT`)
/// - `region`: Region name (`S3_REGION`)
/// - `access_key` / `secret_key`: Credentials, both secrets
/// - `proxy_url`: Optional HTTP proxy (`S3_PROXY_URL`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct S3 {
    #[validate(custom(function = "validate_http_url"))]
    pub endpoint: String,

    pub region: String,

    pub access_key: String,

    pub secret_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_http_url"))]
    pub proxy_url: Option<String>,
}

impl ConfigSchema for S3 {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("endpoint").env("S3_ENDPOINT").required(),
            FieldSpec::string("region").env("S3_REGION").required(),
            FieldSpec::string("accessKey").env("S3_ACCESS_KEY").required().secret(),
            FieldSpec::string("secretKey").env("S3_SECRET_KEY").required().secret(),
            FieldSpec::string("proxyUrl").env("S3_PROXY_URL"),
        ]
    }
}
