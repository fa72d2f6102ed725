use crate::field::{ConfigSchema, FieldSpec};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Relational database connection settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Connection target, credentials, migration source and connect retry policy.
/// Everything except `schema` is required.
///
/// ## Fields
/// - `db_type`: Driver name, written as `type` in files (`DB_TYPE`)
/// - `host` / `port` / `name`: Connection target
/// - `user` / `password`: Credentials; `password` is a secret
/// - `schema`: Search path (default: "public")
/// - `migration_path`: Location of migration files
/// - `max_attempts` / `attempt_delay`: Connect retry policy
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(rename = "type")]
    pub db_type: String,

    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    pub name: String,

    pub user: String,

    pub password: String,

    pub schema: String,

    pub migration_path: String,

    #[validate(range(min = 1))]
    pub max_attempts: u32,

    #[serde(with = "crate::duration")]
    pub attempt_delay: Duration,
}

impl ConfigSchema for Database {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("type").env("DB_TYPE").required(),
            FieldSpec::string("host").env("DB_HOST").required(),
            FieldSpec::integer("port").env("DB_PORT").required(),
            FieldSpec::string("name").env("DB_NAME").required(),
            FieldSpec::string("user").env("DB_USER").required(),
            FieldSpec::string("password")
                .env("DB_PASSWORD")
                .required()
                .secret(),
            FieldSpec::string("schema").env("DB_SCHEMA").default("public"),
            FieldSpec::string("migrationPath").env("DB_MIGRATION_PATH").required(),
            FieldSpec::integer("maxAttempts").env("DB_MAX_ATTEMPTS").required(),
            FieldSpec::duration("attemptDelay").env("DB_ATTEMPT_DELAY").required(),
        ]
    }
}
