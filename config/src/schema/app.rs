use crate::field::{ConfigSchema, FieldSpec};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Application identity.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Names the running service and its release. Both fields are required.
///
/// ## Fields
/// - `name`: Service name (`APP_NAME`)
/// - `version`: Release version (`APP_VERSION`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct App {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub version: String,
}

impl ConfigSchema for App {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("name").env("APP_NAME").required(),
            FieldSpec::string("version").env("APP_VERSION").required(),
        ]
    }
}
