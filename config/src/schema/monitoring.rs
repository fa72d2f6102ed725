use crate::field::{ConfigSchema, FieldSpec};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sentry error reporting target.
///
/// `key` is the public DSN key and is masked when printed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Sentry {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(length(min = 1))]
    pub key: String,
}

impl ConfigSchema for Sentry {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("host").env("SENTRY_HOST").required(),
            FieldSpec::string("key").env("SENTRY_KEY").required().secret(),
        ]
    }
}
