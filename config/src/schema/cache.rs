use crate::field::{ConfigSchema, FieldSpec};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Redis connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Redis {
    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    /// Logical database index
    pub db: u32,
}

impl ConfigSchema for Redis {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("host").env("REDIS_HOST").required(),
            FieldSpec::integer("port").env("REDIS_PORT").required(),
            FieldSpec::integer("db").env("REDIS_DB").default("0"),
        ]
    }
}
