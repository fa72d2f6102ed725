use configo::schema::{App, Logger};
use configo::{ConfigSchema, Env, FieldSpec};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Baseline settings every service carries: where it runs, what it is, how
/// it logs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Settings {
    pub env: Env,

    #[validate(nested)]
    pub app: App,

    #[validate(nested)]
    pub logger: Logger,
}

impl ConfigSchema for Settings {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::string("env").env("ENV").default("local"),
            FieldSpec::nested("app", App::fields),
            FieldSpec::nested("logger", Logger::fields),
        ]
    }
}
