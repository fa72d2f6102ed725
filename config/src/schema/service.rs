use crate::field::{ConfigSchema, FieldSpec};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Listening port of a plain service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Service {
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
}

impl ConfigSchema for Service {
    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::integer("port").env("SERVICE_PORT").required()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_loader::FileFormat;
    use crate::loader::ConfigLoader;
    use configo_errors::ConfigError;
    use std::collections::HashMap;

    #[test]
    fn test_port_zero_counts_as_missing() {
        let env: HashMap<String, String> = HashMap::new();
        let result = ConfigLoader::with_env(env).load_str::<Service>("port: 0\n", FileFormat::Yaml);
        match result {
            Err(ConfigError::MissingRequired { fields }) => assert_eq!(fields, vec!["port"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_port_from_env() {
        let env: HashMap<String, String> =
            HashMap::from([("SERVICE_PORT".to_string(), "8080".to_string())]);
        let service: Service = ConfigLoader::with_env(env)
            .load_str("", FileFormat::Yaml)
            .unwrap();
        assert_eq!(service, Service { port: 8080 });
        assert!(service.validate().is_ok());
    }

    #[test]
    fn test_port_out_of_range_is_decode_error() {
        let env: HashMap<String, String> = HashMap::new();
        let result = ConfigLoader::with_env(env).load_str::<Service>("port: 70000\n", FileFormat::Yaml);
        assert!(matches!(result, Err(ConfigError::Decode { .. })));
    }
}
