use std::net::SocketAddr;

use crate::error::Error;

/// Server configuration loaded from environment variables.
///
/// | Env Var                  | Default                     |
/// |--------------------------|-----------------------------|
/// | `AGENCY_CMS_MONGODB_URI` | `mongodb://localhost:27017` |
/// | `AGENCY_CMS_DATABASE`    | `agency_cms`                |
/// | `AGENCY_CMS_BIND`        | `127.0.0.1:8080`            |
/// | `AGENCY_CMS_SEED`        | `false`                     |
/// | `RUST_LOG`               | `info`                      |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mongodb_uri: String,
    pub database: String,
    pub bind: SocketAddr,
    /// Drop the database and insert demo data on startup.
    pub seed: bool,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        dotenvy::dotenv().ok();
        Config::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
        let mongodb_uri =
            var("AGENCY_CMS_MONGODB_URI").unwrap_or_else(|| "mongodb://localhost:27017".into());
        let database = var("AGENCY_CMS_DATABASE").unwrap_or_else(|| "agency_cms".into());

        let bind = var("AGENCY_CMS_BIND").unwrap_or_else(|| "127.0.0.1:8080".into());
        let bind = bind.parse().map_err(|_| Error::InvalidConfig {
            variable: "AGENCY_CMS_BIND".into(),
            value: bind.clone(),
        })?;

        let seed = match var("AGENCY_CMS_SEED").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(value) => {
                return Err(Error::InvalidConfig {
                    variable: "AGENCY_CMS_SEED".into(),
                    value: value.into(),
                })
            }
        };

        let log_filter = var("RUST_LOG").unwrap_or_else(|| "info".into());

        Ok(Config {
            mongodb_uri,
            database,
            bind,
            seed,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_suit_local_development() {
        let config = load(&[]).unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "agency_cms");
        assert_eq!(config.bind, "127.0.0.1:8080".parse().unwrap());
        assert!(!config.seed);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("AGENCY_CMS_DATABASE", "staging"),
            ("AGENCY_CMS_BIND", "0.0.0.0:3000"),
            ("AGENCY_CMS_SEED", "true"),
        ])
        .unwrap();

        assert_eq!(config.database, "staging");
        assert_eq!(config.bind.port(), 3000);
        assert!(config.seed);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert_eq!(
            load(&[("AGENCY_CMS_SEED", "sometimes")]).unwrap_err(),
            Error::InvalidConfig {
                variable: "AGENCY_CMS_SEED".into(),
                value: "sometimes".into()
            }
        );
        assert!(load(&[("AGENCY_CMS_BIND", "localhost")]).is_err());
    }
}
