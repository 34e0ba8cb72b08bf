//! Configuration for the Catalog API

use core_config::{AppInfo, FromEnv, admin::AdminConfig, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();

        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb.app_name = Some(app.name.to_string());
        }

        let server = ServerConfig::from_env()?;
        let admin = AdminConfig::from_env()?;

        Ok(Self {
            app,
            mongodb,
            server,
            admin,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGO_URL", None),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", None),
                ("MONGODB_APP_NAME", None),
                ("APP_ENV", None),
                ("PORT", None),
                ("ADMIN_COOKIE_NAME", None),
                ("ADMIN_COOKIE_VALUE", None),
            ],
            || {
                let config = Config::from_env().unwrap();

                assert_eq!(config.app.name, "catalog_api");
                assert_eq!(config.mongodb.database(), database::mongodb::DEFAULT_DATABASE);
                assert_eq!(config.mongodb.app_name.as_deref(), Some("catalog_api"));
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.admin.cookie_name, "admin_session");
                assert_eq!(config.admin.cookie_value, "true");
                assert_eq!(config.environment, Environment::Development);
            },
        );
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None),
                ("MONGO_URL", Some("mongodb://db:27017")),
                ("MONGO_DATABASE", Some("shop")),
                ("MONGODB_DATABASE", None),
                ("APP_ENV", Some("production")),
                ("PORT", Some("3005")),
                ("ADMIN_COOKIE_NAME", Some("site_admin")),
                ("ADMIN_COOKIE_VALUE", Some("s3cret")),
            ],
            || {
                let config = Config::from_env().unwrap();

                assert_eq!(config.mongodb.url(), "mongodb://db:27017");
                assert_eq!(config.mongodb.database(), "shop");
                assert_eq!(config.server.port, 3005);
                assert_eq!(config.admin.cookie_name, "site_admin");
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_from_env_requires_mongo_url() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL"], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("PORT", Some("not-a-port")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("PORT"));
            },
        );
    }
}
