pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, ConsistencyLevel, DatabaseConfig, GeneralConfig, ListPolicy, ListingConfig,
    LoggingConfig,
};
pub use envconfig::EnvConfig;
