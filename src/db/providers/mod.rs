mod cql;
mod postgres;
mod registry;
mod sqlite;

use std::sync::Arc;

pub use registry::{StoreProvider, StoreProviderId, StoreProviders};

use self::{
    cql::ScyllaStoreProvider, postgres::PostgresStoreProvider, sqlite::SqliteStoreProvider,
};

pub fn default_registry() -> anyhow::Result<StoreProviders> {
    StoreProviders::new()
        .with_provider(Arc::new(ScyllaStoreProvider))?
        .with_provider(Arc::new(PostgresStoreProvider))?
        .with_provider(Arc::new(SqliteStoreProvider))
}
