use std::{sync::Arc, time::Duration};

use anyhow::{Result, bail};
use async_trait::async_trait;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session_builder::SessionBuilder;
use scylla::statement::Consistency;

use super::registry::{StoreProvider, StoreProviderId};
use crate::{
    config::{ConsistencyLevel, DatabaseConfig},
    db::{ScyllaTodoStore, TodoStore},
};

const DEFAULT_CQL_PORT: u16 = 9042;
const DEFAULT_KEYSPACE: &str = "todo";

/// Contact points and keyspace parsed from
/// `scylla://host[:port][,host[:port]...][/keyspace]`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ScyllaTarget {
    pub nodes: Vec<String>,
    pub keyspace: String,
}

pub(crate) fn parse_url(url: &str) -> Result<ScyllaTarget> {
    let Some((_, rest)) = url.trim().split_once("://") else {
        bail!("scylla url must look like scylla://host:port/keyspace");
    };
    let (hosts, keyspace) = rest.split_once('/').unwrap_or((rest, ""));

    let nodes: Vec<String> = hosts
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(|host| {
            if host.contains(':') {
                host.to_string()
            } else {
                format!("{host}:{DEFAULT_CQL_PORT}")
            }
        })
        .collect();
    if nodes.is_empty() {
        bail!("scylla url must name at least one contact point");
    }

    let keyspace = keyspace.trim_matches('/');
    let keyspace = if keyspace.is_empty() {
        DEFAULT_KEYSPACE
    } else {
        keyspace
    };

    Ok(ScyllaTarget {
        nodes,
        keyspace: keyspace.to_string(),
    })
}

fn consistency(level: ConsistencyLevel) -> Consistency {
    match level {
        ConsistencyLevel::Any => Consistency::Any,
        ConsistencyLevel::One => Consistency::One,
        ConsistencyLevel::Two => Consistency::Two,
        ConsistencyLevel::Three => Consistency::Three,
        ConsistencyLevel::Quorum => Consistency::Quorum,
        ConsistencyLevel::All => Consistency::All,
        ConsistencyLevel::LocalQuorum => Consistency::LocalQuorum,
        ConsistencyLevel::EachQuorum => Consistency::EachQuorum,
        ConsistencyLevel::LocalOne => Consistency::LocalOne,
    }
}

pub struct ScyllaStoreProvider;

#[async_trait]
impl StoreProvider for ScyllaStoreProvider {
    fn id(&self) -> StoreProviderId {
        StoreProviderId::Scylla
    }

    fn supports_url(&self, url: &str) -> bool {
        let normalized = url.trim().to_ascii_lowercase();
        normalized.starts_with("scylla://") || normalized.starts_with("cassandra://")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<Arc<dyn TodoStore>> {
        let target = parse_url(&cfg.url)?;
        tracing::info!(
            nodes = ?target.nodes,
            keyspace = %target.keyspace,
            consistency = ?cfg.consistency,
            "opening scylla session"
        );

        let profile = ExecutionProfile::builder()
            .consistency(consistency(cfg.consistency))
            .build();

        let session = SessionBuilder::new()
            .known_nodes(&target.nodes)
            .connection_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .default_execution_profile_handle(profile.into_handle())
            .use_keyspace(&target.keyspace, false)
            .build()
            .await?;

        let store = ScyllaTodoStore::new(session).await?;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::{ScyllaTarget, parse_url};

    #[test]
    fn parses_nodes_and_keyspace() {
        let target = parse_url("scylla://node-1:9042,node-2:19042/todo_prod")
            .expect("url should parse");

        assert_eq!(
            target,
            ScyllaTarget {
                nodes: vec!["node-1:9042".to_string(), "node-2:19042".to_string()],
                keyspace: "todo_prod".to_string(),
            }
        );
    }

    #[test]
    fn fills_in_default_port_and_keyspace() {
        let target = parse_url("cassandra://scylla").expect("url should parse");

        assert_eq!(target.nodes, vec!["scylla:9042".to_string()]);
        assert_eq!(target.keyspace, "todo");
    }

    #[test]
    fn rejects_url_without_contact_points() {
        let err = parse_url("scylla:///todo").expect_err("empty host list should fail");
        assert!(err.to_string().contains("contact point"));
    }

    #[test]
    fn rejects_url_without_scheme_separator() {
        assert!(parse_url("scylla").is_err());
    }
}
