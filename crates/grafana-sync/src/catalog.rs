use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::remote::{Remote, RemoteError};

pub const SEARCH_PATH: &str = "/api/search?query=";
pub const DATASOURCES_PATH: &str = "/api/datasources";
pub const ALERT_NOTIFICATIONS_PATH: &str = "/api/alert-notifications";

/// One hit from the dashboard search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardSummary {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub title: String,
    pub uri: String,
}

/// A datasource as listed by the server.
///
/// The listed item is what gets exported, so the whole object is kept in
/// `raw` with the server's key order and serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct DatasourceSummary {
    pub resource_type: String,
    pub name: String,
    pub raw: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for DatasourceSummary {
    type Error = String;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let field = |key: &str| match raw.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(format!("datasource field `{key}` is not a string")),
            None => Err(format!("missing field `{key}`")),
        };

        Ok(Self {
            resource_type: field("type")?,
            name: field("name")?,
            raw,
        })
    }
}

impl From<DatasourceSummary> for Map<String, Value> {
    fn from(item: DatasourceSummary) -> Self {
        item.raw
    }
}

/// An alert notification channel. Listed only, never exported.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlertChannelSummary {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
}

/// The three kinds of resource the catalog knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Dashboard,
    Datasource,
    Alert,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Datasource => write!(f, "datasource"),
            Self::Alert => write!(f, "alert"),
        }
    }
}

/// A single line of the flat catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: ResourceKind,
    pub resource_type: String,
    pub name: String,
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.kind, self.resource_type, self.name)
    }
}

impl From<&DashboardSummary> for CatalogEntry {
    fn from(item: &DashboardSummary) -> Self {
        Self {
            kind: ResourceKind::Dashboard,
            resource_type: item.resource_type.clone(),
            name: item.title.clone(),
        }
    }
}

impl From<&DatasourceSummary> for CatalogEntry {
    fn from(item: &DatasourceSummary) -> Self {
        Self {
            kind: ResourceKind::Datasource,
            resource_type: item.resource_type.clone(),
            name: item.name.clone(),
        }
    }
}

impl From<&AlertChannelSummary> for CatalogEntry {
    fn from(item: &AlertChannelSummary) -> Self {
        Self {
            kind: ResourceKind::Alert,
            resource_type: item.resource_type.clone(),
            name: item.name.clone(),
        }
    }
}

async fn list<T: DeserializeOwned>(
    remote: &dyn Remote,
    path: &str,
) -> Result<Vec<T>, RemoteError> {
    let body = remote.fetch(path).await?;
    serde_json::from_value(body).map_err(|e| RemoteError::Parse(format!("{path}: {e}")))
}

pub async fn dashboards(remote: &dyn Remote) -> Result<Vec<DashboardSummary>, RemoteError> {
    list(remote, SEARCH_PATH).await
}

pub async fn datasources(remote: &dyn Remote) -> Result<Vec<DatasourceSummary>, RemoteError> {
    list(remote, DATASOURCES_PATH).await
}

pub async fn alert_channels(
    remote: &dyn Remote,
) -> Result<Vec<AlertChannelSummary>, RemoteError> {
    list(remote, ALERT_NOTIFICATIONS_PATH).await
}

/// Read all three catalogs and flatten them, dashboards first, then
/// datasources, then alert channels. Fails on the first remote error.
pub async fn entries(remote: &dyn Remote) -> Result<Vec<CatalogEntry>, RemoteError> {
    let mut all: Vec<CatalogEntry> = dashboards(remote)
        .await?
        .iter()
        .map(CatalogEntry::from)
        .collect();
    all.extend(datasources(remote).await?.iter().map(CatalogEntry::from));
    all.extend(alert_channels(remote).await?.iter().map(CatalogEntry::from));
    Ok(all)
}
