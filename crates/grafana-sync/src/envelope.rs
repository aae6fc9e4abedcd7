use std::fmt;

use serde_json::{Map, Value, json};

use crate::catalog::DatasourceSummary;

pub const DATASOURCE_TAG: &str = "datasource";
pub const DASHBOARD_TAG: &str = "db";

/// Errors raised while reading a local envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("envelope is not a JSON object")]
    NotAnObject,

    #[error("missing `meta` object")]
    MissingMeta,

    #[error("missing `meta.type`")]
    MissingType,

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("missing `{0}` payload")]
    MissingPayload(&'static str),
}

/// Resource kind recorded in `meta.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    Datasource,
    Dashboard,
}

impl EnvelopeKind {
    pub fn parse(tag: &str) -> Result<Self, EnvelopeError> {
        match tag {
            DATASOURCE_TAG => Ok(Self::Datasource),
            DASHBOARD_TAG => Ok(Self::Dashboard),
            other => Err(EnvelopeError::UnsupportedType(other.to_owned())),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Datasource => DATASOURCE_TAG,
            Self::Dashboard => DASHBOARD_TAG,
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A decoded local file.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The `datasource` payload, as listed by the server.
    Datasource(Value),
    /// The whole exported dashboard document with `meta` removed. Always
    /// holds a `dashboard` object.
    Dashboard(Map<String, Value>),
}

impl Envelope {
    /// Decode an envelope, checking `meta.type` and the matching payload.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut doc) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let kind = match doc.get("meta") {
            Some(Value::Object(meta)) => match meta.get("type") {
                Some(Value::String(tag)) => EnvelopeKind::parse(tag)?,
                Some(other) => return Err(EnvelopeError::UnsupportedType(other.to_string())),
                None => return Err(EnvelopeError::MissingType),
            },
            _ => return Err(EnvelopeError::MissingMeta),
        };

        match kind {
            EnvelopeKind::Datasource => doc
                .remove("datasource")
                .map(Self::Datasource)
                .ok_or(EnvelopeError::MissingPayload("datasource")),
            EnvelopeKind::Dashboard => {
                if !doc.get("dashboard").is_some_and(Value::is_object) {
                    return Err(EnvelopeError::MissingPayload("dashboard"));
                }
                doc.remove("meta");
                Ok(Self::Dashboard(doc))
            }
        }
    }

    pub fn kind(&self) -> EnvelopeKind {
        match self {
            Self::Datasource(_) => EnvelopeKind::Datasource,
            Self::Dashboard(_) => EnvelopeKind::Dashboard,
        }
    }

    /// The request body for re-creating this resource on a server.
    ///
    /// Dashboards get `id` and `uid` nulled so the server allocates fresh
    /// ones.
    pub fn into_submission(self) -> Value {
        match self {
            Self::Datasource(payload) => payload,
            Self::Dashboard(mut doc) => {
                if let Some(Value::Object(dashboard)) = doc.get_mut("dashboard") {
                    dashboard.insert("id".into(), Value::Null);
                    dashboard.insert("uid".into(), Value::Null);
                }
                Value::Object(doc)
            }
        }
    }
}

/// Wrap a listed datasource for storage.
pub fn wrap_datasource(item: &DatasourceSummary) -> Value {
    json!({
        "meta": { "type": DATASOURCE_TAG },
        "datasource": item,
    })
}
