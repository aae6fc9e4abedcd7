use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::{Remote, RemoteError, SubmitOutcome};

/// A POST recorded by [`InMemoryRemote`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub path: String,
    pub body: Value,
    pub conflict_status: Option<u16>,
}

/// In-memory server for testing. Serves canned GET bodies by path and
/// records every POST. Unknown GET paths answer 404; POSTs answer 200
/// unless a status was set for the path.
pub struct InMemoryRemote {
    label: String,
    responses: HashMap<String, Value>,
    submit_statuses: HashMap<String, u16>,
    submissions: Mutex<Vec<Submission>>,
}

impl InMemoryRemote {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            responses: HashMap::new(),
            submit_statuses: HashMap::new(),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&mut self, path: impl Into<String>, body: Value) {
        self.responses.insert(path.into(), body);
    }

    /// Answer every POST to `path` with `status`.
    pub fn submit_status(&mut self, path: impl Into<String>, status: u16) {
        self.submit_statuses.insert(path.into(), status);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Remote for InMemoryRemote {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, path: &str) -> Result<Value, RemoteError> {
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| RemoteError::Http {
                path: path.to_owned(),
                status: 404,
                body: "not found".into(),
            })
    }

    async fn submit(
        &self,
        path: &str,
        body: &Value,
        conflict_status: Option<u16>,
    ) -> Result<SubmitOutcome, RemoteError> {
        if let Ok(mut submissions) = self.submissions.lock() {
            submissions.push(Submission {
                path: path.to_owned(),
                body: body.clone(),
                conflict_status,
            });
        }

        let status = self.submit_statuses.get(path).copied().unwrap_or(200);
        if conflict_status == Some(status) {
            return Ok(SubmitOutcome::AlreadyExists);
        }
        if !(200..300).contains(&status) {
            return Err(RemoteError::Http {
                path: path.to_owned(),
                status,
                body: String::new(),
            });
        }
        Ok(SubmitOutcome::Created(serde_json::json!({"status": "success"})))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn fetch_returns_canned_body() {
        let mut remote = InMemoryRemote::new("test");
        remote.respond("/api/datasources", json!([]));

        assert_eq!(remote.fetch("/api/datasources").await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn submit_records_and_honours_conflict_status() {
        let mut remote = InMemoryRemote::new("test");
        remote.submit_status("/api/dashboards/db", 412);

        let body = json!({"dashboard": {}});
        let outcome = remote
            .submit("/api/dashboards/db", &body, Some(412))
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::AlreadyExists);

        let err = remote
            .submit("/api/dashboards/db", &body, None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(412));

        assert_eq!(remote.submissions().len(), 2);
        assert_eq!(remote.submissions()[0].conflict_status, Some(412));
    }
}
