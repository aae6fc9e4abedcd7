use grafana_sync::{Remote, RemoteError, SubmitOutcome};
use serde_json::Value;
use tracing::{debug, warn};

/// Connection settings for a Grafana server.
#[derive(Debug, Clone)]
pub struct GrafanaClientConfig {
    /// Server root, e.g. `https://grafana.example.com`. API paths are
    /// appended verbatim.
    pub base_url: String,
    pub bearer: Option<String>,
}

/// [`Remote`] backed by the Grafana HTTP API.
///
/// A single `reqwest::Client` is reused for every call in a run.
pub struct GrafanaClient {
    config: GrafanaClientConfig,
    client: reqwest::Client,
}

impl GrafanaClient {
    pub fn new(config: GrafanaClientConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.bearer {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }
}

fn http_error(path: &str, status: u16, body: String) -> RemoteError {
    RemoteError::Http {
        path: path.to_owned(),
        status,
        body,
    }
}

#[async_trait::async_trait]
impl Remote for GrafanaClient {
    fn label(&self) -> &str {
        &self.config.base_url
    }

    async fn fetch(&self, path: &str) -> Result<Value, RemoteError> {
        debug!("GET {path}");

        let response = self
            .authorize(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            return Err(http_error(path, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(format!("{path}: {e}")))
    }

    async fn submit(
        &self,
        path: &str,
        body: &Value,
        conflict_status: Option<u16>,
    ) -> Result<SubmitOutcome, RemoteError> {
        debug!("POST {path}");

        let response = self
            .authorize(self.client.post(self.url(path)))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if conflict_status == Some(status) {
            warn!("{path} answered {status}: already exists, overriding is not implemented yet");
            return Ok(SubmitOutcome::AlreadyExists);
        }

        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        debug!("{path} answered {status}: {text}");

        if !(200..300).contains(&status) {
            return Err(http_error(path, status, text));
        }

        let body = serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!("{path} answered {status} with a non-JSON body: {e}");
            Value::Null
        });
        Ok(SubmitOutcome::Created(body))
    }
}
