use serde::Deserialize;

use crate::error::RequestError;

/// Navigation parameters a selection must carry before a job can be started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementQuery {
    pub document_id: String,
    pub workspace_id: String,
    pub element_id: String,
    pub part_id: Option<String>,
}

/// Response to a job-initiation request.
#[derive(Clone, Debug, Deserialize)]
pub struct StartedJob {
    pub id: String,
}

/// One observation of a translation job. HTTP 202 maps to `Pending`; any
/// other status is terminal and carries the body verbatim: raw model bytes
/// or an `{"error": ...}` object, which the selection pipeline classifies.
#[derive(Clone, Debug)]
pub enum JobStatus {
    Pending,
    Terminal(Vec<u8>),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Terminal(_))
    }
}

/// Parse a terminal body: an `{"error": ...}` object is a server-reported
/// failure, anything else is the model payload itself.
pub fn server_reported_error(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
}

/// Directory listing entry.
#[derive(Clone, Debug, Deserialize)]
pub struct ElementInfo {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "elementType")]
    pub element_type: String,
}

/// Part of a part studio element.
#[derive(Clone, Debug, Deserialize)]
pub struct PartInfo {
    #[serde(rename = "elementId")]
    pub element_id: String,
    #[serde(rename = "partId")]
    pub part_id: String,
    pub name: String,
}

/// Translation boundary the selection pipeline polls against. Implemented by
/// [`ApiClient`] over HTTP and by scripted services in tests.
pub trait TranslationService {
    fn start_job(
        &self,
        query: &ElementQuery,
    ) -> impl std::future::Future<Output = Result<StartedJob, RequestError>>;

    fn job_status(
        &self,
        job_id: &str,
    ) -> impl std::future::Future<Output = Result<JobStatus, RequestError>>;
}

/// HTTP client for the translation and element-directory endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T, RequestError> {
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| RequestError::Body(e.to_string()))
    }

    pub async fn elements(
        &self,
        document_id: &str,
        workspace_id: &str,
    ) -> Result<Vec<ElementInfo>, RequestError> {
        self.get_json(
            self.url("/api/elements"),
            &[("documentId", document_id), ("workspaceId", workspace_id)],
        )
        .await
    }

    pub async fn element_parts(
        &self,
        element_id: &str,
        document_id: &str,
        workspace_id: &str,
    ) -> Result<Vec<PartInfo>, RequestError> {
        self.get_json(
            self.url(&format!("/api/elements/{}/parts", element_id)),
            &[("documentId", document_id), ("workspaceId", workspace_id)],
        )
        .await
    }
}

impl TranslationService for ApiClient {
    async fn start_job(&self, query: &ElementQuery) -> Result<StartedJob, RequestError> {
        let mut params = vec![
            ("documentId", query.document_id.as_str()),
            ("workspaceId", query.workspace_id.as_str()),
            ("gltfElementId", query.element_id.as_str()),
        ];
        if let Some(part_id) = &query.part_id {
            params.push(("partId", part_id.as_str()));
        }
        self.get_json(self.url("/api/gltf"), &params).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, RequestError> {
        let url = self.url(&format!("/api/gltf/{}", job_id));
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::ACCEPTED {
            return Ok(JobStatus::Pending);
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::Body(e.to_string()))?;
        Ok(JobStatus::Terminal(body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_error_body_is_classified() {
        let body = br#"{"error": "bad mesh"}"#;
        assert_eq!(server_reported_error(body), Some("bad mesh".to_string()));
    }

    #[test]
    fn model_bytes_are_not_an_error() {
        assert_eq!(server_reported_error(b"glTF binary payload"), None);
        // A JSON body without an error field is a model payload too.
        assert_eq!(server_reported_error(br#"{"asset": {"version": "2.0"}}"#), None);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/gltf"), "http://localhost:8080/api/gltf");
    }
}
