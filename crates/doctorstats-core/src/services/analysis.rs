use super::segment;
use crate::error::ClientError;
use crate::http::{extract_detail, ApiClient, RequestBody};
use crate::poll::{AnalysisPoller, PollHandle};
use doctorstats_types::{AnalysisRecord, AnalysisRequest, AnalysisResults, AnalysisType};
use reqwest::Method;
use serde_json::Value;

/// Analysis jobs under `/analysis`
#[derive(Clone, Debug)]
pub struct AnalysisService {
    client: ApiClient,
}

impl AnalysisService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit a job. The returned record is normally `pending`.
    pub async fn create(&self, request: &AnalysisRequest) -> Result<AnalysisRecord, ClientError> {
        let record: AnalysisRecord = self.client.post_json("/analysis", request).await?;
        tracing::info!(
            id = %record.id,
            dataset = %request.dataset_id,
            kind = %request.analysis_type,
            "analysis submitted"
        );
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<AnalysisRecord, ClientError> {
        self.client
            .get_json(&format!("/analysis/{}", segment(id)))
            .await
    }

    pub async fn list(&self) -> Result<Vec<AnalysisRecord>, ClientError> {
        self.client.get_json("/analysis").await
    }

    /// Typed results of a completed job.
    ///
    /// A job still running answers 202, reported as `ClientError::NotReady`.
    pub async fn results(
        &self,
        id: &str,
        kind: AnalysisType,
    ) -> Result<AnalysisResults, ClientError> {
        let path = format!("/analysis/{}/results", segment(id));
        let response = self
            .client
            .send(Method::GET, &path, RequestBody::Empty)
            .await?;
        if response.is_accepted() {
            return Err(ClientError::NotReady {
                status: response.status,
                detail: extract_detail(&response.body),
            });
        }
        let raw: Value = response.json()?;
        AnalysisResults::parse(kind, &raw).map_err(|source| ClientError::Decode {
            what: format!("{} results", kind),
            source,
        })
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/analysis/{}", segment(id)))
            .await?;
        tracing::info!(%id, "analysis deleted");
        Ok(())
    }

    /// Poll `id` at the configured interval until it completes or fails
    pub fn poll(&self, id: &str) -> PollHandle {
        let service = self.clone();
        let interval = self.client.config().poll_interval;
        AnalysisPoller::spawn(
            move |id: String| {
                let service = service.clone();
                async move { service.get(&id).await }
            },
            id,
            interval,
        )
    }
}
