use super::segment;
use crate::error::ClientError;
use crate::forms::validate_report;
use crate::http::ApiClient;
use doctorstats_types::{Report, ReportRequest};

#[derive(Clone, Debug)]
pub struct ReportService {
    client: ApiClient,
}

impl ReportService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &ReportRequest) -> Result<Report, ClientError> {
        validate_report(request)?;
        let report: Report = self.client.post_json("/reports", request).await?;
        tracing::info!(id = %report.id, sections = report.sections.len(), "report created");
        Ok(report)
    }

    pub async fn list(&self) -> Result<Vec<Report>, ClientError> {
        self.client.get_json("/reports").await
    }

    pub async fn get(&self, id: &str) -> Result<Report, ClientError> {
        self.client
            .get_json(&format!("/reports/{}", segment(id)))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/reports/{}", segment(id)))
            .await
    }
}
