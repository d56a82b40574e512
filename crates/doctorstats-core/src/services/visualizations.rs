use super::segment;
use crate::error::ClientError;
use crate::forms::validate_visualization;
use crate::http::ApiClient;
use doctorstats_types::{Visualization, VisualizationRequest};

/// Server-generated plot specifications
#[derive(Clone, Debug)]
pub struct VisualizationService {
    client: ApiClient,
}

impl VisualizationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &VisualizationRequest) -> Result<Visualization, ClientError> {
        validate_visualization(request)?;
        let visualization: Visualization = self.client.post_json("/visualizations", request).await?;
        tracing::info!(
            id = %visualization.id,
            kind = %visualization.kind,
            traces = visualization.trace_count(),
            "visualization created"
        );
        Ok(visualization)
    }

    pub async fn list(&self) -> Result<Vec<Visualization>, ClientError> {
        self.client.get_json("/visualizations").await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/visualizations/{}", segment(id)))
            .await
    }
}
