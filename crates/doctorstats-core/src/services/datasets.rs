use super::segment;
use crate::error::{ClientError, ValidationError};
use crate::http::ApiClient;
use crate::upload::{UploadFile, CSV_ONLY_MESSAGE};
use doctorstats_types::{Dataset, DatasetId};
use reqwest::multipart;

/// Description attached when the caller gives none
pub const DEFAULT_UPLOAD_DESCRIPTION: &str = "CSV file upload";

/// Dataset upload and metadata
#[derive(Clone, Debug)]
pub struct DatasetService {
    client: ApiClient,
}

impl DatasetService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Upload a CSV file as one multipart request.
    ///
    /// Non-CSV files are rejected before any request is built.
    pub async fn upload(
        &self,
        file: UploadFile,
        description: Option<&str>,
    ) -> Result<Dataset, ClientError> {
        file.validate_csv()?;

        let name = file.name.clone();
        let size = file.len();
        let mime = file.mime.clone().unwrap_or_else(|| "text/csv".to_string());
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&mime)
            .map_err(|_| ValidationError::for_field("file", CSV_ONLY_MESSAGE))?;
        let form = multipart::Form::new()
            .text("name", name.clone())
            .text(
                "description",
                description.unwrap_or(DEFAULT_UPLOAD_DESCRIPTION).to_string(),
            )
            .part("file", part);

        let dataset: Dataset = self.client.post_multipart("/datasets/upload", form).await?;
        tracing::info!(id = %dataset.id, %name, bytes = size, "dataset uploaded");
        Ok(dataset)
    }

    pub async fn list(&self) -> Result<Vec<Dataset>, ClientError> {
        self.client.get_json("/datasets").await
    }

    pub async fn get(&self, id: &DatasetId) -> Result<Dataset, ClientError> {
        self.client
            .get_json(&format!("/datasets/{}", segment(id.as_str())))
            .await
    }

    pub async fn delete(&self, id: &DatasetId) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/datasets/{}", segment(id.as_str())))
            .await?;
        tracing::info!(%id, "dataset deleted");
        Ok(())
    }
}
