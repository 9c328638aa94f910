//! Work postings, applications and the active-work status.

use chambaya_types::{ApplyRequest, DataEnvelope, NewWork, Work, WorkStatusSnapshot};
use reqwest::Method;
use reqwest::multipart::Form;
use serde_json::Value;

use super::{ApiClient, ApiError, ApiResult, image_part};

impl ApiClient {
    /// `GET /works/`
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or a malformed body.
    pub async fn works(&self) -> ApiResult<Vec<Work>> {
        let envelope: DataEnvelope<Vec<Work>> =
            self.send(self.request(Method::GET, "/works/")).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or if the
    /// server sends no work.
    pub async fn work_by_id(&self, id: &str) -> ApiResult<Work> {
        let envelope: DataEnvelope<Work> = self
            .send(self.request(Method::GET, &format!("/works/{id}")))
            .await?;
        envelope
            .data
            .ok_or_else(|| ApiError::api(Some("Work not found in response")))
    }

    /// Publishes a work with its images as multipart.
    ///
    /// # Errors
    /// Returns an error if an image cannot be read or the request fails.
    pub async fn publish_work(&self, work: &NewWork) -> ApiResult<Work> {
        let mut form = Form::new()
            .text("title", work.title.clone())
            .text("description", work.description.clone())
            .text("location", work.location.clone())
            .text("salary", work.salary.to_string());
        for requirement in &work.requirements {
            form = form.text("requirements", requirement.clone());
        }
        for path in &work.images {
            form = form.part("imageWork", image_part(path).await?);
        }

        let envelope: DataEnvelope<Work> = self
            .send(self.request(Method::POST, "/works/create").multipart(form))
            .await?;
        envelope
            .data
            .ok_or_else(|| ApiError::api(Some("Published work missing from response")))
    }

    /// `GET /works/isWorkOpen`: the session owner's active-work snapshot.
    ///
    /// A `null` payload means "nothing open" and yields an empty snapshot.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or a malformed body.
    pub async fn work_status(&self) -> ApiResult<WorkStatusSnapshot> {
        let envelope: DataEnvelope<WorkStatusSnapshot> = self
            .send(self.request(Method::GET, "/works/isWorkOpen"))
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn apply_to_work(&self, worker_id: &str, work_id: &str) -> ApiResult<Value> {
        let body = ApplyRequest {
            worker_id: worker_id.to_string(),
            work_id: work_id.to_string(),
        };
        self.send(self.request(Method::POST, "/applications/").json(&body))
            .await
    }
}
