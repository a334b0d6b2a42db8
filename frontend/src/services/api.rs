use futures::future::{select, Either};
use gloo::net::http::{Request, Response};
use gloo::timers::future::TimeoutFuture;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use shared::submission::Submission;
use shared::{
    AiSummaryRequest, AiSummaryResponse, ApiResponse, CopyTemplateRequest, FlowStatistics, Page, ReferenceQuery,
    Resource, SubmitTarget,
};
use thiserror::Error;

use super::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Failed to serialize request: {0}")]
    Serialize(String),
    /// The backend answered with `success: false`
    #[error("{0}")]
    Rejected(String),
    #[error("Request timed out after {0} ms")]
    Timeout(u32),
}

/// Row actions that flip a boolean on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Enable,
    CanExpense,
    CanIncome,
}

impl Toggle {
    fn path(&self) -> &'static str {
        match self {
            Toggle::Enable => "toggle",
            Toggle::CanExpense => "toggleCanExpense",
            Toggle::CanIncome => "toggleCanIncome",
        }
    }
}

/// API client for the bookkeeping backend
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_base_url(config.api_base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Unpaged list for a selector
    pub async fn query_all<T: DeserializeOwned>(&self, query: &ReferenceQuery) -> Result<Vec<T>, ApiError> {
        let url = self.url(&format!("{}/all", query.resource));
        let params = query.pairs();
        let response = Request::get(&url)
            .query(params.iter().map(|(k, v)| (k.as_str(), v)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        data(response).await
    }

    /// One page of a table listing
    pub async fn query_page<T: DeserializeOwned>(
        &self,
        resource: Resource,
        params: &[(String, String)],
    ) -> Result<Page<T>, ApiError> {
        let response = Request::get(&self.url(resource.path()))
            .query(params.iter().map(|(k, v)| (k.as_str(), v)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        data(response).await
    }

    pub async fn create<B: Serialize>(&self, resource: Resource, body: &B) -> Result<(), ApiError> {
        let response = Request::post(&self.url(resource.path()))
            .json(body)
            .map_err(|e| ApiError::Serialize(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        acknowledged(response).await
    }

    pub async fn update<B: Serialize>(&self, resource: Resource, id: i64, body: &B) -> Result<(), ApiError> {
        let response = Request::put(&self.url(&format!("{}/{}", resource, id)))
            .json(body)
            .map_err(|e| ApiError::Serialize(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        acknowledged(response).await
    }

    pub async fn remove(&self, resource: Resource, id: i64) -> Result<(), ApiError> {
        let response = Request::delete(&self.url(&format!("{}/{}", resource, id)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        acknowledged(response).await
    }

    pub async fn toggle(&self, resource: Resource, id: i64, toggle: Toggle) -> Result<(), ApiError> {
        self.patch(&format!("{}/{}/{}", resource, id, toggle.path())).await
    }

    pub async fn confirm_flow(&self, id: i64) -> Result<(), ApiError> {
        self.patch(&format!("{}/{}/confirm", Resource::BalanceFlows, id)).await
    }

    async fn patch(&self, path: &str) -> Result<(), ApiError> {
        let response = Request::patch(&self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        acknowledged(response).await
    }

    /// Send the flow form's payload to the create or update endpoint
    pub async fn submit_flow(&self, submission: &Submission) -> Result<(), ApiError> {
        match submission.target {
            SubmitTarget::Create => self.create(Resource::BalanceFlows, &submission.payload).await,
            SubmitTarget::Update(id) => self.update(Resource::BalanceFlows, id, &submission.payload).await,
        }
    }

    /// Expense, income and surplus totals under the table's current filter
    pub async fn flow_statistics(&self, params: &[(String, String)]) -> Result<FlowStatistics, ApiError> {
        let url = self.url(&format!("{}/statistics", Resource::BalanceFlows));
        let response = Request::get(&url)
            .query(params.iter().map(|(k, v)| (k.as_str(), v)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        data(response).await
    }

    /// Create a new book from a template
    pub async fn copy_template(&self, request: &CopyTemplateRequest) -> Result<(), ApiError> {
        let url = self.url(&format!("{}/template", Resource::Books));
        let response = Request::post(&url)
            .json(request)
            .map_err(|e| ApiError::Serialize(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        acknowledged(response).await
    }

    /// Ask the backend for a written summary of a book.
    ///
    /// Generation is slow, so this gets its own deadline.
    pub async fn ai_summary(&self, book_id: i64, timeout_ms: u32) -> Result<String, ApiError> {
        let request = Request::post(&self.url("aisummary"))
            .json(&AiSummaryRequest { id: book_id })
            .map_err(|e| ApiError::Serialize(e.to_string()))?;

        let response = match select(Box::pin(request.send()), TimeoutFuture::new(timeout_ms)).await {
            Either::Left((result, _)) => result.map_err(|e| ApiError::Network(e.to_string()))?,
            Either::Right(_) => {
                log::warn!("AI summary for book {} timed out", book_id);
                return Err(ApiError::Timeout(timeout_ms));
            }
        };
        let response = ensure_ok(response).await?;
        let reply = response
            .json::<AiSummaryResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(reply.into_text())
    }
}

async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let url = response.url();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    log::error!("{} failed with {}: {}", url, status, body);
    Err(ApiError::Status { status, body })
}

async fn envelope<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, ApiError> {
    let response = ensure_ok(response).await?;
    let envelope: ApiResponse<T> = response.json().await.map_err(|e| ApiError::Parse(e.to_string()))?;
    if !envelope.success {
        let message = envelope.message.unwrap_or_else(|| "Request was rejected".to_string());
        return Err(ApiError::Rejected(message));
    }
    Ok(envelope)
}

async fn data<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    envelope::<T>(response)
        .await?
        .data
        .ok_or_else(|| ApiError::Parse("response carried no data".to_string()))
}

async fn acknowledged(response: Response) -> Result<(), ApiError> {
    envelope::<IgnoredAny>(response).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_base_and_path() {
        let client = ApiClient::with_base_url("http://localhost:9092/api/v1".to_string());
        assert_eq!(client.url("balance-flows/3/confirm"), "http://localhost:9092/api/v1/balance-flows/3/confirm");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ApiError::Rejected("Book is in use".to_string()).to_string(), "Book is in use");
        assert_eq!(ApiError::Timeout(100_000).to_string(), "Request timed out after 100000 ms");
    }

    #[test]
    fn test_toggle_paths() {
        assert_eq!(Toggle::Enable.path(), "toggle");
        assert_eq!(Toggle::CanIncome.path(), "toggleCanIncome");
    }
}
