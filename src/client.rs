//! HTTP client for the CASFOS API, used by front ends and operator tools.

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::export::ExportRequest;
use crate::domain::FilterTab;
use crate::error::ErrorResponse;
use crate::session::{Debouncer, PendingQuery, ReportSession};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: Vec<String>,
    },

    #[error("Not logged in")]
    NotLoggedIn,
}

impl ClientError {
    /// Dialog title shown above the error text
    pub fn title(&self) -> &'static str {
        let text = self.text();
        if text.contains("AMC From Date") {
            "Invalid AMC Dates"
        } else if text.contains("is not a valid") {
            "Invalid Value"
        } else {
            "Error"
        }
    }

    /// Message followed by every detail line
    pub fn text(&self) -> String {
        match self {
            ClientError::Api { message, details, .. } if !details.is_empty() => {
                format!("{}\n{}", message, details.join("\n"))
            }
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Clone)]
pub struct CasfosClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl CasfosClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> Result<&str, ClientError> {
        self.token.as_deref().ok_or(ClientError::NotLoggedIn)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let (message, details) = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => (err.message, err.details),
            Err(_) if body.is_empty() => (status.to_string(), Vec::new()),
            Err(_) => (body, Vec::new()),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
            details,
        })
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("users/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;
        let body: TokenBody = Self::check(response).await?.json().await?;
        self.token = Some(body.token);
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(self.bearer()?)
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Submit an entry form (`storeTempAsset`, `storeTempIssue`, ...)
    pub async fn submit(&self, endpoint: &str, record: &Value) -> Result<Value, ClientError> {
        self.post(&format!("assets/{}", endpoint), record).await
    }

    pub async fn approve(&self, record_id: i64) -> Result<Value, ClientError> {
        self.post(&format!("assets/records/{}/approve", record_id), &serde_json::json!({}))
            .await
    }

    pub async fn reject(&self, record_id: i64, remark: &str) -> Result<Value, ClientError> {
        self.post(
            &format!("assets/records/{}/reject", record_id),
            &serde_json::json!({ "remark": remark }),
        )
        .await
    }

    /// Classified view of a rejected record
    pub async fn rejected(&self, record_id: i64) -> Result<Value, ClientError> {
        self.get(&format!("assets/rejected/{}", record_id)).await
    }

    pub async fn report(&self, query: &PendingQuery) -> Result<Vec<Value>, ClientError> {
        self.post(
            &format!("assets/{}", query.ticket.tab.endpoint()),
            &query.payload,
        )
        .await
    }

    /// Run a planned report query and install its rows if it is still the
    /// latest one. Returns false when the query was superseded.
    pub async fn refresh_report(
        &self,
        session: &Mutex<ReportSession>,
        query: PendingQuery,
        debouncer: &Debouncer,
    ) -> Result<bool, ClientError> {
        if query.delay.is_some() && !debouncer.settle().await {
            return Ok(false);
        }
        if !session.lock().await.generations().is_current(&query.ticket) {
            return Ok(false);
        }
        let rows = self.report(&query).await?;
        Ok(session.lock().await.accept(&query.ticket, rows))
    }

    /// Server-side CSV export of a report tab
    pub async fn export(&self, tab: FilterTab, request: &ExportRequest) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("assets/export/{}", tab.endpoint())))
            .bearer_auth(self.bearer()?)
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(message: &str, details: &[&str]) -> ClientError {
        ClientError::Api {
            status: 400,
            message: message.to_string(),
            details: details.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_titles_follow_message_text() {
        let amc = api(
            "Please correct the following errors",
            &["Item 1: AMC From Date must be before AMC To Date"],
        );
        assert_eq!(amc.title(), "Invalid AMC Dates");

        let value = api("Building is not a valid category for Consumable assets", &[]);
        assert_eq!(value.title(), "Invalid Value");

        assert_eq!(api("Record not found", &[]).title(), "Error");
        assert_eq!(ClientError::NotLoggedIn.title(), "Error");
    }

    #[test]
    fn test_text_lists_details() {
        let err = api("Please correct the following errors", &["a", "b"]);
        assert_eq!(err.text(), "Please correct the following errors\na\nb");
    }

    #[test]
    fn test_urls() {
        let client = CasfosClient::new("http://localhost:3001/");
        assert_eq!(
            client.url("assets/filterPurchase"),
            "http://localhost:3001/api/assets/filterPurchase"
        );
        assert!(matches!(client.bearer(), Err(ClientError::NotLoggedIn)));
    }
}
