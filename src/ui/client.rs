use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;
use serde::Serialize;
use serde_json::json;

use crate::api::leave_request::LeaveListResponse;
use crate::aqi::AqiDisplay;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user_info::UserInfo;

const PAGE_SIZE: u32 = 100;

/// Failure of a call; `message` carries the server's raw text.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{}", message)]
pub struct ClientError {
    pub status: Option<u16>,
    pub message: String,
}

impl ClientError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::new(e.status().map(|s| s.as_u16()), e.to_string())
    }
}

/// Payload for a new request; always submitted as pending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveDraft {
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    pub reason: String,
    #[serde(rename = "type_code")]
    pub leave_type: LeaveType,
    #[serde(rename = "status_code")]
    pub status: LeaveStatus,
}

#[async_trait]
pub trait LeaveApi: Send + Sync {
    async fn list(&self) -> Result<Vec<LeaveRequest>, ClientError>;
    async fn create(&self, draft: &LeaveDraft) -> Result<LeaveRequest, ClientError>;
    async fn update(&self, leave: &LeaveRequest) -> Result<LeaveRequest, ClientError>;
    async fn set_status(&self, id: &str, status: LeaveStatus) -> Result<LeaveRequest, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
    async fn user_info(&self) -> Result<UserInfo, ClientError>;
    async fn aqi(&self, city: Option<&str>) -> Result<AqiDisplay, ClientError>;
}

/// [`LeaveApi`] over HTTP with a bearer token.
pub struct HttpLeaveApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpLeaveApi {
    /// `base_url` includes the service prefix, e.g. `http://host/odata/v4/employee`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or(if body.is_empty() {
                status.to_string()
            } else {
                body
            });
        Err(ClientError::new(Some(status.as_u16()), message))
    }
}

#[async_trait]
impl LeaveApi for HttpLeaveApi {
    async fn list(&self) -> Result<Vec<LeaveRequest>, ClientError> {
        let mut rows = Vec::new();
        let mut page = 1u32;
        loop {
            let response = self
                .client
                .get(self.url("LeaveRequests"))
                .bearer_auth(&self.token)
                .query(&[("page", page), ("per_page", PAGE_SIZE)])
                .send()
                .await?;
            let body: LeaveListResponse = Self::checked(response).await?.json().await?;
            let fetched = body.data.len();
            rows.extend(body.data);
            if fetched == 0 || rows.len() as i64 >= body.total {
                return Ok(rows);
            }
            page += 1;
        }
    }

    async fn create(&self, draft: &LeaveDraft) -> Result<LeaveRequest, ClientError> {
        let response = self
            .client
            .post(self.url("LeaveRequests"))
            .bearer_auth(&self.token)
            .json(draft)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn update(&self, leave: &LeaveRequest) -> Result<LeaveRequest, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("LeaveRequests/{}", leave.id)))
            .bearer_auth(&self.token)
            .json(leave)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn set_status(&self, id: &str, status: LeaveStatus) -> Result<LeaveRequest, ClientError> {
        let response = self
            .client
            .patch(self.url(&format!("LeaveRequests/{id}")))
            .bearer_auth(&self.token)
            .json(&json!({ "status_code": status.code() }))
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("LeaveRequests/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo, ClientError> {
        let response = self
            .client
            .post(self.url("userInfo"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn aqi(&self, city: Option<&str>) -> Result<AqiDisplay, ClientError> {
        let mut request = self.client.get(self.url("aqi")).bearer_auth(&self.token);
        if let Some(city) = city {
            request = request.query(&[("city", city)]);
        }
        let response = request.send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }
}
