use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{EventId, FestivalDate},
    protocol::{
        DkuVerificationRequest, DkuVerificationResponse, FestivalEvent, LineupInfo, TicketInfo,
    },
};
use tracing::{debug, info};

pub mod batch;
pub mod error;
pub mod lineup;
pub mod routes;

pub use batch::{my_ticket_list, resolve_tickets, BatchOutcome};
pub use error::ClientError;
pub use lineup::full_lineup;

pub type ClientResult<T> = Result<T, ClientError>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Student-portal identity check. Both calls take the same credentials.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    async fn verify(&self, request: &DkuVerificationRequest)
        -> ClientResult<DkuVerificationResponse>;
    /// Refreshes an existing verification; succeeds with an empty payload.
    async fn reverify(&self, request: &DkuVerificationRequest) -> ClientResult<()>;
}

#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn list_events(&self) -> ClientResult<Vec<FestivalEvent>>;
    async fn my_ticket(&self, event_id: EventId) -> ClientResult<TicketInfo>;
}

#[async_trait]
pub trait LineupApi: Send + Sync {
    async fn lineup(&self, date: FestivalDate) -> ClientResult<Vec<LineupInfo>>;
}

#[async_trait]
impl<T> VerificationApi for Arc<T>
where
    T: VerificationApi + ?Sized,
{
    async fn verify(
        &self,
        request: &DkuVerificationRequest,
    ) -> ClientResult<DkuVerificationResponse> {
        (**self).verify(request).await
    }

    async fn reverify(&self, request: &DkuVerificationRequest) -> ClientResult<()> {
        (**self).reverify(request).await
    }
}

#[derive(Debug, Clone)]
pub struct FestaClient {
    http: Client,
    api_url: String,
}

impl FestaClient {
    pub fn new(api_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(api_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.send_json(self.http.get(self.url(path))).await
    }

    async fn post_json<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<R> {
        self.send_json(self.http.post(self.url(path)).json(body))
            .await
    }

    async fn send_json<R: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<R> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<String> {
        let res = request.send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "api request rejected");
            return Err(error::error_from_body(status, &body));
        }
        Ok(body)
    }
}

#[async_trait]
impl VerificationApi for FestaClient {
    async fn verify(
        &self,
        request: &DkuVerificationRequest,
    ) -> ClientResult<DkuVerificationResponse> {
        let response: DkuVerificationResponse =
            self.post_json(routes::DKU_VERIFY, request).await?;
        info!(student_id = %response.student.student_id, "dku verification succeeded");
        Ok(response)
    }

    async fn reverify(&self, request: &DkuVerificationRequest) -> ClientResult<()> {
        self.send(self.http.post(self.url(routes::DKU_REVERIFY)).json(request))
            .await?;
        info!(student_id = %request.dku_student_id, "dku reverification succeeded");
        Ok(())
    }
}

#[async_trait]
impl TicketApi for FestaClient {
    async fn list_events(&self) -> ClientResult<Vec<FestivalEvent>> {
        self.get_json(routes::TICKET_EVENTS).await
    }

    async fn my_ticket(&self, event_id: EventId) -> ClientResult<TicketInfo> {
        self.get_json(&routes::my_ticket(event_id)).await
    }
}

#[async_trait]
impl LineupApi for FestaClient {
    async fn lineup(&self, date: FestivalDate) -> ClientResult<Vec<LineupInfo>> {
        let request = self
            .http
            .get(self.url(routes::LINEUP))
            .query(&[("festivalDate", date.as_str())]);
        self.send_json(request).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
