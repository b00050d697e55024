use std::time::Duration;

use finder_core::{PartId, PartRecord, SearchItem, SearchResultItem, StageName};
use finder_logging::{finder_debug, finder_warn};
use futures_util::future::join_all;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub connect_timeout: Duration,
    /// No limit when `None`; the simulator holding its last stage is the only slowness signal.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            bearer_token: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// Request/response contract of the remote part lookup service.
#[async_trait::async_trait]
pub trait PartsApi: Send + Sync {
    async fn search(
        &self,
        items: &[SearchItem],
        stages: Option<&[StageName]>,
    ) -> Result<Vec<SearchResultItem>, ApiError>;

    async fn list_parts(&self) -> Result<Vec<PartRecord>, ApiError>;

    async fn create_part(&self, item: &SearchItem) -> Result<PartRecord, ApiError>;

    async fn delete_part(&self, id: PartId) -> Result<(), ApiError>;

    /// Deletes every id concurrently and folds the outcomes into one result.
    /// Any failure fails the batch; an unauthorized failure wins over others.
    async fn delete_parts(&self, ids: &[PartId]) -> Result<(), ApiError> {
        let outcomes = join_all(ids.iter().map(|id| self.delete_part(*id))).await;
        let failures: Vec<ApiError> = outcomes.into_iter().filter_map(Result::err).collect();
        let Some(first) = failures
            .iter()
            .find(|err| err.kind == FailureKind::Unauthorized)
            .or_else(|| failures.first())
        else {
            return Ok(());
        };
        Err(ApiError::new(
            first.kind.clone(),
            format!(
                "{} of {} deletions failed; first: {}",
                failures.len(),
                ids.len(),
                first.message
            ),
        ))
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    items: &'a [SearchItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    stages: Option<Vec<&'static str>>,
    debug: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResultItem>,
}

#[derive(Debug, Clone)]
pub struct ReqwestPartsApi {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestPartsApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be a base url", settings.base_url),
            ));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// Attaches the bearer credential and the optional per-request timeout.
    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = match self.settings.bearer_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        match self.settings.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .prepare(builder)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            finder_warn!("Remote call to {} was unauthorized", response.url());
            return Err(ApiError::new(FailureKind::Unauthorized, status.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl PartsApi for ReqwestPartsApi {
    async fn search(
        &self,
        items: &[SearchItem],
        stages: Option<&[StageName]>,
    ) -> Result<Vec<SearchResultItem>, ApiError> {
        let body = SearchRequest {
            items,
            stages: stages.map(|stages| stages.iter().map(|stage| stage.wire_name()).collect()),
            debug: false,
        };
        finder_debug!("POST search with {} item(s)", items.len());
        let response: SearchResponse = self
            .send_json(self.client.post(self.endpoint("search")?).json(&body))
            .await?;
        Ok(response.results)
    }

    async fn list_parts(&self) -> Result<Vec<PartRecord>, ApiError> {
        self.send_json(self.client.get(self.endpoint("parts")?)).await
    }

    async fn create_part(&self, item: &SearchItem) -> Result<PartRecord, ApiError> {
        self.send_json(self.client.post(self.endpoint("parts")?).json(item))
            .await
    }

    async fn delete_part(&self, id: PartId) -> Result<(), ApiError> {
        self.send(self.client.delete(self.endpoint(&format!("parts/{id}"))?))
            .await?;
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
