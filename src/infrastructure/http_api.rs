// Monitor API client over HTTP
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::telemetry_api::{Credentials, FetchError, TelemetryApi};
use crate::domain::reading::Reading;

const LATEST_PATH: &str = "/api/latest";
const HISTORY_PATH: &str = "/api/history";
const LOGIN_PATH: &str = "/api/login";

/// reqwest-backed implementation of [`TelemetryApi`].
///
/// The client carries a cookie store: the monitor API authenticates with a
/// session cookie established by the login endpoint, which every subsequent
/// GET rides on.
#[derive(Debug)]
pub struct HttpTelemetryApi {
    client: reqwest::Client,
    base_url: String,
}

// Some API revisions wrap the payload, some return it bare. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum LatestPayload {
    Wrapped { data: Reading },
    Bare(Reading),
}

impl LatestPayload {
    fn into_reading(self) -> Reading {
        match self {
            LatestPayload::Wrapped { data } => data,
            LatestPayload::Bare(reading) => reading,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryPayload {
    Wrapped { history: Vec<Reading> },
    Bare(Vec<Reading>),
}

impl HistoryPayload {
    fn into_readings(self) -> Vec<Reading> {
        match self {
            HistoryPayload::Wrapped { history } => history,
            HistoryPayload::Bare(readings) => readings,
        }
    }
}

impl HttpTelemetryApi {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl TelemetryApi for HttpTelemetryApi {
    async fn fetch_latest(&self) -> Result<Reading, FetchError> {
        let payload: LatestPayload = self.get_json(LATEST_PATH, &[]).await?;
        Ok(payload.into_reading())
    }

    async fn fetch_history(&self, days: u32) -> Result<Vec<Reading>, FetchError> {
        let payload: HistoryPayload = self
            .get_json(HISTORY_PATH, &[("days", days.to_string())])
            .await?;
        Ok(payload.into_readings())
    }

    async fn login(&self, credentials: &Credentials) -> Result<bool, FetchError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Ok(false)
        } else {
            Err(FetchError::Status(status.as_u16()))
        }
    }
}
