use chrono::{DateTime, Utc};
use gloo_net::http::{Request, Response};
use ironlog_domain::{self as domain, FetchError};

use crate::exercise::{Exercise, ExerciseError};

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub sender: S,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sender: GlooNetSendRequest,
        }
    }
}

impl Default for REST<GlooNetSendRequest> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SendRequest> domain::ExerciseSourceRepository for REST<S> {
    async fn read_version(&self) -> Result<domain::DatasetVersion, FetchError> {
        let version: DatasetVersion = self.fetch(get("api/exercises/version")?).await?;
        Ok(version.into())
    }

    async fn read_snapshot(&self) -> Result<domain::Snapshot, FetchError> {
        let snapshot: Snapshot = self.fetch(get("api/exercises/snapshot")?).await?;
        domain::Snapshot::try_from(snapshot).map_err(|err| FetchError::Parse(err.to_string()))
    }
}

impl<S: SendRequest> REST<S> {
    async fn fetch<T>(&self, request: Request) -> Result<T, FetchError>
    where
        T: 'static + for<'de> serde::Deserialize<'de>,
    {
        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|_| FetchError::NoConnection)?;

        if !response.ok() {
            return Err(FetchError::Status(format!(
                "{} {}",
                response.status(),
                response.status_text()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::Parse(err.to_string()))
    }
}

fn get(url: &str) -> Result<Request, FetchError> {
    Request::get(url)
        .build()
        .map_err(|err| FetchError::Other(err.into()))
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetVersion {
    pub version: String,
    pub total_count: usize,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl From<DatasetVersion> for domain::DatasetVersion {
    fn from(value: DatasetVersion) -> Self {
        Self {
            version: value.version,
            total_count: value.total_count,
            timestamp: value.timestamp,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub version: String,
    pub exercises: Vec<Exercise>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<Snapshot> for domain::Snapshot {
    type Error = ExerciseError;

    fn try_from(value: Snapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            version: value.version,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::Exercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            timestamp: value.timestamp,
        })
    }
}
