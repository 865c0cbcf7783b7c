//! HTTP binding to the task REST API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use utils::response::MessageResponse;
use uuid::Uuid;

use crate::models::{NewTask, Task, TaskPatch};

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

/// Remote operations the client store depends on.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;

    async fn create_task(&self, title: &str) -> Result<Task, ClientError>;

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ClientError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    http: Client,
    base_url: String,
}

impl HttpTaskApi {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("tasks-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, id: Uuid) -> String {
        format!("{}/api/tasks/{}", self.base_url, id)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let res = self
            .http
            .get(self.tasks_url())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(res).await
    }

    async fn create_task(&self, title: &str) -> Result<Task, ClientError> {
        let res = self
            .http
            .post(self.tasks_url())
            .json(&NewTask { title })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(res).await
    }

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ClientError> {
        let res = self
            .http
            .put(self.task_url(id))
            .json(patch)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(res).await
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        let res = self
            .http
            .delete(self.task_url(id))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode::<MessageResponse>(res).await.map(|_| ())
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        res.json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    } else {
        let body = res.text().await.unwrap_or_default();
        Err(ClientError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}
