use super::{Credentials, ImageryService, ServiceError, ServiceResult, Session};
use crate::export::{ExportRequest, ExportTask, TaskState};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, IntoUrl, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::*;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SESSIONS_PATH: &str = "v1/sessions";
const EXPORTS_PATH: &str = "v1/exports";

/// JSON-over-HTTP imagery service client.
///
///   POST {base}/v1/sessions  {"token": ..}            -> {"session": ..}
///   POST {base}/v1/exports   ExportRequest (bearer)   -> {"id": .., "state": ..}
#[derive(Clone, Debug)]
pub struct HttpService {
    base: Url,
    client: Client,
    timeout: Duration,
}

#[derive(Deserialize)]
struct SessionResponse {
    session: String,
}

#[derive(Deserialize)]
struct TaskResponse {
    id: String,
    state: String,
}

impl HttpService {
    pub fn new<U: IntoUrl>(base: U) -> ServiceResult<Self> {
        let mut base = base
            .into_url()
            .map_err(|e| ServiceError::InvalidUrl(format!("{e:?}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self, path: &str) -> ServiceResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ServiceError::InvalidUrl(format!("{e:?}")))
    }
}

async fn checked(response: Response) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status((status.as_u16(), body)))
}

impl ImageryService for HttpService {
    fn authenticate<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, ServiceResult<Session>> {
        async move {
            let url = self.endpoint(SESSIONS_PATH)?;
            trace!("POST {url}");
            let response = self
                .client
                .post(url)
                .timeout(self.timeout)
                .json(&json!({ "token": credentials.token() }))
                .send()
                .await
                .map_err(|e| ServiceError::Request(format!("{e:?}")))?;

            let response = match checked(response).await {
                Err(ServiceError::Status((code, body)))
                    if code == StatusCode::UNAUTHORIZED.as_u16()
                        || code == StatusCode::FORBIDDEN.as_u16() =>
                {
                    return Err(ServiceError::Auth(format!("{code}: {body}")))
                }
                other => other?,
            };

            let SessionResponse { session } = response
                .json()
                .await
                .map_err(|e| ServiceError::Decode(format!("{e:?}")))?;
            Ok(Session::new(session))
        }
        .boxed()
    }

    fn start_export<'a>(
        &'a self,
        session: &'a Session,
        request: &'a ExportRequest,
    ) -> BoxFuture<'a, ServiceResult<ExportTask>> {
        async move {
            let url = self.endpoint(EXPORTS_PATH)?;
            trace!("POST {url}");
            let response = self
                .client
                .post(url)
                .timeout(self.timeout)
                .bearer_auth(session.id())
                .json(request)
                .send()
                .await
                .map_err(|e| ServiceError::Request(format!("{e:?}")))?;

            let TaskResponse { id, state } = checked(response)
                .await?
                .json()
                .await
                .map_err(|e| ServiceError::Decode(format!("{e:?}")))?;
            Ok(ExportTask {
                id,
                state: TaskState::parse(&state),
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path() {
        let service = HttpService::new("https://imagery.example.com/api").unwrap();
        assert_eq!(
            service.endpoint(SESSIONS_PATH).unwrap().as_str(),
            "https://imagery.example.com/api/v1/sessions"
        );
        let service = HttpService::new("https://imagery.example.com/").unwrap();
        assert_eq!(
            service.endpoint(EXPORTS_PATH).unwrap().as_str(),
            "https://imagery.example.com/v1/exports"
        );
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(matches!(
            HttpService::new("not a url"),
            Err(ServiceError::InvalidUrl(_))
        ));
    }
}
