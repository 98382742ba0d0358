// Imagery service boundary
//   The catalog, filtering engine, mosaicking and export backend live in a
//   remote service. This module only describes what is consumed from it:
//     authenticate(credentials) -> Session
//     start_export(session, request) -> ExportTask
//   Sessions are explicit handles passed to every call. Errors from the
//   service are surfaced unmodified and nothing is retried.

use std::env;
use std::fmt;

pub mod error;
#[cfg(feature = "http")]
pub mod http;

pub use error::{ServiceError, ServiceResult};

pub const TOKEN_ENV_VAR: &str = "CLOUDMASK_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new<S: Into<String>>(token: S) -> ServiceResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ServiceError::Auth("credential token is empty".into()));
        }
        Ok(Self { token })
    }

    pub fn from_env() -> ServiceResult<Self> {
        let token = env::var(TOKEN_ENV_VAR)
            .map_err(|e| ServiceError::Auth(format!("{TOKEN_ENV_VAR}: {e}")))?;
        Self::new(token)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Authenticated session handle.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
}

impl Session {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session(<redacted>)")
    }
}

#[cfg(feature = "async")]
pub use not_sync::*;
#[cfg(feature = "async")]
mod not_sync {
    use super::*;
    use crate::export::{ExportRequest, ExportTask};
    use futures::future::BoxFuture;
    use tracing::*;

    pub trait ImageryService: Send + Sync {
        fn authenticate<'a>(&'a self, credentials: &'a Credentials)
            -> BoxFuture<'a, ServiceResult<Session>>;

        /// Start the export. Returns as soon as the service accepted the job.
        fn start_export<'a>(
            &'a self,
            session: &'a Session,
            request: &'a ExportRequest,
        ) -> BoxFuture<'a, ServiceResult<ExportTask>>;
    }

    /// Authenticate, then start the export job.
    pub async fn submit_export<S: ImageryService + ?Sized>(
        service: &S,
        credentials: &Credentials,
        request: &ExportRequest,
    ) -> ServiceResult<ExportTask> {
        let session = service.authenticate(credentials).await?;
        debug!("Authenticated");

        let task = service.start_export(&session, request).await?;
        info!(
            "Started export `{}` of {} to folder `{}`: {task}",
            request.export.description, request.query.catalog, request.export.folder
        );
        Ok(task)
    }
}
