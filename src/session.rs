use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::Db2RestClient;
use crate::config::ConnectionSettings;
use crate::job::Job;
use crate::models::*;
use crate::transport::{HttpTransport, Transport};

/// An authenticated connection to one Db2 REST endpoint.
///
/// The bearer token is obtained once in [`authenticate`](Session::authenticate) and attached
/// to every later call. It is never refreshed: once it expires the service answers every call
/// with an error, surfaced as [`Db2RestError::Service`].
#[derive(Debug, Clone)]
pub struct Session<C = HttpTransport> {
    settings: ConnectionSettings,
    token: String,
    client: Db2RestClient<C>,
}

impl Session<HttpTransport> {
    /// Authenticate over the default `reqwest` transport.
    pub async fn authenticate(settings: ConnectionSettings) -> Result<Self> {
        Self::authenticate_with(settings, HttpTransport::new()).await
    }
}

impl<C: Transport> Session<C> {
    /// Authenticate over a caller-supplied transport.
    pub async fn authenticate_with(settings: ConnectionSettings, transport: C) -> Result<Self> {
        let client = Db2RestClient::with_transport(&settings.base_url(), transport);
        debug!(
            "[DB2_AUTH] Authenticating '{}' to database {} at {}",
            settings.username,
            settings.database,
            client.base_url()
        );

        let token = client.authenticate(&settings).await?;

        Ok(Self {
            settings,
            token,
            client,
        })
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns a reference to the low-level client (if you need direct calls).
    pub fn client(&self) -> &Db2RestClient<C> {
        &self.client
    }

    /// Send `request` in the given mode and return the raw body of a 200 or 202.
    ///
    /// The body is a `{jobStatus, resultSet}` envelope for synchronous calls and an `{id}`
    /// envelope for asynchronous ones.
    pub async fn dispatch<P: Serialize>(
        &self,
        request: &Execution<P>,
        mode: ExecutionMode,
    ) -> Result<String> {
        match request {
            Execution::Service {
                name,
                version,
                parameters,
            } => {
                self.client
                    .invoke_service(&self.token, name, version, parameters, mode.is_sync())
                    .await
            }
            Execution::Sql {
                statement,
                parameters,
                is_query,
            } => {
                self.client
                    .execute_sql(&self.token, statement, parameters, *is_query, mode.is_sync())
                    .await
            }
        }
    }

    /// Run synchronously and decode the rows returned inline.
    pub async fn run_sync_query<P, T>(&self, request: Execution<P>) -> Result<Response<T>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let request = request.with_query_flag(true);
        let body = self.dispatch(&request, ExecutionMode::Sync).await?;

        let raw: RawResponse<T> = serde_json::from_str(&body)?;
        Response::try_from(raw)
    }

    /// Run synchronously for side effects only; the payload is discarded.
    pub async fn run_sync_statement<P: Serialize>(&self, request: Execution<P>) -> Result<()> {
        let request = request.with_query_flag(false);
        self.dispatch(&request, ExecutionMode::Sync).await?;
        Ok(())
    }

    /// Submit as a job whose pages decode into `T`.
    pub async fn run_async_query<P, T>(&self, request: Execution<P>) -> Result<Job<T, C>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.submit(request.with_query_flag(true)).await
    }

    /// Submit a statement that produces no rows as a job. It is polled like any other job;
    /// its pages come back empty.
    pub async fn run_async_statement<P, T>(&self, request: Execution<P>) -> Result<Job<T, C>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.submit(request.with_query_flag(false)).await
    }

    /// Every service registered on the endpoint.
    pub async fn list_services(&self) -> Result<Vec<ServiceSummary>> {
        self.client.list_services(&self.token).await
    }

    /// Parameter and result-set metadata of one service.
    pub async fn describe_service(&self, service: &str, version: &str) -> Result<ServiceDescription> {
        self.client
            .describe_service(&self.token, service, version)
            .await
    }

    async fn submit<P, T>(&self, request: Execution<P>) -> Result<Job<T, C>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let body = self.dispatch(&request, ExecutionMode::Async).await?;
        let job: JobIdResponse = serde_json::from_str(&body)?;
        debug!("[DB2_JOB] Submitted job {}", job.id);

        Ok(Job::new(&job.id, self.client.clone(), self.token.clone()))
    }
}
