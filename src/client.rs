use reqwest::{Method, StatusCode};
use serde::Serialize;

use crate::config::ConnectionSettings;
use crate::models::*;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};

/// Low-level Db2 REST client that directly calls the REST endpoints.
///
/// Every method performs one exchange and returns the raw success body; decoding into
/// caller types happens in [`Session`](crate::Session) and [`Job`](crate::Job).
#[derive(Debug, Clone)]
pub struct Db2RestClient<C = HttpTransport> {
    base_url: String,
    transport: C,
}

impl Db2RestClient<HttpTransport> {
    /// Example `base_url`: `https://db2.example.com:50050`
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, HttpTransport::new())
    }
}

impl<C: Transport> Db2RestClient<C> {
    pub fn with_transport(base_url: &str, transport: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /v1/auth
    /// Exchange database credentials for a bearer token.
    pub async fn authenticate(&self, settings: &ConnectionSettings) -> Result<String> {
        let url = format!("{}/v1/auth", self.base_url);
        let body = AuthRequest {
            db_parms: settings.db_parms(),
            expiry_time: settings.expiry_time.clone(),
        };

        let request = HttpRequest::new(Method::POST, url).json_body(encode(&body)?);
        let resp = self.transport.send(request).await?;

        if resp.status != StatusCode::OK {
            return Err(Db2RestError::Authentication {
                status: resp.status.as_u16(),
                body: resp.body,
            });
        }

        let auth: AuthResponse = serde_json::from_str(&resp.body)?;
        Ok(auth.token)
    }

    /// POST /v1/services/{service}/{version}
    /// Invoke a named service. Returns the raw body of a 200 or 202.
    pub async fn invoke_service<P: Serialize>(
        &self,
        token: &str,
        service: &str,
        version: &str,
        parameters: &P,
        sync: bool,
    ) -> Result<String> {
        let url = format!("{}/v1/services/{}/{}", self.base_url, service, version);
        let body = ServiceRequest { parameters, sync };

        let request = HttpRequest::new(Method::POST, url)
            .header("authorization", token)
            .json_body(encode(&body)?);

        self.handle_dispatch(self.transport.send(request).await?)
    }

    /// POST /v1/services/execsql
    /// Execute a raw SQL statement. Returns the raw body of a 200 or 202.
    pub async fn execute_sql<P: Serialize>(
        &self,
        token: &str,
        statement: &str,
        parameters: &P,
        is_query: bool,
        sync: bool,
    ) -> Result<String> {
        let url = format!("{}/v1/services/execsql", self.base_url);
        let body = SqlRequest {
            sql_statement: statement,
            parameters,
            is_query,
            sync,
        };

        let request = HttpRequest::new(Method::POST, url)
            .header("authorization", token)
            .json_body(encode(&body)?);

        self.handle_dispatch(self.transport.send(request).await?)
    }

    /// GET /v1/services/{job_id}
    /// Fetch the next page of a job. `None` when the service answers 404.
    pub async fn fetch_page(&self, page_url: &str, token: &str, limit: usize) -> Result<Option<String>> {
        let request = HttpRequest::new(Method::GET, page_url)
            .header("authorization", token)
            .json_body(encode(&PageRequest { limit })?);

        let resp = self.transport.send(request).await?;

        match resp.status {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::OK => Ok(Some(resp.body)),
            status => Err(Db2RestError::Service {
                status: status.as_u16(),
                body: resp.body,
            }),
        }
    }

    /// GET /v1/services/stop/{job_id}
    /// Request that a job stop. The service answers 204 with no body.
    pub async fn stop_job(&self, stop_url: &str, token: &str) -> Result<()> {
        let request = HttpRequest::new(Method::GET, stop_url).header("authorization", token);

        let resp = self.transport.send(request).await?;

        if resp.status != StatusCode::NO_CONTENT {
            return Err(Db2RestError::Service {
                status: resp.status.as_u16(),
                body: resp.body,
            });
        }

        Ok(())
    }

    /// GET /v1/services
    /// Names and versions of every service registered on the endpoint.
    pub async fn list_services(&self, token: &str) -> Result<Vec<ServiceSummary>> {
        let url = format!("{}/v1/services", self.base_url);
        let body = self.get_json(&url, token).await?;

        let list: ServiceList = serde_json::from_str(&body)?;
        Ok(list.services)
    }

    /// GET /v1/services/{service}/{version}
    /// Parameter and result-set metadata of one service.
    pub async fn describe_service(
        &self,
        token: &str,
        service: &str,
        version: &str,
    ) -> Result<ServiceDescription> {
        let url = format!("{}/v1/services/{}/{}", self.base_url, service, version);
        let body = self.get_json(&url, token).await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// URL a job's pages are fetched from.
    pub fn job_page_url(&self, job_id: &str) -> String {
        format!("{}/v1/services/{}", self.base_url, job_id)
    }

    /// URL a job is stopped through.
    pub fn job_stop_url(&self, job_id: &str) -> String {
        format!("{}/v1/services/stop/{}", self.base_url, job_id)
    }

    async fn get_json(&self, url: &str, token: &str) -> Result<String> {
        let request = HttpRequest::new(Method::GET, url)
            .header("authorization", token)
            .header("Content-Type", "application/json");

        let resp = self.transport.send(request).await?;

        if resp.status != StatusCode::OK {
            return Err(Db2RestError::Service {
                status: resp.status.as_u16(),
                body: resp.body,
            });
        }

        Ok(resp.body)
    }

    /// 200 means handled inline, 202 means accepted as a job; anything else is the
    /// service's own error text.
    fn handle_dispatch(&self, resp: HttpResponse) -> Result<String> {
        match resp.status {
            StatusCode::OK | StatusCode::ACCEPTED => Ok(resp.body),
            status => Err(Db2RestError::Service {
                status: status.as_u16(),
                body: resp.body,
            }),
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<String> {
    serde_json::to_string(body).map_err(Db2RestError::Encode)
}
