use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body for `POST /v1/auth`
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthRequest {
    pub db_parms: DbParms,
    pub expiry_time: String,
}

/// Database connection parameters forwarded to the REST service at auth time
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DbParms {
    pub db_host: String,
    pub db_name: String,
    pub db_port: u16,
    #[serde(rename = "isSSLConnection")]
    pub is_ssl_connection: bool,
    pub password: String,
    pub username: String,
}

impl std::fmt::Debug for DbParms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbParms")
            .field("db_host", &self.db_host)
            .field("db_name", &self.db_name)
            .field("db_port", &self.db_port)
            .field("is_ssl_connection", &self.is_ssl_connection)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
}

/// Request body for `POST /v1/services/{service}/{version}`
#[derive(Debug, Serialize)]
pub(crate) struct ServiceRequest<'a, P: Serialize> {
    pub parameters: &'a P,
    pub sync: bool,
}

/// Request body for `POST /v1/services/execsql`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SqlRequest<'a, P: Serialize> {
    pub sql_statement: &'a str,
    pub parameters: &'a P,
    pub is_query: bool,
    pub sync: bool,
}

/// Request body for `GET /v1/services/{job_id}`
#[derive(Debug, Serialize)]
pub(crate) struct PageRequest {
    pub limit: usize,
}

/// Returned by an asynchronous dispatch (202)
#[derive(Debug, Deserialize)]
pub(crate) struct JobIdResponse {
    pub id: String,
}

/// Wire shape of a synchronous result or a job page, before `jobStatus` is interpreted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawResponse<T> {
    pub job_status: i64,
    pub result_set: Option<Vec<T>>,
}

/// Parameters for services and statements that take none. Serialises as `{}`.
#[derive(Debug, Serialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoParameters {}

/// Whether the service should run the request inline or hand back a job id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sync,
    Async,
}

impl ExecutionMode {
    pub fn is_sync(self) -> bool {
        self == ExecutionMode::Sync
    }
}

/// What to run: a pre-registered named service, or a raw SQL statement.
///
/// `P` is any serialisable parameter payload; the service receives it as the `parameters`
/// field untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Execution<P> {
    Service {
        name: String,
        version: String,
        parameters: P,
    },
    Sql {
        statement: String,
        parameters: P,
        /// Whether result rows are expected back.
        is_query: bool,
    },
}

impl<P> Execution<P> {
    pub fn service(name: impl Into<String>, version: impl Into<String>, parameters: P) -> Self {
        Execution::Service {
            name: name.into(),
            version: version.into(),
            parameters,
        }
    }

    /// A SQL query. The query flag is overridden by the `run_*_statement` operations.
    pub fn sql(statement: impl Into<String>, parameters: P) -> Self {
        Execution::Sql {
            statement: statement.into(),
            parameters,
            is_query: true,
        }
    }

    /// A SQL statement that produces no rows.
    pub fn statement(statement: impl Into<String>, parameters: P) -> Self {
        Execution::Sql {
            statement: statement.into(),
            parameters,
            is_query: false,
        }
    }

    pub(crate) fn with_query_flag(self, query: bool) -> Self {
        match self {
            Execution::Sql {
                statement,
                parameters,
                ..
            } => Execution::Sql {
                statement,
                parameters,
                is_query: query,
            },
            service => service,
        }
    }
}

/// Job phase as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Failed,
    New,
    Running,
    DataAvailable,
    Completed,
    Stopping,
}

impl Status {
    /// New and Running are the only phases worth waiting on.
    pub fn is_pending(self) -> bool {
        matches!(self, Status::New | Status::Running)
    }

    /// Wire encoding of the `jobStatus` field.
    pub fn code(self) -> i64 {
        match self {
            Status::Failed => 0,
            Status::New => 1,
            Status::Running => 2,
            Status::DataAvailable => 3,
            Status::Completed => 4,
            Status::Stopping => 5,
        }
    }
}

impl TryFrom<i64> for Status {
    type Error = Db2RestError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Status::Failed),
            1 => Ok(Status::New),
            2 => Ok(Status::Running),
            3 => Ok(Status::DataAvailable),
            4 => Ok(Status::Completed),
            5 => Ok(Status::Stopping),
            other => Err(Db2RestError::ProtocolViolation(format!(
                "unknown jobStatus {}",
                other
            ))),
        }
    }
}

/// A decoded synchronous result or job page.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub status: Status,
    /// Rows in the order the service sent them; empty when `resultSet` was absent.
    pub results: Vec<T>,
}

impl<T> TryFrom<RawResponse<T>> for Response<T> {
    type Error = Db2RestError;

    fn try_from(raw: RawResponse<T>) -> Result<Self> {
        Ok(Response {
            status: Status::try_from(raw.job_status)?,
            results: raw.result_set.unwrap_or_default(),
        })
    }
}

/// Entry of `GET /v1/services`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub service_name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceList {
    #[serde(rename = "Db2Services", default)]
    pub services: Vec<ServiceSummary>,
}

/// Response of `GET /v1/services/{service}/{version}`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    pub service_name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_name: Option<String>,
    #[serde(default)]
    pub input_parameters: Vec<ServiceParameter>,
    #[serde(default)]
    pub result_set_fields: Vec<ResultSetField>,
}

/// Input parameter of a named service, e.g. `@DEPT` of SQL type `CHARACTER`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: String,
    /// "IN", "OUT" or "INOUT"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Column of a named service's result set
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetField {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_type: Option<String>,
}

/// Possible errors encountered by the Db2 REST client
#[derive(Error, Debug)]
pub enum Db2RestError {
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    /// `/v1/auth` answered with something other than 200. Displays the body verbatim.
    #[error("{body}")]
    Authentication { status: u16, body: String },

    /// The service rejected or failed a call. Displays the body verbatim.
    #[error("{body}")]
    Service { status: u16, body: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("JSON encode error: {0}")]
    Encode(serde_json::Error),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl Db2RestError {
    /// HTTP status returned by the service, for `Authentication` and `Service` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Db2RestError::Authentication { status, .. } | Db2RestError::Service { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Raw response body returned by the service, for `Authentication` and `Service` errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            Db2RestError::Authentication { body, .. } | Db2RestError::Service { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Db2RestError>;
