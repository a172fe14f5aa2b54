//! Typed async client for the Db2 REST SQL execution service.
//!
//! A [`Session`] authenticates once against `/v1/auth` and then dispatches raw SQL or named
//! services. Synchronous calls return a [`Response`] inline; asynchronous calls return a
//! [`Job`] that is polled for pages of results or stopped.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use db2_rest_client::{ConnectionSettings, Execution, NoParameters, Session};
//!
//! # async fn example() -> db2_rest_client::Result<()> {
//! let session = Session::authenticate(ConnectionSettings::from_env()?).await?;
//!
//! let job = session
//!     .run_async_query::<_, serde_json::Value>(Execution::sql("SELECT * FROM EMPLOYEE", NoParameters {}))
//!     .await?;
//!
//! while let Some(page) = job.poll_until_ready(100, Duration::from_millis(250)).await? {
//!     println!("{:?}: {} rows", page.status, page.results.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod job;
pub mod models;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::Db2RestClient;
pub use config::{ConnectionSettings, Scheme};
pub use job::Job;
pub use models::{
    Db2RestError, Execution, ExecutionMode, NoParameters, Response, Result, ResultSetField,
    ServiceDescription, ServiceParameter, ServiceSummary, Status,
};
pub use session::Session;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
