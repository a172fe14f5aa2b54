use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use crate::client::Db2RestClient;
use crate::models::*;
use crate::transport::{HttpTransport, Transport};

/// Handle to an asynchronous execution on the service.
///
/// A `Job` only holds the URLs and token needed to act on the remote job. It caches no
/// status: every call asks the service again. Dropping it does not stop the remote job;
/// use [`stop`](Job::stop) for that.
///
/// `T` must match the rows the service actually returns; a mismatch surfaces as
/// [`Db2RestError::Decode`] on the first non-empty page.
pub struct Job<T, C = HttpTransport> {
    page_url: String,
    stop_url: String,
    token: String,
    client: Db2RestClient<C>,
    rows: PhantomData<fn() -> T>,
}

impl<T, C: Transport> Job<T, C> {
    pub(crate) fn new(job_id: &str, client: Db2RestClient<C>, token: String) -> Self {
        Self {
            page_url: client.job_page_url(job_id),
            stop_url: client.job_stop_url(job_id),
            token,
            client,
            rows: PhantomData,
        }
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn stop_url(&self) -> &str {
        &self.stop_url
    }

    /// Ask the service to stop the job. Later pages come back as `Stopping` or not at all,
    /// depending on how far the service got.
    pub async fn stop(&self) -> Result<()> {
        debug!("[DB2_JOB] Stopping job at {}", self.stop_url);
        self.client.stop_job(&self.stop_url, &self.token).await
    }
}

impl<T: DeserializeOwned, C: Transport> Job<T, C> {
    /// Fetch whatever the job has right now, at most `limit` rows.
    ///
    /// Returns `Ok(None)` once the service no longer knows the job (404), which is how it
    /// signals that every page has been handed out. A `New` or `Running` page is returned
    /// as-is, usually with no rows.
    pub async fn fetch_page(&self, limit: usize) -> Result<Option<Response<T>>> {
        let Some(body) = self.client.fetch_page(&self.page_url, &self.token, limit).await? else {
            return Ok(None);
        };

        let raw: RawResponse<T> = serde_json::from_str(&body)?;
        Response::try_from(raw).map(Some)
    }

    /// Fetch the next page, sleeping `backoff` between attempts while the job is `New` or
    /// `Running`.
    ///
    /// Any other status is returned as-is, including `Failed` and `Stopping`. There is no
    /// attempt cap: a job that never leaves `Running` keeps this future pending forever.
    /// Wrap the call in [`tokio::time::timeout`] to bound it.
    pub async fn poll_until_ready(
        &self,
        limit: usize,
        backoff: Duration,
    ) -> Result<Option<Response<T>>> {
        let mut polls = 0usize;
        loop {
            let status = match self.fetch_page(limit).await? {
                None => return Ok(None),
                Some(page) if !page.status.is_pending() => return Ok(Some(page)),
                Some(page) => page.status,
            };

            polls += 1;
            debug!(
                "[DB2_JOB] Job at {} is {:?} (poll {}), retrying in {:?}",
                self.page_url, status, polls, backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }
}

impl<T, C: Clone> Clone for Job<T, C> {
    fn clone(&self) -> Self {
        Self {
            page_url: self.page_url.clone(),
            stop_url: self.stop_url.clone(),
            token: self.token.clone(),
            client: self.client.clone(),
            rows: PhantomData,
        }
    }
}

impl<T, C> fmt::Debug for Job<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("page_url", &self.page_url)
            .field("stop_url", &self.stop_url)
            .finish_non_exhaustive()
    }
}
