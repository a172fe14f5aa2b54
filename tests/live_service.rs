//! Runs against a real Db2 REST endpoint configured through `DB2REST_*` / `DB2_*` variables.
//!
//! `cargo test -- --ignored` to run.

use std::time::Duration;

use db2_rest_client::{ConnectionSettings, Execution, NoParameters, Response, Session, Status};
use serde_json::Value;

#[tokio::test]
#[ignore = "needs a live Db2 REST service"]
async fn test_sync_and_async_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::authenticate(ConnectionSettings::from_env()?).await?;

    let response: Response<Value> = session
        .run_sync_query(Execution::sql(
            "SELECT 1 AS ONE FROM SYSIBM.SYSDUMMY1",
            NoParameters {},
        ))
        .await?;
    assert_eq!(response.status, Status::Completed);
    assert_eq!(response.results.len(), 1);

    let job = session
        .run_async_query::<_, Value>(Execution::sql(
            "SELECT TABNAME FROM SYSCAT.TABLES FETCH FIRST 25 ROWS ONLY",
            NoParameters {},
        ))
        .await?;

    let mut rows = 0;
    while let Some(page) = tokio::time::timeout(
        Duration::from_secs(60),
        job.poll_until_ready(10, Duration::from_millis(250)),
    )
    .await??
    {
        assert!(!page.status.is_pending());
        assert_ne!(page.status, Status::Failed);
        rows += page.results.len();
    }
    assert_eq!(rows, 25);

    Ok(())
}

#[tokio::test]
#[ignore = "needs a live Db2 REST service"]
async fn test_list_services() -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::authenticate(ConnectionSettings::from_env()?).await?;

    for service in session.list_services().await? {
        let description = session
            .describe_service(&service.service_name, &service.version)
            .await?;
        println!(
            "{} {}: {} inputs, {} result columns",
            description.service_name,
            description.version,
            description.input_parameters.len(),
            description.result_set_fields.len()
        );
    }

    Ok(())
}
