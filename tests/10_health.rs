mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok", "unexpected body: {}", body);
    Ok(())
}
