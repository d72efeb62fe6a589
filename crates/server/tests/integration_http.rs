mod common;

use common::{KillOnDrop, bin, pick_unused_port, wait_http_ok};
use serde_json::Value;
use std::process::{Command, Stdio};
use std::time::Duration;

#[tokio::test]
async fn http_mode_serves_health() -> anyhow::Result<()> {
    let port = pick_unused_port()?;
    let child = Command::new(bin())
        .env_remove("RUST_LOG")
        .arg("--log-level")
        .arg("warn")
        .arg("http")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .stdin(Stdio::null())
        .spawn()?;
    let _guard = KillOnDrop(child);

    let health = format!("http://127.0.0.1:{port}/health");
    wait_http_ok(&health, Duration::from_secs(20)).await?;

    let body: Value = reqwest::get(&health).await?.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["tools"], 63);
    assert_eq!(body["fingerprint"].as_str().map(str::len), Some(64));
    Ok(())
}
