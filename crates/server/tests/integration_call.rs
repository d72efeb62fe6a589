mod common;

use axum::http::StatusCode;
use common::{StubApi, ok_reply, run_call};
use serde_json::{Value, json};

#[tokio::test]
async fn call_send_text_hits_remote_and_exits_zero() -> anyhow::Result<()> {
    let api = StubApi::start(StatusCode::OK, ok_reply()).await?;

    let out = run_call(
        &api.base_url,
        "send_text",
        Some(r#"{"number":"5511999998888","text":"hello"}"#),
    )
    .await?;
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let envelope: Value = serde_json::from_str(&out.stdout)?;
    let text = envelope["content"][0]["text"].as_str().unwrap_or_default();
    assert!(
        text.starts_with("Text message sent (number: 5511999998888)."),
        "{text}"
    );
    assert!(text.contains("MSG1"));
    assert!(envelope.get("isError").is_none());

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/message/sendText/inst1");
    assert_eq!(requests[0].apikey.as_deref(), Some("test-key"));
    assert_eq!(
        requests[0].body,
        json!({"number": "5511999998888", "text": "hello"})
    );

    api.stop().await;
    Ok(())
}

#[tokio::test]
async fn call_relays_remote_error_body_and_exits_one() -> anyhow::Result<()> {
    let api = StubApi::start(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "down"})).await?;

    let out = run_call(
        &api.base_url,
        "send_text",
        Some(r#"{"number":"1","text":"hi"}"#),
    )
    .await?;
    assert_eq!(out.code, Some(1), "stderr: {}", out.stderr);

    let envelope: Value = serde_json::from_str(&out.stdout)?;
    let text = envelope["content"][0]["text"].as_str().unwrap_or_default();
    assert!(text.contains(r#"{"error":"down"}"#), "{text}");

    api.stop().await;
    Ok(())
}

#[tokio::test]
async fn call_with_missing_field_never_reaches_remote() -> anyhow::Result<()> {
    let api = StubApi::start(StatusCode::OK, ok_reply()).await?;

    let out = run_call(&api.base_url, "send_text", Some(r#"{"number":"1"}"#)).await?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("text: required field is missing"));
    assert!(api.requests().is_empty());

    api.stop().await;
    Ok(())
}

#[tokio::test]
async fn call_group_operation_sends_group_jid_as_query() -> anyhow::Result<()> {
    let api = StubApi::start(StatusCode::OK, json!({"ok": true})).await?;

    let out = run_call(
        &api.base_url,
        "update_group_subject",
        Some(r#"{"groupJid":"123@g.us","subject":"New"}"#),
    )
    .await?;
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let requests = api.requests();
    assert_eq!(requests[0].path, "/group/updateGroupSubject/inst1");
    assert_eq!(requests[0].query, "groupJid=123%40g.us");
    assert_eq!(requests[0].body, json!({"subject": "New"}));

    api.stop().await;
    Ok(())
}

#[tokio::test]
async fn unknown_tool_and_bad_json_exit_two() -> anyhow::Result<()> {
    let api = StubApi::start(StatusCode::OK, ok_reply()).await?;

    let out = run_call(&api.base_url, "does_not_exist", None).await?;
    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("unknown tool: does_not_exist"));

    let out = run_call(&api.base_url, "send_text", Some("{nope")).await?;
    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("not valid JSON"));

    assert!(api.requests().is_empty());
    api.stop().await;
    Ok(())
}

#[tokio::test]
async fn tools_subcommand_prints_the_catalog() -> anyhow::Result<()> {
    let out = tokio::process::Command::new(common::bin())
        .arg("--log-level")
        .arg("warn")
        .arg("tools")
        .output()
        .await?;
    assert!(out.status.success());

    let tools: Value = serde_json::from_slice(&out.stdout)?;
    let tools = tools.as_array().cloned().unwrap_or_default();
    assert_eq!(tools.len(), 63);
    let send_text = tools
        .iter()
        .find(|t| t["name"] == "send_text")
        .expect("send_text listed");
    assert_eq!(send_text["inputSchema"]["type"], "object");
    assert_eq!(send_text["annotations"]["readOnlyHint"], false);
    Ok(())
}
