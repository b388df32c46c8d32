//! Tests for the REST task adapter over the programmable transport.

use super::support::{FrozenClock, in_progress_task};
use crate::auth::adapters::memory::{
    InMemorySessionStore, InMemoryTransport, RecordingNavigator,
};
use crate::auth::domain::{AccessToken, ApiResponse, HttpMethod, Session, UserProfile, UserRole};
use crate::auth::services::{AuthenticatedClient, SessionHandle};
use crate::task::adapters::rest::{RestTaskClient, RestTaskError};
use crate::task::domain::{Task, TaskStatus, WorkflowSettings};
use eyre::{bail, ensure};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

type TestClient = RestTaskClient<InMemoryTransport, InMemorySessionStore, RecordingNavigator>;

fn profile() -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        name: "Dana".to_owned(),
        email: "dana@example.com".to_owned(),
        role: UserRole::Hr,
    }
}

fn client_over(transport: InMemoryTransport) -> TestClient {
    let sessions = SessionHandle::load(Arc::new(InMemorySessionStore::new()));
    sessions.establish(Session::new(AccessToken::new("live-token"), profile()));
    let client = AuthenticatedClient::new(
        Arc::new(transport),
        sessions,
        Arc::new(RecordingNavigator::new()),
    );
    RestTaskClient::new(Arc::new(client))
}

fn sample_task() -> eyre::Result<Task> {
    let clock = FrozenClock::at_epoch();
    Ok(in_progress_task(&WorkflowSettings::new(), &clock)?)
}

fn task_envelope(task: &Task) -> eyre::Result<serde_json::Value> {
    Ok(json!({ "success": true, "data": { "task": serde_json::to_value(task)? } }))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_status_patches_and_unwraps_the_envelope() -> eyre::Result<()> {
    let task = sample_task()?;
    let mut expected = task.clone();
    expected.hold(&FrozenClock::at_epoch())?;
    let body = task_envelope(&expected)?;
    let transport = InMemoryTransport::new();
    let path = format!("/tasks/{}/status", task.id());
    transport.on(HttpMethod::Patch, path, move |request, bearer| {
        assert_eq!(bearer.map(AccessToken::as_str), Some("live-token"));
        let crate::auth::domain::RequestBody::Json(payload) = request.body() else {
            return Ok(ApiResponse::new(400, serde_json::Value::Null));
        };
        assert_eq!(payload.get("status"), Some(&json!("Hold")));
        Ok(ApiResponse::new(200, body.clone()))
    });
    let client = client_over(transport);

    let updated = client.update_status(task.id(), TaskStatus::Hold).await?;

    ensure!(updated == expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backend_rejection_surfaces_the_server_message() -> eyre::Result<()> {
    let task = sample_task()?;
    let transport = InMemoryTransport::new();
    let path = format!("/tasks/{}/reject", task.id());
    transport.on(HttpMethod::Post, path, |_, _| {
        Ok(ApiResponse::new(
            422,
            json!({ "error": { "message": "Task already approved" } }),
        ))
    });
    let client = client_over(transport);

    let result = client.reject(task.id(), "duplicate").await;

    let Err(RestTaskError::Backend { status, message }) = result else {
        bail!("expected a backend rejection, got {result:?}");
    };
    ensure!(status == 422);
    ensure!(message == "Task already approved");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejection_without_an_envelope_falls_back_to_the_generic_message() -> eyre::Result<()> {
    let task = sample_task()?;
    let transport = InMemoryTransport::new();
    let path = format!("/tasks/{}/approve", task.id());
    transport.on(HttpMethod::Post, path, |_, _| {
        Ok(ApiResponse::new(500, serde_json::Value::Null))
    });
    let client = client_over(transport);

    let result = client.approve(task.id()).await;

    let Err(RestTaskError::Backend { message, .. }) = result else {
        bail!("expected a backend rejection, got {result:?}");
    };
    ensure!(message == "Something went wrong. Please try again.");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn success_without_a_task_payload_is_malformed() -> eyre::Result<()> {
    let task = sample_task()?;
    let transport = InMemoryTransport::new();
    let path = format!("/tasks/{}/approve-completion", task.id());
    transport.on(HttpMethod::Post, path, |_, _| {
        Ok(ApiResponse::new(200, json!({ "success": true, "data": {} })))
    });
    let client = client_over(transport);

    let result = client.approve_completion(task.id()).await;

    ensure!(matches!(result, Err(RestTaskError::MalformedPayload(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verify_otp_posts_the_submitted_code() -> eyre::Result<()> {
    let task = sample_task()?;
    let body = task_envelope(&task)?;
    let transport = InMemoryTransport::new();
    let path = format!("/tasks/{}/verify-otp", task.id());
    transport.on(HttpMethod::Post, path, move |request, _| {
        let crate::auth::domain::RequestBody::Json(payload) = request.body() else {
            return Ok(ApiResponse::new(400, serde_json::Value::Null));
        };
        assert_eq!(payload.get("code"), Some(&json!("A1B2C3")));
        Ok(ApiResponse::new(200, body.clone()))
    });
    let client = client_over(transport);

    client.verify_otp(task.id(), "A1B2C3").await?;
    Ok(())
}
