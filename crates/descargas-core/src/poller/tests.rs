use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use super::*;
use crate::api::mock::ScriptedApi;
use crate::api::{ApiError, SharedTaskApi};

fn shared(api: &Arc<ScriptedApi>) -> SharedTaskApi {
    Arc::clone(api) as SharedTaskApi
}

#[tokio::test(start_paused = true)]
async fn polls_every_interval_until_terminal() {
    let api = Arc::new(
        ScriptedApi::new()
            .on_status(Ok(json!({"progreso": 10, "estado": "en_progreso"})))
            .on_status(Ok(json!({"progreso": 60, "estado": "en_progreso"})))
            .on_status(Ok(json!({"progreso": 100, "estado": "completado"}))),
    );
    let start = Instant::now();
    let (handle, mut rx) = spawn(shared(&api), TaskId::from("t1"), PollSettings::default());

    let mut arrivals = Vec::new();
    let mut events = Vec::new();
    while let Some(ev) = rx.recv().await {
        arrivals.push(Instant::now() - start);
        events.push(ev);
    }

    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], PollEvent::Progress(ref s) if s.progress == 10.0));
    assert!(matches!(events[2], PollEvent::Completed(ref s) if s.progress == 100.0));
    for (i, at) in arrivals.iter().enumerate() {
        let expected = Duration::from_millis(2000 * (i as u64 + 1));
        assert!(*at >= expected && *at < expected + Duration::from_millis(100), "tick {i} at {at:?}");
    }

    let outcome = handle.join().await;
    assert!(matches!(outcome, PollOutcome::Completed(ref s) if s.status.as_deref() == Some("completado")));

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(api.status_calls().len(), 3, "no request after the terminal tick");
}

#[tokio::test(start_paused = true)]
async fn english_done_is_terminal() {
    let api = Arc::new(ScriptedApi::new().on_status(Ok(json!({"progress": 100, "status": "done"}))));
    let (handle, mut rx) = spawn(shared(&api), TaskId::from("t2"), PollSettings::default());
    let ev = rx.recv().await.unwrap();
    assert!(ev.is_final());
    assert!(rx.recv().await.is_none());
    assert!(matches!(handle.join().await, PollOutcome::Completed(_)));
    assert_eq!(api.status_calls(), vec![TaskId::from("t2")]);
}

#[tokio::test(start_paused = true)]
async fn http_failure_stops_polling_with_generic_message() {
    let api = Arc::new(
        ScriptedApi::new()
            .on_status(Ok(json!({"progreso": 40, "estado": "en_progreso"})))
            .on_status(Err(ApiError::Status(500)))
            .on_status(Ok(json!({"progreso": 100, "estado": "completado"}))),
    );
    let (handle, mut rx) = spawn(shared(&api), TaskId::from("t1"), PollSettings::default());

    assert!(matches!(rx.recv().await, Some(PollEvent::Progress(_))));
    assert_eq!(
        rx.recv().await,
        Some(PollEvent::Failed(POLL_FAILED_MESSAGE.to_string()))
    );
    assert!(rx.recv().await.is_none());
    assert_eq!(
        handle.join().await,
        PollOutcome::Failed(POLL_FAILED_MESSAGE.to_string())
    );

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(api.status_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_reports_its_own_message() {
    let err = curl::Error::new(7);
    let expected = err.to_string();
    let api = Arc::new(ScriptedApi::new().on_status(Err(ApiError::Transport(err))));
    let (handle, mut rx) = spawn(shared(&api), TaskId::from("t1"), PollSettings::default());
    assert_eq!(rx.recv().await, Some(PollEvent::Failed(expected.clone())));
    assert_eq!(handle.join().await, PollOutcome::Failed(expected));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_loop() {
    let api = Arc::new(
        ScriptedApi::new()
            .on_status(Ok(json!({"progreso": 10, "estado": "en_progreso"})))
            .on_status(Ok(json!({"progreso": 20, "estado": "en_progreso"}))),
    );
    let (handle, mut rx) = spawn(shared(&api), TaskId::from("t1"), PollSettings::default());
    assert!(matches!(rx.recv().await, Some(PollEvent::Progress(_))));
    drop(handle);

    assert!(rx.recv().await.is_none());
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(api.status_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unread_events_do_not_slow_the_cadence() {
    let mut api = ScriptedApi::new();
    for i in 0..40 {
        api = api.on_status(Ok(json!({"progreso": i, "estado": "en_progreso"})));
    }
    let api = Arc::new(api);
    let (handle, mut rx) = spawn(shared(&api), TaskId::from("t1"), PollSettings::default());

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(api.status_calls().len(), 30);

    let mut queued = 0;
    while let Ok(event) = rx.try_recv() {
        assert!(matches!(event, PollEvent::Progress(_)));
        queued += 1;
    }
    assert_eq!(queued, 30);
    drop(handle);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_first_tick_sends_nothing() {
    let api = Arc::new(ScriptedApi::new());
    let (mut handle, mut rx) = spawn(shared(&api), TaskId::from("t1"), PollSettings::default());
    handle.cancel();
    assert!(rx.recv().await.is_none());
    assert_eq!(handle.join().await, PollOutcome::Cancelled);
    assert!(api.status_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn custom_interval_and_markers() {
    let api = Arc::new(
        ScriptedApi::new()
            .on_status(Ok(json!({"state": "PROGRESS", "progress": 50})))
            .on_status(Ok(json!({"state": "SUCCESS", "progress": 100}))),
    );
    let settings = PollSettings::new(
        Duration::from_millis(250),
        crate::status::TerminalStatuses::new(["SUCCESS"]),
    );
    let start = Instant::now();
    let (handle, mut rx) = spawn(shared(&api), TaskId::from("c1"), settings);
    while rx.recv().await.is_some() {}
    assert!(matches!(handle.join().await, PollOutcome::Completed(_)));
    let elapsed = Instant::now() - start;
    assert!(elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(600));
}

#[test]
fn zero_interval_is_raised() {
    let s = PollSettings::new(Duration::ZERO, crate::status::TerminalStatuses::default());
    assert_eq!(s.interval, Duration::from_millis(1));
}
