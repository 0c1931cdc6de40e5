//! Loopback WebSocket tests for the monitoring channel: announce on
//! connect, status delivery, and the control-before-disconnect ordering
//! guarantee.

use edgekit_communication::channel::{ControlChannel, MonitorChannel};
use edgekit_communication::normalize;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

const RAW_STATUS: &str = "{'Operating Parameters': {'quality_control': 'Passed', \
    'tool_status': 'running', 'message': {'Job continues': \
    {'Site Environment': 'OK', 'Recommended Action': 'None'}}}, \
    'Sensor Data': {'power_curve': '350', 'lv_activepower': '250.5', \
    'wind_speed': '9.8', 'wind_direction': '210.4'}}";

/// Accept one client, assert the announce, publish one status, then
/// record every control event name until the client closes.
async fn run_device_double(listener: TcpListener) -> Vec<String> {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

    let announce = ws.next().await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(announce.to_text().unwrap()).unwrap();
    assert_eq!(value["event"], "publish_msg");

    ws.send(Message::Text(
        json!({ "event": "ipc_response", "data": { "data": RAW_STATUS } }).to_string(),
    ))
    .await
    .unwrap();

    let mut control_events = Vec::new();
    while let Some(message) = ws.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                control_events.push(value["event"].as_str().unwrap().to_string());
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }
    control_events
}

#[tokio::test]
async fn announce_status_and_ordered_teardown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/", listener.local_addr().unwrap());
    let device = tokio::spawn(run_device_double(listener));

    let (status_tx, mut status_rx) = tokio::sync::mpsc::unbounded_channel();
    let channel = MonitorChannel::connect(&url, Duration::from_secs(5), move |raw| {
        let _ = status_tx.send(raw);
    })
    .await
    .unwrap();
    assert!(!channel.is_closed());

    // The published status reaches the handler as the raw string
    let raw = status_rx.recv().await.unwrap();
    let record = normalize(&raw).unwrap();
    assert_eq!(record.operating_parameters.quality_control, "Passed");

    // end-run enqueued before disconnect must hit the wire first
    channel.send_end_run().await.unwrap();
    channel.disconnect().await.unwrap();

    let control_events = device.await.unwrap();
    assert_eq!(control_events, vec!["end_run", "disconnect_request"]);
}

#[tokio::test]
async fn end_job_carries_record_before_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/", listener.local_addr().unwrap());
    let device = tokio::spawn(run_device_double(listener));

    let (status_tx, mut status_rx) = tokio::sync::mpsc::unbounded_channel();
    let channel = MonitorChannel::connect(&url, Duration::from_secs(5), move |raw| {
        let _ = status_tx.send(raw);
    })
    .await
    .unwrap();

    let raw = status_rx.recv().await.unwrap();
    let record = normalize(&raw).unwrap();

    channel.send_end_job(&record).await.unwrap();
    channel.disconnect().await.unwrap();

    let control_events = device.await.unwrap();
    assert_eq!(control_events, vec!["end_job", "disconnect_request"]);
}

#[tokio::test]
async fn operations_after_disconnect_fail_with_channel_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/", listener.local_addr().unwrap());
    let device = tokio::spawn(run_device_double(listener));

    let channel = MonitorChannel::connect(&url, Duration::from_secs(5), |_raw| {})
        .await
        .unwrap();

    channel.disconnect().await.unwrap();
    assert!(channel.is_closed());

    let err = channel.send_end_run().await.unwrap_err();
    assert!(err.is_channel_closed());
    let err = channel.disconnect().await.unwrap_err();
    assert!(err.is_channel_closed());

    let control_events = device.await.unwrap();
    assert_eq!(control_events, vec!["disconnect_request"]);
}

#[tokio::test]
async fn connect_times_out_against_a_silent_port() {
    // A bound TCP socket that never completes the WebSocket handshake
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/", listener.local_addr().unwrap());

    let result = MonitorChannel::connect(&url, Duration::from_millis(200), |_raw| {}).await;
    assert!(result.unwrap_err().is_timeout());

    drop(listener);
}
