//! Integration tests for the FunASR websocket transcriber
//!
//! Each test spins up a throwaway in-process websocket server playing one
//! role of the recognition service, then drives a real exchange through it.

use ai_speech::{AudioData, AudioFormat, FunAsrConfig, FunAsrTranscriber, SpeechError, SpeechToText};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::Message;

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let url = format!("ws://{}", listener.local_addr().expect("no local addr"));
    (listener, url)
}

fn transcriber(endpoint: String) -> FunAsrTranscriber {
    FunAsrTranscriber::new(FunAsrConfig {
        endpoint,
        connect_timeout_ms: 1000,
        result_timeout_ms: 1000,
    })
    .expect("valid config")
}

fn sample_audio() -> AudioData {
    AudioData::new(vec![0x52, 0x49, 0x46, 0x46, 0, 0, 0, 0], AudioFormat::Wav)
}

#[tokio::test]
async fn transcribes_text_reply() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");

        let msg = ws.next().await.expect("no frame").expect("read failed");
        assert!(msg.is_binary(), "expected the audio as one binary frame");

        ws.send(Message::Text(r#"{"text": "hello world"}"#.into()))
            .await
            .expect("send failed");
    });

    let result = transcriber(url).transcribe(sample_audio()).await.expect("transcribe failed");
    assert_eq!(result.text, "hello world");
}

#[tokio::test]
async fn surfaces_remote_error_verbatim() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");
        let _ = ws.next().await;

        ws.send(Message::Text(r#"{"error": "decode failed"}"#.into()))
            .await
            .expect("send failed");
    });

    let err = transcriber(url).transcribe(sample_audio()).await.unwrap_err();
    let SpeechError::RemoteError(msg) = err else {
        panic!("expected RemoteError, got {err:?}");
    };
    assert_eq!(msg, "decode failed");
}

#[tokio::test]
async fn ignores_frames_without_result_fields() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");
        let _ = ws.next().await;

        ws.send(Message::Text(r#"{"status": "processing"}"#.into()))
            .await
            .expect("send failed");
        ws.send(Message::Text(r#"{"text": "delayed"}"#.into()))
            .await
            .expect("send failed");
    });

    let result = transcriber(url).transcribe(sample_audio()).await.expect("transcribe failed");
    assert_eq!(result.text, "delayed");
}

#[tokio::test]
async fn empty_transcript_is_success() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");
        let _ = ws.next().await;

        ws.send(Message::Text(r#"{"text": ""}"#.into()))
            .await
            .expect("send failed");
    });

    let result = transcriber(url).transcribe(sample_audio()).await.expect("transcribe failed");
    assert!(result.is_empty());
}

#[tokio::test]
async fn close_before_result_is_premature_close() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");
        let _ = ws.next().await;

        ws.close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "shutting down".into(),
        }))
        .await
        .expect("close failed");
    });

    let err = transcriber(url).transcribe(sample_audio()).await.unwrap_err();
    let SpeechError::PrematureClose(reason) = err else {
        panic!("expected PrematureClose, got {err:?}");
    };
    assert_eq!(reason, "shutting down");
}

#[tokio::test]
async fn silent_server_triggers_result_timeout() {
    let (listener, url) = bind().await;

    // Reads the audio and then never answers
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");
        let _ = ws.next().await;

        // Hold the connection open until the client gives up
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
    });

    let transcriber = FunAsrTranscriber::new(FunAsrConfig {
        endpoint: url,
        connect_timeout_ms: 1000,
        result_timeout_ms: 200,
    })
    .expect("valid config");

    let err = transcriber.transcribe(sample_audio()).await.unwrap_err();
    assert!(matches!(err, SpeechError::ResultTimeout(200)), "got {err:?}");

    // The client must have force-closed the connection
    server.await.expect("server task panicked");
}

#[tokio::test]
async fn non_reading_server_triggers_result_timeout() {
    let (listener, url) = bind().await;

    // Completes the handshake but never reads, so a large enough frame
    // stalls in the socket buffers mid-send
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let ws = accept_async(stream).await.expect("handshake failed");
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        drop(ws);
    });

    let transcriber = FunAsrTranscriber::new(FunAsrConfig {
        endpoint: url,
        connect_timeout_ms: 1000,
        result_timeout_ms: 200,
    })
    .expect("valid config");

    let audio = AudioData::new(vec![0u8; 64 * 1024 * 1024], AudioFormat::Wav);

    // Must resolve at the result deadline even though the send is stuck
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(3),
        transcriber.transcribe(audio),
    )
    .await
    .expect("transcribe did not resolve at the result deadline");

    let err = result.unwrap_err();
    assert!(matches!(err, SpeechError::ResultTimeout(200)), "got {err:?}");
}

#[tokio::test]
async fn unanswered_handshake_triggers_connect_timeout() {
    // Accepts TCP but never speaks the websocket handshake
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.expect("accept failed");
        // Hold the raw socket open without responding
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    });

    let transcriber = FunAsrTranscriber::new(FunAsrConfig {
        endpoint: url,
        connect_timeout_ms: 200,
        result_timeout_ms: 1000,
    })
    .expect("valid config");

    let err = transcriber.transcribe(sample_audio()).await.unwrap_err();
    assert!(matches!(err, SpeechError::ConnectTimeout(200)), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_is_connection_failed() {
    // Port 9 (discard) is not listening
    let err = transcriber("ws://127.0.0.1:9".to_string())
        .transcribe(sample_audio())
        .await
        .unwrap_err();

    assert!(matches!(err, SpeechError::ConnectionFailed(_)), "got {err:?}");
}
