use casework_sdk::{
    chat_model_from_config, speech_model_from_config, AnalysisError, ApiConfiguration, ChatModel,
    ChatRequest, HttpChatModel, HttpChatModelOptions, ImageFindings, Message, SpeechModel,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Serve exactly one HTTP exchange on an ephemeral port and return the
/// endpoint URL.
async fn spawn_one_shot_server(response: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = [0u8; 8192];
        let mut seen = Vec::new();
        loop {
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            seen.extend_from_slice(&buffer[..read]);
            if request_complete(&seen) {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}")
}

fn request_complete(raw: &[u8]) -> bool {
    let Some(headers_end) = raw.windows(4).position(|window| window == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&raw[..headers_end]);
    let content_length = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= headers_end + 4 + content_length
}

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn chat_request(text: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![Message::user(text)],
        max_tokens: 512,
    }
}

#[tokio::test]
async fn empty_key_without_mock_mode_is_a_configuration_error() {
    let config = ApiConfiguration::default();
    assert!(matches!(
        chat_model_from_config(&config).map(|_| ()),
        Err(AnalysisError::NotConfigured)
    ));
    assert!(matches!(
        speech_model_from_config(&config).map(|_| ()),
        Err(AnalysisError::NotConfigured)
    ));
}

#[tokio::test]
async fn mock_mode_returns_the_canned_image_payload_without_network() {
    // No server is running anywhere; a network attempt would fail loudly.
    let config = ApiConfiguration {
        mock_mode: true,
        ..Default::default()
    };
    let model = chat_model_from_config(&config).unwrap();
    let reply = model
        .complete(chat_request("Extraia o texto desta imagem"))
        .await
        .unwrap();
    let findings: ImageFindings = serde_json::from_str(&reply).unwrap();
    assert_eq!(findings.plates, vec!["ABC1234".to_string()]);
    assert_eq!(findings.faces.len(), 1);
    assert!(!findings.ocr_text.is_empty());
}

#[tokio::test]
async fn completion_content_is_returned_unparsed() {
    let body = r#"{"choices":[{"message":{"content":"laudo preliminar"}}]}"#;
    let endpoint = spawn_one_shot_server(http_response("HTTP/1.1 200 OK", body)).await;
    let model = HttpChatModel::new(HttpChatModelOptions {
        endpoint,
        model_id: "test-model".to_string(),
        api_key: "sk-test".to_string(),
    })
    .unwrap();

    let reply = model.complete(chat_request("resuma")).await.unwrap();
    assert_eq!(reply, "laudo preliminar");
}

#[tokio::test]
async fn non_2xx_response_surfaces_as_a_status_error() {
    let endpoint =
        spawn_one_shot_server(http_response("HTTP/1.1 500 Internal Server Error", "boom")).await;
    let model = HttpChatModel::new(HttpChatModelOptions {
        endpoint,
        model_id: "test-model".to_string(),
        api_key: "sk-test".to_string(),
    })
    .unwrap();

    let err = model.complete(chat_request("resuma")).await.unwrap_err();
    match err {
        AnalysisError::StatusCode(status, body) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected a status error, got: {other}"),
    }
}

#[tokio::test]
async fn missing_choices_violate_the_response_invariant() {
    let endpoint = spawn_one_shot_server(http_response("HTTP/1.1 200 OK", r#"{"choices":[]}"#)).await;
    let model = HttpChatModel::new(HttpChatModelOptions {
        endpoint,
        model_id: "test-model".to_string(),
        api_key: "sk-test".to_string(),
    })
    .unwrap();

    let err = model.complete(chat_request("resuma")).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Invariant("chat", _)));
}

#[tokio::test]
async fn mock_speech_model_labels_two_speakers() {
    let config = ApiConfiguration {
        mock_mode: true,
        ..Default::default()
    };
    let model = speech_model_from_config(&config).unwrap();
    let transcription = model
        .transcribe(vec![0u8; 16], "depoimento.wav", "pt-BR")
        .await
        .unwrap();
    assert_eq!(transcription.segments.len(), 2);
    assert_eq!(transcription.segments[0].speaker, "Speaker 1");
    assert_eq!(transcription.segments[1].speaker, "Speaker 2");
}
