use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use chatform_core::{
    Appointments, ChatApiClient, ChatError, ChatOutcome, ChatSubmitHandler, ClientConfig,
    SubmitEvent, TextArea, TextField,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    content_type: Option<String>,
    authorization: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct StubState {
    replies: Arc<HashMap<String, (u16, String)>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.recorded.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        content_type: header_text(header::CONTENT_TYPE),
        authorization: header_text(header::AUTHORIZATION),
        body: body.clone(),
    });

    if body.contains("slow") {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    let (status, reply) = match state.replies.get(uri.path()) {
        Some((status, reply)) => (*status, reply.clone()),
        None => (404, r#"{"error": "not found"}"#.to_string()),
    };

    // The stub echoes the message back when the canned reply says so.
    let reply = if reply == "ECHO" {
        let message = serde_json::from_str::<serde_json::Value>(&body).unwrap()["message"]
            .as_str()
            .unwrap()
            .to_string();
        serde_json::json!({ "response": message }).to_string()
    } else {
        reply
    };

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply,
    )
}

async fn spawn_stub(replies: &[(&str, u16, &str)]) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let state = StubState {
        replies: Arc::new(
            replies
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
        ),
        recorded: Arc::default(),
    };
    let recorded = state.recorded.clone();
    let router = Router::new().fallback(record).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), recorded)
}

fn config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: Some(base_url.to_string()),
        ..ClientConfig::defaults()
    }
}

fn client(base_url: &str) -> ChatApiClient {
    ChatApiClient::new(&config(base_url)).unwrap()
}

async fn submit(base_url: &str, message: &str) -> (Result<ChatOutcome, ChatError>, String) {
    let handler = ChatSubmitHandler::new(
        client(base_url),
        TextField::new(message),
        TextArea::with_text("previous"),
    );
    let event = SubmitEvent::new();
    let result = handler.on_submit(&event).await;
    assert!(event.default_prevented());
    (result, handler.display().text())
}

#[tokio::test]
async fn test_submit_posts_message_as_json() {
    for message in ["hello", "", "  spaced  ", "quote \" and \u{e8}"] {
        let (base_url, recorded) = spawn_stub(&[("/chat", 200, r#"{"response": "ok"}"#)]).await;

        let (result, text) = submit(&base_url, message).await;

        assert!(result.is_ok());
        assert_eq!(text, "ok");
        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].method, Method::POST);
        assert_eq!(recorded[0].path, "/chat");
        assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(&recorded[0].body).unwrap();
        assert_eq!(body, serde_json::json!({ "message": message }));
    }
}

#[tokio::test]
async fn test_display_selection_over_http() {
    let cases = [
        (r#"{"response": "ok"}"#, "ok"),
        (r#"{"error": "bad"}"#, "bad"),
        (r#"{"response": "", "error": "bad"}"#, "bad"),
        (r#"{"response": null, "error": "bad"}"#, "bad"),
        ("{}", "undefined"),
    ];

    for (reply, expected) in cases {
        let (base_url, _) = spawn_stub(&[("/chat", 200, reply)]).await;
        let (result, text) = submit(&base_url, "hi").await;
        assert!(result.is_ok(), "reply {} should parse", reply);
        assert_eq!(text, expected, "reply {}", reply);
    }
}

#[tokio::test]
async fn test_error_status_body_is_still_displayed() {
    let (base_url, _) = spawn_stub(&[("/chat", 400, r#"{"error": "Messaggio vuoto"}"#)]).await;

    let (result, text) = submit(&base_url, "").await;

    assert_eq!(
        result.unwrap(),
        ChatOutcome::Failure("Messaggio vuoto".to_string())
    );
    assert_eq!(text, "Messaggio vuoto");
}

#[tokio::test]
async fn test_malformed_reply_shows_failure_message() {
    let (base_url, _) = spawn_stub(&[("/chat", 200, "<html>oops</html>")]).await;

    let (result, text) = submit(&base_url, "hi").await;

    assert!(matches!(result, Err(ChatError::Parsing(_))));
    assert_eq!(text, "Request failed. Please try again.");
}

#[tokio::test]
async fn test_unreachable_server_shows_failure_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (result, text) = submit(&format!("http://{}", addr), "hi").await;

    assert!(matches!(result, Err(ChatError::Request(_))));
    assert_eq!(text, "Request failed. Please try again.");
}

#[tokio::test]
async fn test_bearer_key_is_sent_when_configured() {
    let (base_url, recorded) = spawn_stub(&[("/chat", 200, r#"{"response": "ok"}"#)]).await;
    let client = ChatApiClient::new(&ClientConfig {
        api_key: Some("sk-test".to_string()),
        ..config(&base_url)
    })
    .unwrap();

    client.chat("hi").await.unwrap();

    assert_eq!(
        recorded.lock().unwrap()[0].authorization.as_deref(),
        Some("Bearer sk-test")
    );
}

#[tokio::test]
async fn test_reply_arriving_second_wins() {
    let (base_url, _) = spawn_stub(&[("/chat", 200, "ECHO")]).await;
    let display = Arc::new(TextArea::new());
    let slow = ChatSubmitHandler::new(client(&base_url), TextField::new("slow"), display.clone());
    let fast = ChatSubmitHandler::new(client(&base_url), TextField::new("fast"), display.clone());

    let (slow_event, fast_event) = (SubmitEvent::new(), SubmitEvent::new());

    let (a, b) = tokio::join!(slow.on_submit(&slow_event), fast.on_submit(&fast_event));
    a.unwrap();
    b.unwrap();

    assert_eq!(display.text(), "slow");
    assert_eq!(display.writes(), 2);
}

#[tokio::test]
async fn test_companion_routes() {
    let (base_url, recorded) = spawn_stub(&[
        ("/save_chat", 200, r#"{"status": "Chat salvata con successo"}"#),
        (
            "/get_chats",
            200,
            r#"{"2024-09-18": [{"id": 2, "snippet": "Utente: domani alle 10"}, {"id": 1, "snippet": "Utente: ciao"}]}"#,
        ),
        ("/get_chat_content/2", 200, r#"{"chat_content": "Utente: domani alle 10\nAI: ok"}"#),
        ("/generate_summary", 200, r#"{"summary": "Un appuntamento."}"#),
        ("/find_appointments", 200, r#"{"appointments": ["Gio 19 Set 2024 - ore 10:00 - Riunione"]}"#),
    ])
    .await;
    let client = client(&base_url);

    let saved = client.save_chat("Utente: ciao").await.unwrap();
    assert_eq!(saved.status, "Chat salvata con successo");

    let history = client.list_chats().await.unwrap();
    assert_eq!(history["2024-09-18"].len(), 2);
    assert_eq!(history["2024-09-18"][0].id, 2);

    let content = client.chat_content(2).await.unwrap();
    assert!(content.ends_with("AI: ok"));

    assert_eq!(client.generate_summary().await.unwrap(), "Un appuntamento.");
    assert_eq!(
        client.find_appointments().await.unwrap(),
        Appointments::List(vec!["Gio 19 Set 2024 - ore 10:00 - Riunione".to_string()])
    );

    let recorded = recorded.lock().unwrap();
    let save = &recorded[0];
    assert_eq!(save.method, Method::POST);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&save.body).unwrap(),
        serde_json::json!({ "chat": "Utente: ciao" })
    );
    assert_eq!(recorded[1].method, Method::GET);
}

#[tokio::test]
async fn test_companion_error_status_maps_to_http_error() {
    let (base_url, _) = spawn_stub(&[
        ("/get_chat_content/9", 404, r#"{"error": "Chat non trovata"}"#),
        ("/generate_summary", 500, "Internal Server Error"),
    ])
    .await;
    let client = client(&base_url);

    match client.chat_content(9).await {
        Err(ChatError::Http {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "Chat non trovata");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }

    match client.generate_summary().await {
        Err(ChatError::Http {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_string_reply_field_takes_failure_path() {
    let (base_url, _) = spawn_stub(&[("/chat", 200, r#"{"response": 0}"#)]).await;

    let (result, text) = submit(&base_url, "hi").await;

    assert!(matches!(result, Err(ChatError::Parsing(_))));
    assert_eq!(text, "Request failed. Please try again.");
}

#[tokio::test]
async fn test_empty_save_is_sent_and_rejection_surfaces() {
    let (base_url, recorded) =
        spawn_stub(&[("/save_chat", 400, r#"{"error": "Chat vuota, non salvata"}"#)]).await;

    match client(&base_url).save_chat("").await {
        Err(ChatError::Http {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 400);
            assert_eq!(message, "Chat vuota, non salvata");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&recorded[0].body).unwrap(),
        serde_json::json!({ "chat": "" })
    );
}
