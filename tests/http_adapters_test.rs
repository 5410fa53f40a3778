//! HTTP adapter tests against mock Telegram, Trello and Sheets endpoints.

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uslugi_bot::adapters::sheets::{SheetConversationStore, SheetRoster, SheetsClient};
use uslugi_bot::adapters::telegram::TelegramClient;
use uslugi_bot::adapters::trello::TrelloClient;
use uslugi_bot::domain::models::{
    ConversationState, OutgoingMessage, RosterField, SheetsConfig, TelegramConfig, TrelloConfig,
    Verification,
};
use uslugi_bot::domain::ports::{ConversationStore, Messenger, Roster, TicketTracker};
use uslugi_bot::DomainError;

const SERVICE_KEY: &str = include_str!("fixtures/service_key.pem");

fn telegram(server: &MockServer) -> TelegramClient {
    TelegramClient::new(&TelegramConfig {
        bot_token: "123:abc".to_string(),
        api_base: server.uri(),
    })
}

fn trello(server: &MockServer) -> TrelloClient {
    TrelloClient::new(&TrelloConfig {
        key: "trello-key".to_string(),
        token: "trello-token".to_string(),
        api_base: server.uri(),
    })
}

fn sheets(server: &MockServer) -> SheetsClient {
    SheetsClient::new(&SheetsConfig {
        service_user: "bot@project.iam.gserviceaccount.com".to_string(),
        service_key: SERVICE_KEY.to_string(),
        spreadsheet_id: "sheet-id".to_string(),
        token_uri: format!("{}/token", server.uri()),
        query_base: server.uri(),
        api_base: server.uri(),
        ..SheetsConfig::default()
    })
    .unwrap()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "ya29.test", "expires_in": 3600 })),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn csv(rows: &[&[&str]]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| format!("\"{cell}\""))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Telegram
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_send_message_posts_to_bot_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_json(json!({ "chat_id": 42, "text": "Привет" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": {} })))
        .expect(1)
        .mount(&server)
        .await;

    telegram(&server)
        .send_message(&OutgoingMessage::text(42, "Привет"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_copy_and_leave_use_their_methods() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/copyMessage"))
        .and(body_json(json!({ "chat_id": -1001, "from_chat_id": 42, "message_id": 7 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": {} })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/leaveChat"))
        .and(body_json(json!({ "chat_id": -999 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = telegram(&server);
    client.copy_message(-1001, 42, 7).await.unwrap();
    client.leave_chat(-999).await.unwrap();
}

#[tokio::test]
async fn test_set_webhook_registers_secret_and_message_updates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/setWebhook"))
        .and(body_json(json!({
            "url": "https://bot.example.org/telegram/webhook",
            "secret_token": "s3cret",
            "allowed_updates": ["message"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
        .expect(1)
        .mount(&server)
        .await;

    telegram(&server)
        .set_webhook("https://bot.example.org/telegram/webhook", "s3cret")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_call_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let err = telegram(&server)
        .send_message(&OutgoingMessage::text(1, "x"))
        .await
        .unwrap_err();

    match err {
        DomainError::Upstream { service, message } => {
            assert_eq!(service, "telegram");
            assert!(message.contains("chat not found"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_failure_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = telegram(&server).leave_chat(-5).await.unwrap_err();
    assert!(err.to_string().contains("502"));
}

// ---------------------------------------------------------------------------
// Trello
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_card_description_is_fetched_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/cards/card-1"))
        .and(query_param("key", "trello-key"))
        .and(query_param("token", "trello-token"))
        .and(query_param("fields", "desc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "card-1", "desc": "Город: Гатчина" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let description = trello(&server).description("card-1").await.unwrap();
    assert_eq!(description, "Город: Гатчина");
}

#[tokio::test]
async fn test_description_update_and_comment() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/1/cards/card-1"))
        .and(query_param("key", "trello-key"))
        .and(body_json(json!({ "desc": "Город: Луга" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "card-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/cards/card-1/actions/comments"))
        .and(query_param("token", "trello-token"))
        .and(body_json(json!({ "text": "ЛПРУслуги;t;Уточнение города;Гатчина;Луга" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "action-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = trello(&server);
    client.set_description("card-1", "Город: Луга").await.unwrap();
    client
        .add_comment("card-1", "ЛПРУслуги;t;Уточнение города;Гатчина;Луга")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_trello_error_names_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let err = trello(&server).description("card-1").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("trello"));
    assert!(message.contains("401"));
}

// ---------------------------------------------------------------------------
// Sheets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_conversation_record_is_read_and_written() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/sheet-id/gviz/tq"))
        .and(query_param("gid", "0"))
        .and(query_param("tqx", "out:csv"))
        .and(query_param("tq", "select A, B, C, D, E, G, H, I where B = 42"))
        .and(header("authorization", "Bearer ya29.test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv(&[
            &["rowid", "fromId", "chatId", "state", "verification", "familyname", "name", "phone"],
            &["5", "42", "42", "changing_email", "done", "иванов", "иван", "+79990001122"],
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-id/values/state!D5:D5"))
        .and(query_param("valueInputOption", "RAW"))
        .and(header("authorization", "Bearer ya29.test"))
        .and(body_json(json!({ "range": "state!D5:D5", "values": [["menu_changing"]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = SheetConversationStore::new(sheets(&server).sheet("0", "state"));

    let record = store.find(42).await.unwrap().unwrap();
    assert_eq!(record.row_id, 5);
    assert_eq!(record.person_id, Some(42));
    assert_eq!(record.state, ConversationState::Changing(RosterField::Email));
    assert_eq!(record.verification, Verification::Done);
    assert_eq!(record.phone, "+79990001122");

    // The bearer token is cached: the token mock expects a single exchange.
    store
        .set_state(record.row_id, &ConversationState::changing_menu())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_new_conversation_is_appended_then_read_back() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-id/values/state!A:E:append"))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(body_json(json!({
            "range": "state!A:E",
            "values": [["=ROW()", "42", "42", "start", 0]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/sheet-id/gviz/tq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv(&[
            &["rowid", "fromId", "chatId", "state", "verification", "familyname", "name", "phone"],
            &["9", "42", "42", "start", "0", "", "", ""],
        ])))
        .mount(&server)
        .await;

    let store = SheetConversationStore::new(sheets(&server).sheet("0", "state"));
    let record = store.create(42, 42).await.unwrap();

    assert_eq!(record.row_id, 9);
    assert_eq!(record.state, ConversationState::Start);
    assert_eq!(record.verification, Verification::Attempts(0));
}

#[tokio::test]
async fn test_roster_snapshot_and_empty_result() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/sheet-id/gviz/tq"))
        .and(query_param("tq", "select A, N, J where T = 42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv(&[
            &["A", "N", "J"],
            &["10", "Гатчина", "card-1"],
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/sheet-id/gviz/tq"))
        .and(query_param("tq", "select H, K, L, M, N, V where T = 7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(csv(&[&["H", "K", "L", "M", "N", "V"]])),
        )
        .mount(&server)
        .await;

    let roster = SheetRoster::new(sheets(&server).sheet("123", "roster"));

    let snapshot = roster
        .field_snapshot(42, RosterField::City)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.row, 10);
    assert_eq!(snapshot.value, "Гатчина");
    assert_eq!(snapshot.ticket_id, "card-1");

    assert_eq!(roster.contact_summary(7).await.unwrap(), None);
}

#[tokio::test]
async fn test_person_id_is_written_as_number() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-id/values/roster!T10:T10"))
        .and(body_json(json!({ "range": "roster!T10:T10", "values": [[42]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let roster = SheetRoster::new(sheets(&server).sheet("123", "roster"));
    roster
        .overwrite(10, RosterField::PersonId, "42")
        .await
        .unwrap();
}

/// Answer one request with a `200` whose body stops short of its
/// advertised length, then close the connection.
async fn truncated_csv_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let _ = socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 500\r\n\r\n\"rowid\",\"fromId\"\n",
            )
            .await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_truncated_query_body_is_upstream_error() {
    let token_server = MockServer::start().await;
    mount_token(&token_server).await;
    let query_base = truncated_csv_server().await;

    let client = SheetsClient::new(&SheetsConfig {
        service_user: "bot@project.iam.gserviceaccount.com".to_string(),
        service_key: SERVICE_KEY.to_string(),
        spreadsheet_id: "sheet-id".to_string(),
        token_uri: format!("{}/token", token_server.uri()),
        query_base,
        api_base: token_server.uri(),
        ..SheetsConfig::default()
    })
    .unwrap();
    let store = SheetConversationStore::new(client.sheet("0", "state"));

    // A cut-off body must not read as "no record", or a second row gets created.
    let err = store.find(42).await.unwrap_err();
    match err {
        DomainError::Upstream { service, .. } => assert_eq!(service, "sheets"),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_token_endpoint_failure_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    let store = SheetConversationStore::new(sheets(&server).sheet("0", "state"));
    let err = store.find(42).await.unwrap_err();
    assert!(matches!(err, DomainError::Authentication(_)));
}

#[test]
fn test_malformed_service_key_is_rejected() {
    let err = SheetsClient::new(&SheetsConfig {
        service_key: "not a key".to_string(),
        ..SheetsConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, DomainError::Authentication(_)));
}
