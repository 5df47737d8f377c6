//! Round trips against a one-shot local HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use fieldmap_client::{ClientConfig, MappingClient};
use fieldmap_editor::{ApiError, EditorError, MappingApi, MappingEditor};
use fieldmap_model::{EntityType, MappingRow, SyncSettings};

/// A request as seen by the test server.
struct Captured {
    request_line: String,
    body: String,
}

/// Serves exactly one response and hands back the request it answered.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept connection");
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(request_body).unwrap(),
        }
    });

    (base_url, handle)
}

fn client(base_url: &str) -> MappingClient {
    MappingClient::new(&ClientConfig::default().with_base_url(base_url)).expect("create client")
}

#[test]
fn fetch_fields_parses_catalog() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"organization":[{"key":"name","name":"Org Name"}],"person":[{"key":"email","name":"Email"}],"deal":[]}"#,
    );

    let catalog = client(&base_url).fetch_fields("uniska").expect("fetch fields");
    let captured = server.join().unwrap();

    assert_eq!(
        captured.request_line,
        "GET /pipedrive-fields?company=uniska HTTP/1.1"
    );
    assert_eq!(catalog.fields(EntityType::Organization)[0].name, "Org Name");
    assert_eq!(catalog.fields(EntityType::Person)[0].key, "email");
    assert!(catalog.fields(EntityType::Deal).is_empty());
}

#[test]
fn load_mappings_reports_status() {
    let (base_url, server) = serve_once("404 Not Found", r#"{"error":"Not found"}"#);

    let err = client(&base_url).load_mappings("uniska").unwrap_err();
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "GET /uniska/field-mappings HTTP/1.1");
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            body: r#"{"error":"Not found"}"#.to_string()
        }
    );
}

#[test]
fn malformed_body_is_a_decode_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"source": "EMAIL"}"#);

    let err = client(&base_url).load_mappings("uniska").unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, ApiError::Decode(_)));
    assert!(!err.is_retryable());
}

#[test]
fn save_posts_full_list() {
    let (base_url, server) = serve_once("200 OK", r#"{"success":true}"#);
    let rows = vec![
        MappingRow::new("ADR_NAME", EntityType::Organization, "name"),
        MappingRow::new("AKP_MAIL", EntityType::Person, "email"),
    ];

    client(&base_url)
        .save_mappings("novisol", &rows)
        .expect("save mappings");
    let captured = server.join().unwrap();

    assert_eq!(
        captured.request_line,
        "POST /novisol/field-mappings HTTP/1.1"
    );
    let sent: Vec<MappingRow> = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, rows);
}

#[test]
fn editor_load_existing_over_http() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"[{"source":"EMAIL","target":"email","entity":"person"}]"#,
    );

    let client = client(&base_url);
    let mut editor = MappingEditor::default();
    assert_eq!(editor.load_existing(&client, "uniska").unwrap(), 1);
    server.join().unwrap();

    let row = &editor.rows()[0];
    assert_eq!(row.source(), Some("EMAIL"));
    assert_eq!(row.entity(), Some(EntityType::Person));
    // catalog not loaded yet, target waits for it
    assert_eq!(row.pending_target(), Some("email"));
}

#[test]
fn editor_save_failure_is_reported() {
    let (base_url, server) = serve_once("500 Internal Server Error", "");

    let client = client(&base_url);
    let mut editor = MappingEditor::default();
    editor.add_row();
    let err = editor.save(&client, "uniska").unwrap_err();
    let captured = server.join().unwrap();

    assert_eq!(captured.body, "[]");
    assert!(matches!(
        err,
        EditorError::Save(ApiError::Status { status: 500, .. })
    ));
}

#[test]
fn sync_settings_are_posted() {
    let (base_url, server) = serve_once("200 OK", r#"{"success":true}"#);
    let settings = SyncSettings {
        check_persons: false,
        ..SyncSettings::default()
    };

    client(&base_url)
        .save_sync_settings(&settings)
        .expect("save settings");
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "POST /api/sync_settings HTTP/1.1");
    let sent: SyncSettings = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, settings);
}

#[test]
fn sync_settings_failure_reported_with_200_is_an_error() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"success": false, "error": "Failed to save settings"}"#,
    );

    let err = client(&base_url)
        .save_sync_settings(&SyncSettings::default())
        .unwrap_err();
    server.join().unwrap();

    assert_eq!(
        err,
        ApiError::Rejected("Failed to save settings".to_string())
    );
    assert!(!err.is_retryable());
}

#[test]
fn sync_settings_reply_without_outcome_is_a_decode_error() {
    let (base_url, server) = serve_once("200 OK", "");

    let err = client(&base_url)
        .save_sync_settings(&SyncSettings::default())
        .unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base_url).fetch_fields("uniska").unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.is_retryable());
}
