//! E2E tests for the `missive` binary against a hit-counting stub server.

use assert_cmd::Command;
use predicates::prelude::*;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Minimal HTTP stub: fixed JSON responses keyed by "METHOD path", plus a
/// request counter so tests can assert the client never called out.
fn spawn_stub(routes: HashMap<String, (u16, String)>) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            counter.fetch_add(1, Ordering::SeqCst);

            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            // Drain headers so the client sees a clean close.
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) if line == "\r\n" => break,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }

            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or("");
            let path = parts.next().unwrap_or("");
            let key = format!("{method} {path}");

            let (status, body) = routes
                .get(&key)
                .cloned()
                .unwrap_or((404, r#"{"error": "Not found"}"#.to_string()));
            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                401 => "Unauthorized",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (addr, hits)
}

fn letter_json(slug: &str) -> String {
    serde_json::json!({
        "id": "7b0d9a4e-3d71-4f44-9b19-2c8f54a6a1de",
        "title": "For You",
        "description": "a little something",
        "recipient_name": "Robin",
        "slug": slug,
        "letter_type": {
            "id": "0a6f3f1c-84a4-4f7a-b6e4-0f4f9ad1c2aa",
            "name": "Birthday",
            "slug": "birthday",
            "description": "",
            "meta_schema": {},
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        },
        "custom_properties": {},
        "content_blocks": [
            {
                "id": "9d2b58ce-6f09-4f2a-8f48-94f9a22f4b77",
                "block_type": "text",
                "order": 0,
                "content": {"text": "happy birthday"},
                "created_at": "2026-01-01T00:00:00Z"
            }
        ],
        "created_at": "2026-01-01T00:00:00Z"
    })
    .to_string()
}

fn missive_cmd(config_dir: &Path, addr: SocketAddr) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("missive"));
    cmd.env("MISSIVE_CONFIG_DIR", config_dir);
    cmd.env("MISSIVE_LOG", "error");
    cmd.arg("--server").arg(format!("http://{addr}"));
    cmd
}

#[test]
fn admin_commands_without_session_never_touch_the_server() {
    let config = tempfile::tempdir().expect("tempdir");
    let (addr, hits) = spawn_stub(HashMap::new());

    missive_cmd(config.path(), addr)
        .args(["letters", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missive login"));

    missive_cmd(config.path(), addr)
        .args(["whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missive login"));

    assert_eq!(hits.load(Ordering::SeqCst), 0, "guard must be local");
}

#[test]
fn open_plain_prints_the_assembled_letter() {
    let config = tempfile::tempdir().expect("tempdir");
    let mut routes = HashMap::new();
    routes.insert(
        "GET /api/letters/for-you/".to_string(),
        (200, letter_json("for-you")),
    );
    let (addr, _) = spawn_stub(routes);

    missive_cmd(config.path(), addr)
        .args(["open", "for-you", "--plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("For You"))
        .stdout(predicate::str::contains("Robin"))
        .stdout(predicate::str::contains("happy birthday"));
}

#[test]
fn open_json_emits_the_raw_letter() {
    let config = tempfile::tempdir().expect("tempdir");
    let mut routes = HashMap::new();
    routes.insert(
        "GET /api/letters/for-you/".to_string(),
        (200, letter_json("for-you")),
    );
    let (addr, _) = spawn_stub(routes);

    let output = missive_cmd(config.path(), addr)
        .args(["open", "for-you", "--json"])
        .output()
        .expect("run open --json");
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid letter JSON");
    assert_eq!(json["slug"], "for-you");
    assert_eq!(json["content_blocks"][0]["content"]["text"], "happy birthday");
}

#[test]
fn unknown_slug_reports_not_found_specifically() {
    let config = tempfile::tempdir().expect("tempdir");
    let mut routes = HashMap::new();
    routes.insert(
        "GET /api/letters/missing/".to_string(),
        (404, r#"{"error": "Letter not found or not published"}"#.to_string()),
    );
    let (addr, _) = spawn_stub(routes);

    missive_cmd(config.path(), addr)
        .args(["open", "missing", "--plain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not Found"))
        .stderr(predicate::str::contains("Letter not found or not published"));
}

#[test]
fn whoami_uses_the_stored_session() {
    let config = tempfile::tempdir().expect("tempdir");
    std::fs::write(config.path().join("session"), "tok-abc").expect("write session");

    let mut routes = HashMap::new();
    routes.insert(
        "GET /api/auth/me/".to_string(),
        (
            200,
            serde_json::json!({
                "id": "2a3c1fbb-4c1e-4a4a-8e5f-5f0a18b0e0aa",
                "username": "admin",
                "email": "admin@example.com",
                "is_staff": true,
                "is_superuser": true
            })
            .to_string(),
        ),
    );
    let (addr, _) = spawn_stub(routes);

    missive_cmd(config.path(), addr)
        .args(["whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn logout_without_session_is_a_clean_no_op() {
    let config = tempfile::tempdir().expect("tempdir");
    let (addr, hits) = spawn_stub(HashMap::new());

    missive_cmd(config.path(), addr)
        .args(["logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
