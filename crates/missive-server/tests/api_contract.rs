//! End-to-end contract tests over raw HTTP/1.1 against an ephemeral server.

use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use missive_core::auth::hash_password;
use missive_core::config::ServerConfig;
use missive_core::db::{open_in_memory, query};
use missive_core::model::{BlockType, NewContentBlock, NewLetter, NewLetterType, UpdateLetter};
use missive_server::{AppState, build_router};

struct Seeded {
    addr: SocketAddr,
    published_slug: String,
    draft_slug: String,
    letter_type_id: String,
}

async fn spawn_server() -> Seeded {
    let mut conn = open_in_memory().expect("open db");

    let admin = query::insert_user(
        &conn,
        "admin",
        "admin@example.com",
        &hash_password("secret"),
        true,
        true,
    )
    .expect("insert admin");
    query::insert_user(
        &conn,
        "visitor",
        "visitor@example.com",
        &hash_password("secret"),
        false,
        false,
    )
    .expect("insert non-staff user");

    let letter_type = query::insert_letter_type(
        &conn,
        &NewLetterType {
            name: "Birthday".to_string(),
            description: String::new(),
            meta_schema: None,
        },
    )
    .expect("insert letter type");

    let new_letter = |title: &str| NewLetter {
        title: title.to_string(),
        description: "a letter".to_string(),
        recipient_name: "Robin".to_string(),
        letter_type_id: letter_type.id,
        custom_properties: None,
        content_blocks: vec![NewContentBlock {
            block_type: BlockType::Text,
            order: 0,
            content: json!({"text": "hello"}),
        }],
    };

    let published =
        query::insert_letter(&mut conn, &new_letter("Published One"), &admin).expect("insert");
    let published = query::update_letter(
        &mut conn,
        published.id,
        &UpdateLetter {
            is_published: Some(true),
            ..UpdateLetter::default()
        },
    )
    .expect("publish");
    let draft = query::insert_letter(&mut conn, &new_letter("Draft One"), &admin).expect("insert");

    let state = AppState::new(conn, ServerConfig::default());
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    Seeded {
        addr,
        published_slug: published.slug,
        draft_slug: draft.slug,
        letter_type_id: letter_type.id.to_string(),
    }
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    cookie: Option<&str>,
    body: Option<&Value>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");

    let payload = body.map(Value::to_string);
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(cookie) = cookie {
        req.push_str(&format!("Cookie: missive_session={cookie}\r\n"));
    }
    if let Some(payload) = &payload {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    }
    req.push_str("\r\n");
    if let Some(payload) = &payload {
        req.push_str(payload);
    }

    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

fn parse_json(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

fn session_token(head: &str) -> String {
    head.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if !name.eq_ignore_ascii_case("set-cookie") {
                return None;
            }
            let value = value.trim();
            let token = value.strip_prefix("missive_session=")?;
            Some(token.split(';').next().unwrap_or(token).to_string())
        })
        .expect("set-cookie header")
}

async fn login(addr: SocketAddr, username: &str, password: &str) -> (u16, String, String) {
    send_raw(
        addr,
        "POST",
        "/api/auth/login/",
        None,
        Some(&json!({"username": username, "password": password})),
    )
    .await
}

#[tokio::test]
async fn public_letter_endpoint_serves_published_only() {
    let seeded = spawn_server().await;

    let path = format!("/api/letters/{}/", seeded.published_slug);
    let (status, _, body) = send_raw(seeded.addr, "GET", &path, None, None).await;
    assert_eq!(status, 200);
    let json = parse_json(&body);
    assert_eq!(json["slug"], seeded.published_slug.as_str());
    assert_eq!(json["content_blocks"][0]["content"]["text"], "hello");
    assert!(json.get("is_published").is_none(), "admin field leaked");
    assert!(json.get("created_by").is_none(), "admin field leaked");

    // Drafts and unknown slugs are indistinguishable.
    for slug in [seeded.draft_slug.as_str(), "no-such-letter"] {
        let path = format!("/api/letters/{slug}/");
        let (status, _, body) = send_raw(seeded.addr, "GET", &path, None, None).await;
        assert_eq!(status, 404);
        assert_eq!(
            parse_json(&body)["error"],
            "Letter not found or not published"
        );
    }
}

#[tokio::test]
async fn auth_flow_sets_and_clears_sessions() {
    let seeded = spawn_server().await;

    let (status, _, _) = send_raw(seeded.addr, "GET", "/api/auth/me/", None, None).await;
    assert_eq!(status, 401);

    let (status, _, body) = send_raw(
        seeded.addr,
        "POST",
        "/api/auth/login/",
        None,
        Some(&json!({"username": "admin"})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(parse_json(&body)["error"], "Username and password required");

    let (status, _, _) = login(seeded.addr, "admin", "wrong").await;
    assert_eq!(status, 401);

    // Valid credentials on a non-staff account are still rejected.
    let (status, _, _) = login(seeded.addr, "visitor", "secret").await;
    assert_eq!(status, 401);

    let (status, head, body) = login(seeded.addr, "admin", "secret").await;
    assert_eq!(status, 200);
    let json = parse_json(&body);
    assert_eq!(json["message"], "Login successful");
    assert_eq!(json["user"]["username"], "admin");
    let token = session_token(&head);

    let (status, _, body) =
        send_raw(seeded.addr, "GET", "/api/auth/me/", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["username"], "admin");

    let (status, head, _) = send_raw(
        seeded.addr,
        "POST",
        "/api/auth/logout/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("max-age=0"));

    let (status, _, _) =
        send_raw(seeded.addr, "GET", "/api/auth/me/", Some(&token), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn admin_endpoints_require_a_staff_session() {
    let seeded = spawn_server().await;

    for path in ["/api/admin/letters/", "/api/admin/letter-types/"] {
        let (status, _, body) = send_raw(seeded.addr, "GET", path, None, None).await;
        assert_eq!(status, 401);
        assert_eq!(parse_json(&body)["error"], "Authentication required");
    }

    let (status, _, body) = send_raw(
        seeded.addr,
        "GET",
        "/api/admin/letters/",
        Some("forged-token"),
        None,
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(parse_json(&body)["error"], "Authentication required");
}

#[tokio::test]
async fn admin_letter_lifecycle() {
    let seeded = spawn_server().await;
    let (_, head, _) = login(seeded.addr, "admin", "secret").await;
    let token = session_token(&head);

    // List responses arrive in a results envelope.
    let (status, _, body) = send_raw(
        seeded.addr,
        "GET",
        "/api/admin/letters/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let listed = parse_json(&body);
    assert_eq!(listed["results"].as_array().map(Vec::len), Some(2));

    let (status, _, body) = send_raw(
        seeded.addr,
        "POST",
        "/api/admin/letters/",
        Some(&token),
        Some(&json!({
            "title": "Fresh Letter",
            "description": "",
            "recipient_name": "Sam",
            "letter_type_id": seeded.letter_type_id,
            "content_blocks": [
                {"block_type": "text", "order": 0, "content": {"text": "one"}},
                {"block_type": "text", "order": 1, "content": {"text": "two"}}
            ]
        })),
    )
    .await;
    assert_eq!(status, 201);
    let created = parse_json(&body);
    assert_eq!(created["slug"], "fresh-letter");
    assert_eq!(created["is_published"], false);
    assert_eq!(
        created["public_url"],
        "http://localhost:5173/letter/fresh-letter"
    );
    let id = created["id"].as_str().expect("letter id").to_string();

    // Publish, then the public endpoint can see it.
    let (status, _, body) = send_raw(
        seeded.addr,
        "PATCH",
        &format!("/api/admin/letters/{id}/"),
        Some(&token),
        Some(&json!({"is_published": true})),
    )
    .await;
    assert_eq!(status, 200);
    let published = parse_json(&body);
    assert_eq!(published["is_published"], true);
    assert!(published["published_at"].is_string());

    let (status, _, _) =
        send_raw(seeded.addr, "GET", "/api/letters/fresh-letter/", None, None).await;
    assert_eq!(status, 200);

    // PATCH with content_blocks replaces the whole set.
    let (status, _, body) = send_raw(
        seeded.addr,
        "PATCH",
        &format!("/api/admin/letters/{id}/"),
        Some(&token),
        Some(&json!({
            "content_blocks": [
                {"block_type": "rich_text", "order": 0, "content": {"html": "<p>only</p>"}}
            ]
        })),
    )
    .await;
    assert_eq!(status, 200);
    let replaced = parse_json(&body);
    assert_eq!(replaced["content_blocks"].as_array().map(Vec::len), Some(1));
    assert_eq!(replaced["content_blocks"][0]["block_type"], "rich_text");

    let (status, _, _) = send_raw(
        seeded.addr,
        "DELETE",
        &format!("/api/admin/letters/{id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 204);

    let (status, _, _) = send_raw(
        seeded.addr,
        "GET",
        &format!("/api/admin/letters/{id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn admin_letter_type_lifecycle() {
    let seeded = spawn_server().await;
    let (_, head, _) = login(seeded.addr, "admin", "secret").await;
    let token = session_token(&head);

    let (status, _, body) = send_raw(
        seeded.addr,
        "POST",
        "/api/admin/letter-types/",
        Some(&token),
        Some(&json!({"name": "Holiday", "description": "seasonal"})),
    )
    .await;
    assert_eq!(status, 201);
    let created = parse_json(&body);
    assert_eq!(created["slug"], "holiday");
    let id = created["id"].as_str().expect("type id").to_string();

    let (status, _, body) = send_raw(
        seeded.addr,
        "PATCH",
        &format!("/api/admin/letter-types/{id}/"),
        Some(&token),
        Some(&json!({"description": "winter holidays"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["description"], "winter holidays");

    // The seeded type is referenced by letters and cannot be deleted.
    let (status, _, _) = send_raw(
        seeded.addr,
        "DELETE",
        &format!("/api/admin/letter-types/{}/", seeded.letter_type_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 400);

    let (status, _, _) = send_raw(
        seeded.addr,
        "DELETE",
        &format!("/api/admin/letter-types/{id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 204);
}
