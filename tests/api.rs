use axum::http::{Method, StatusCode};
use serde_json::json;
use temp_dir::TempDir;

mod helpers;

fn event_body(capacity: i64) -> serde_json::Value {
    json!({
        "title": "Rust in research",
        "location": "Room 101",
        "start_date": colloquium_shared::now() + 7 * 24 * 60 * 60,
        "capacity": capacity,
    })
}

#[tokio::test]
async fn health_and_auth_errors() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;

    let (status, body) = app.request(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app
        .request(Method::POST, "/events", None, Some(event_body(1)))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app
        .request(Method::POST, "/events", Some("garbage"), Some(event_body(1)))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(Method::GET, "/events/missing", None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "event not found");

    Ok(())
}

#[tokio::test]
async fn signup_and_login() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "email": "Ada@Colloquium.localhost",
                "password": "my_password",
                "name": "Ada",
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_owned();

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ada@colloquium.localhost", "password": "my_password" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], id.as_str());
    assert!(body["user"].get("password").is_none());
    let token = body["token"].as_str().unwrap().to_owned();

    let (status, _) = app
        .request(Method::POST, "/events", Some(&token), Some(event_body(5)))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ada@colloquium.localhost", "password": "wrong_password" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid email or password. Please try again."
    );

    Ok(())
}

#[tokio::test]
async fn registration_capacity_one() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;
    let (_, host) = app.signup("host", false).await?;
    let (_, alice) = app.signup("alice", false).await?;
    let (_, bob) = app.signup("bob", false).await?;

    let (status, event) = app
        .request(Method::POST, "/events", Some(&host), Some(event_body(1)))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = event["id"].as_str().unwrap().to_owned();
    let register = format!("/events/{event_id}/register");
    let unregister = format!("/events/{event_id}/unregister");

    let (status, body) = app
        .request(Method::POST, &register, Some(&alice), None)
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registration"]["status"], "Registered");

    let (status, body) = app
        .request(Method::POST, &register, Some(&bob), Some(json!({ "notes": "hi" })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "event_full");
    assert_eq!(body["message"], "Event is full");

    let (status, body) = app
        .request(Method::POST, &register, Some(&host), None)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "self_registration");

    let (status, body) = app
        .request(Method::POST, &register, Some(&alice), None)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_registration");

    let (status, _) = app
        .request(Method::DELETE, &unregister, Some(&alice), None)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(Method::DELETE, &unregister, Some(&alice), None)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_registered");

    let (status, _) = app
        .request(Method::POST, &register, Some(&bob), None)
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/events/{event_id}/attendees"),
            Some(&alice),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/events/{event_id}/attendees"),
            Some(&host),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn admin_moderation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;
    let (_, admin) = app.signup("admin", true).await?;
    let (_, host) = app.signup("host", false).await?;
    let (john_id, john) = app.signup("john", false).await?;

    let (_, event) = app
        .request(Method::POST, "/events", Some(&host), Some(event_body(10)))
        .await?;
    let event_id = event["id"].as_str().unwrap().to_owned();
    let ban = format!("/admin/events/{event_id}/ban");

    let (status, body) = app
        .request(Method::POST, &ban, Some(&host), Some(json!({})))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = app
        .request(Method::POST, &ban, Some(&admin), Some(json!({ "reason": "spam" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Banned");
    assert_eq!(body["ban_reason"], "spam");

    let (status, body) = app
        .request(Method::POST, &ban, Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event is already banned.");

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/events/{event_id}/register"),
            Some(&john),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "event_not_active");

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/admin/logs?target_type=event&target_id={event_id}"),
            Some(&admin),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["action"], "event_ban");

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/admin/events/{event_id}/unban"),
            Some(&admin),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Published");

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/admin/users/{john_id}/ban"),
            Some(&admin),
            Some(json!({ "reason": "abuse" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["is_banned"], true);

    let (status, _) = app
        .request(Method::POST, "/events", Some(&john), Some(event_body(3)))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::GET, &format!("/events/{event_id}"), Some(&john), None)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/admin/users/{john_id}/ban"),
            Some(&admin),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["is_banned"], false);
    assert!(body["user"]["ban_reason"].is_null());

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/admin/events/{event_id}/force-delete?reason=duplicate"),
            Some(&admin),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, &format!("/events/{event_id}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .request(Method::GET, "/admin/stats", Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], 3);
    assert_eq!(body["admins"], 1);

    let (status, body) = app
        .request(Method::GET, "/admin/jobs/failed", Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    Ok(())
}

#[tokio::test]
async fn forum_and_connections() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;
    let (_, admin) = app.signup("admin", true).await?;
    let (host_id, host) = app.signup("host", false).await?;
    let (_, jane) = app.signup("jane", false).await?;

    let (_, event) = app
        .request(Method::POST, "/events", Some(&host), Some(event_body(10)))
        .await?;
    let posts = format!("/events/{}/posts", event["id"].as_str().unwrap());

    let (status, post) = app
        .request(Method::POST, &posts, Some(&jane), Some(json!({ "body": "See you there" })))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = post["id"].as_str().unwrap().to_owned();

    let (status, body) = app.request(Method::GET, &posts, None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["body"], "See you there");

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/admin/forum/posts/{post_id}?reason=offtopic"),
            Some(&admin),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.request(Method::GET, &posts, None, None).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let (status, connection) = app
        .request(
            Method::POST,
            "/connections",
            Some(&jane),
            Some(json!({ "addressee_id": host_id })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(connection["status"], "Pending");
    let accept = format!("/connections/{}/accept", connection["id"].as_str().unwrap());

    let (status, _) = app.request(Method::POST, &accept, Some(&jane), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request(Method::POST, &accept, Some(&host), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Accepted");

    let (status, body) = app
        .request(Method::GET, "/connections?status=Accepted", Some(&jane), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    Ok(())
}
