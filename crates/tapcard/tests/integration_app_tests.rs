use chrono::Duration;
use serde_json::json;
use tapcard::TestApp;
use tapcard::services::qr;

// ═══ Health and docs ═══

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;
    let res = app.client.get(&app.url("/health")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json()["status"], "ok");
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let app = TestApp::new().await;
    let res = app.client.get(&app.url("/api-docs/openapi.json")).await;
    assert_eq!(res.status, 200, "OpenAPI endpoint should return 200");
    let json = res.json();
    assert!(json.get("openapi").is_some());
    assert!(json["paths"].get("/api/links/reorder").is_some());
}

// ═══ Authentication ═══

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;
    let res = app.client.get(&app.url("/api/profiles/me")).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let app = TestApp::new().await;
    let res = app
        .client
        .get_with_auth(&app.url("/api/profiles/me"), "garbage")
        .await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = TestApp::new().await;
    let token = app.token_for("cookie-user", None);
    let res = app
        .client
        .get_with_cookie(&app.url("/api/profiles/me"), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.json()["slug"], "cookie-user");
}

// ═══ Profiles ═══

#[tokio::test]
async fn test_my_profile_is_created_on_first_visit() {
    let app = TestApp::new().await;
    let token = app.token_for("alice", None);

    let res = app
        .client
        .get_with_auth(&app.url("/api/profiles/me"), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    let json = res.json();
    assert_eq!(json["displayName"], "alice");
    assert_eq!(json["slug"], "alice");
    assert_eq!(json["bio"], "Welcome to my digital card!");
    assert_eq!(json["themeColor"], "#000000");
    assert_eq!(json["links"], json!([]));

    let again = app
        .client
        .get_with_auth(&app.url("/api/profiles/me"), &token)
        .await;
    assert_eq!(again.json()["id"], json["id"]);
}

#[tokio::test]
async fn test_update_profile_and_view_publicly() {
    let app = TestApp::new().await;
    let token = app.token_for("alice", None);
    app.client
        .get_with_auth(&app.url("/api/profiles/me"), &token)
        .await;

    let body = json!({ "displayName": "Alice A.", "slug": "alice-a", "themeColor": "#123456" });
    let res = app
        .client
        .patch_with_auth(&app.url("/api/profiles/me"), &token, &body.to_string())
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.json()["displayName"], "Alice A.");

    let public = app.client.get(&app.url("/api/public/profiles/alice-a")).await;
    assert_eq!(public.status, 200);
    let json = public.json();
    assert_eq!(json["themeColor"], "#123456");
    assert_eq!(json["isActivated"], false);

    let old = app.client.get(&app.url("/api/public/profiles/alice")).await;
    assert_eq!(old.status, 404);
}

#[tokio::test]
async fn test_update_before_profile_exists_is_not_found() {
    let app = TestApp::new().await;
    let token = app.token_for("ghost", None);
    let res = app
        .client
        .patch_with_auth(&app.url("/api/profiles/me"), &token, r#"{"bio":"hi"}"#)
        .await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn test_duplicate_slug_is_conflict() {
    let app = TestApp::new().await;
    let alice = app.token_for("alice", None);
    let bob = app.token_for("bob", None);
    app.client.get_with_auth(&app.url("/api/profiles/me"), &alice).await;
    app.client.get_with_auth(&app.url("/api/profiles/me"), &bob).await;

    let res = app
        .client
        .patch_with_auth(&app.url("/api/profiles/me"), &bob, r#"{"slug":"alice"}"#)
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_invalid_profile_fields_are_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for("alice", None);
    app.client.get_with_auth(&app.url("/api/profiles/me"), &token).await;

    let res = app
        .client
        .patch_with_auth(
            &app.url("/api/profiles/me"),
            &token,
            r#"{"slug":"Not A Slug","backgroundColor":"blue"}"#,
        )
        .await;
    assert_eq!(res.status, 400);
    let fields = res.json()["fields"].as_array().cloned().unwrap_or_default();
    assert_eq!(fields.len(), 2);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.token_for("alice", None);
    app.client.get_with_auth(&app.url("/api/profiles/me"), &token).await;

    let res = app
        .client
        .post_with_auth(&app.url("/api/links"), &token, "{not json")
        .await;
    assert_eq!(res.status, 400);

    let res = app
        .client
        .post_with_auth(&app.url("/api/links"), &token, r#"{"title":"no url"}"#)
        .await;
    assert_eq!(res.status, 400);
}

// ═══ Links ═══

async fn create_link(app: &TestApp, token: &str, title: &str) -> i64 {
    let body = json!({ "title": title, "url": format!("https://example.com/{}", title), "icon": "github" });
    let res = app
        .client
        .post_with_auth(&app.url("/api/links"), token, &body.to_string())
        .await;
    assert_eq!(res.status, 201, "{}", res.body);
    res.json()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_link_lifecycle() {
    let app = TestApp::new().await;
    let token = app.token_for("alice", None);
    app.client.get_with_auth(&app.url("/api/profiles/me"), &token).await;

    let l1 = create_link(&app, &token, "one").await;
    let l2 = create_link(&app, &token, "two").await;
    let l3 = create_link(&app, &token, "three").await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/api/links/reorder"),
            &token,
            &json!({ "linkIds": [l3, l1, l2] }).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    let reordered: Vec<(i64, i64)> = res
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|l| (l["id"].as_i64().unwrap(), l["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(reordered, vec![(l3, 0), (l1, 1), (l2, 2)]);

    let res = app
        .client
        .patch_with_auth(
            &app.url(&format!("/api/links/{}", l1)),
            &token,
            r#"{"title":"uno"}"#,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json()["title"], "uno");
    assert_eq!(res.json()["iconKey"], "github");

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/links/{}", l1)), &token)
        .await;
    assert_eq!(res.status, 204);

    let me = app
        .client
        .get_with_auth(&app.url("/api/profiles/me"), &token)
        .await
        .json();
    let remaining: Vec<(i64, i64)> = me["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| (l["id"].as_i64().unwrap(), l["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(remaining, vec![(l3, 0), (l2, 2)]);
}

#[tokio::test]
async fn test_cannot_touch_another_users_link() {
    let app = TestApp::new().await;
    let alice = app.token_for("alice", None);
    let bob = app.token_for("bob", None);
    app.client.get_with_auth(&app.url("/api/profiles/me"), &alice).await;
    app.client.get_with_auth(&app.url("/api/profiles/me"), &bob).await;
    let bobs = create_link(&app, &bob, "mine").await;

    let url = app.url(&format!("/api/links/{}", bobs));
    let res = app.client.patch_with_auth(&url, &alice, r#"{"title":"x"}"#).await;
    assert_eq!(res.status, 404);
    let res = app.client.delete_with_auth(&url, &alice).await;
    assert_eq!(res.status, 404);

    let res = app
        .client
        .post_with_auth(
            &app.url("/api/links/reorder"),
            &alice,
            &json!({ "linkIds": [bobs] }).to_string(),
        )
        .await;
    assert_eq!(res.status, 404);
}

// ═══ Admin ═══

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = TestApp::new().await;
    let user = app.token_for("alice", Some("alice@example.com"));

    let res = app.client.get(&app.url("/api/admin/tags")).await;
    assert_eq!(res.status, 401);

    let res = app
        .client
        .get_with_auth(&app.url("/api/admin/tags"), &user)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.error_code(), "FORBIDDEN");

    let res = app
        .client
        .post_with_auth(&app.url("/api/admin/verify-tag"), &user, r#"{"tagId":"T1"}"#)
        .await;
    assert_eq!(res.status, 403);

    let res = app
        .client
        .get_with_auth(&app.url("/api/admin/tags"), &app.admin_token())
        .await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn test_admin_activates_user() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let token = app.token_for("alice", None);
    let me = app
        .client
        .get_with_auth(&app.url("/api/profiles/me"), &token)
        .await
        .json();
    let user_id = me["userId"].as_i64().unwrap();

    let res = app
        .client
        .post_with_auth(
            &app.url(&format!("/api/admin/activate/{}", user_id)),
            &admin,
            "",
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.json()["isActivated"], true);
    assert_eq!(res.json()["activatedBy"], "admin@tapcard.test");

    let public = app.client.get(&app.url("/api/public/profiles/alice")).await;
    assert_eq!(public.json()["isActivated"], true);

    let users = app
        .client
        .get_with_auth(&app.url("/api/admin/users"), &admin)
        .await;
    assert_eq!(users.json().as_array().map(Vec::len), Some(2));

    let res = app
        .client
        .post_with_auth(&app.url("/api/admin/activate/9999"), &admin, "")
        .await;
    assert_eq!(res.status, 404);
}

// ═══ NFC ═══

#[tokio::test]
async fn test_nfc_verify_and_claim_flow() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let alice = app.token_for("alice", None);
    let bob = app.token_for("bob", None);

    let check = app.client.get(&app.url("/api/nfc/check/T-100")).await;
    assert_eq!(check.json()["isVerified"], false);

    let res = app
        .client
        .post_with_auth(&app.url("/api/nfc/claim"), &alice, r#"{"tagId":"T-100"}"#)
        .await;
    assert_eq!(res.status, 404, "unknown tag");

    let res = app
        .client
        .post_with_auth(&app.url("/api/admin/verify-tag"), &admin, r#"{"tagId":"T-100"}"#)
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.json()["state"], "verified");

    let check = app.client.get(&app.url("/api/nfc/check/T-100")).await;
    assert_eq!(check.json()["isVerified"], true);

    let res = app
        .client
        .post_with_auth(&app.url("/api/nfc/claim"), &alice, r#"{"tagId":"T-100"}"#)
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.json()["state"], "claimed");

    let res = app
        .client
        .post_with_auth(&app.url("/api/nfc/claim"), &bob, r#"{"tagId":"T-100"}"#)
        .await;
    assert_eq!(res.status, 409);

    let mine = app
        .client
        .get_with_auth(&app.url("/api/nfc/me"), &alice)
        .await;
    assert_eq!(mine.status, 200);
    assert_eq!(mine.json()["tagId"], "T-100");

    let none = app.client.get_with_auth(&app.url("/api/nfc/me"), &bob).await;
    assert_eq!(none.status, 404);

    let tag = app
        .client
        .get_with_auth(&app.url("/api/admin/tags/T-100"), &admin)
        .await;
    assert_eq!(tag.status, 200);
    assert_eq!(tag.json()["verifiedBy"], "admin@tapcard.test");
}

#[tokio::test]
async fn test_claiming_unverified_tag_is_bad_request() {
    let app = TestApp::new().await;
    let alice = app.token_for("alice", None);

    // The admin API only ever writes verified tags; seed an unverified row directly.
    use sea_orm::{ActiveModelTrait, Set};
    let now = chrono::Utc::now().naive_utc();
    tapcard::models::nfc_tag::ActiveModel {
        tag_id: Set("RAW".to_string()),
        is_verified: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .unwrap();

    let res = app
        .client
        .post_with_auth(&app.url("/api/nfc/claim"), &alice, r#"{"tagId":"RAW"}"#)
        .await;
    assert_eq!(res.status, 400);
}

// ═══ QR ═══

#[tokio::test]
async fn test_qr_token_resolves_to_profile() {
    let app = TestApp::new().await;
    let token = app.token_for("alice", None);
    app.client.get_with_auth(&app.url("/api/profiles/me"), &token).await;

    let res = app
        .client
        .post_with_auth(&app.url("/api/profiles/qr/generate"), &token, "")
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    let json = res.json();
    let qr_token = json["token"].as_str().unwrap().to_string();
    assert_eq!(qr_token.len(), 64);
    assert!(json["expiresAt"].is_string());

    let res = app
        .client
        .get(&app.url(&format!("/api/public/qr/{}", qr_token)))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json()["slug"], "alice");

    let res = app.client.get(&app.url("/api/public/qr/not-a-token")).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn test_expired_qr_token_is_not_found() {
    let app = TestApp::new().await;
    let token = app.token_for("alice", None);
    let me = app
        .client
        .get_with_auth(&app.url("/api/profiles/me"), &token)
        .await
        .json();
    let user_id = me["userId"].as_i64().unwrap() as i32;

    let issued = qr::generate_token(&app.db, user_id, Duration::seconds(-1))
        .await
        .unwrap();

    let res = app
        .client
        .get(&app.url(&format!("/api/public/qr/{}", issued.token)))
        .await;
    assert_eq!(res.status, 404);
}
