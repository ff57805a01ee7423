use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use eleads_application::RegisteredAccount;
use eleads_domain::{Permission, Role};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;
use crate::state::AppState;
use crate::test_support::{
    TEST_PASSWORD, body_json, existing_workspace, in_memory_state, new_workspace, seed_account,
};

struct Workspace {
    state: AppState,
    router: Router,
    admin: RegisteredAccount,
    member: RegisteredAccount,
}

async fn workspace() -> Workspace {
    let state = in_memory_state();
    let admin = seed_account(&state, "ada@example.com", new_workspace("Acme Inc")).await;
    let member = seed_account(
        &state,
        "grace@example.com",
        existing_workspace(&admin.workspace.id().to_string()),
    )
    .await;
    let Ok(router) = build_router(state.clone(), "http://localhost:3000") else {
        panic!("router should build");
    };

    Workspace {
        state,
        router,
        admin,
        member,
    }
}

fn token_for(state: &AppState, account: &RegisteredAccount) -> String {
    let Ok(issued) = state.token_codec.issue(&account.user) else {
        panic!("token should be issued");
    };
    issued.token
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    payload: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match payload {
        Some(payload) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(payload.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("request should build");
    };

    router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {})
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let workspace = workspace().await;

    for uri in ["/invoices", "/leads", "/users", "/users/me"] {
        let response = send(&workspace.router, Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let forged = send(
        &workspace.router,
        Method::GET,
        "/leads",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let health = send(&workspace.router, Method::GET, "/health", None, None).await;
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn invoice_reads_and_writes_are_gated_separately() {
    let workspace = workspace().await;
    let member = token_for(&workspace.state, &workspace.member);

    let read = send(
        &workspace.router,
        Method::GET,
        "/invoices",
        Some(&member),
        None,
    )
    .await;
    assert_eq!(read.status(), StatusCode::OK);

    let write = send(
        &workspace.router,
        Method::POST,
        "/invoices",
        Some(&member),
        Some(json!({
            "client_id": "7f0c1f8e-4f3a-4d1e-9a59-2d8c2a1b3c4d",
            "number": "INV-001",
            "amount_cents": 1000,
            "currency": "EUR",
            "due_date": null
        })),
    )
    .await;
    assert_eq!(write.status(), StatusCode::FORBIDDEN);
    let body = body_json(write).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn user_management_requires_manage_users() {
    let workspace = workspace().await;
    let admin = token_for(&workspace.state, &workspace.admin);
    let member = token_for(&workspace.state, &workspace.member);

    let by_member = send(&workspace.router, Method::GET, "/users", Some(&member), None).await;
    assert_eq!(by_member.status(), StatusCode::FORBIDDEN);

    let by_admin = send(&workspace.router, Method::GET, "/users", Some(&admin), None).await;
    assert_eq!(by_admin.status(), StatusCode::OK);
    let body = body_json(by_admin).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let removal = send(
        &workspace.router,
        Method::DELETE,
        &format!("/users/{}", workspace.admin.user.id),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(removal.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn changing_access_also_requires_the_admin_role() {
    let workspace = workspace().await;
    let granted = workspace
        .state
        .user_service
        .update_user_access(
            &workspace.admin.user.principal(),
            workspace.member.user.id,
            Role::Manager,
            vec![Permission::ManageUsers],
        )
        .await;
    assert!(granted.is_ok());
    let manager = token_for(&workspace.state, &workspace.member);

    let listing = send(&workspace.router, Method::GET, "/users", Some(&manager), None).await;
    assert_eq!(listing.status(), StatusCode::OK);

    let change = send(
        &workspace.router,
        Method::PUT,
        &format!("/users/{}/access", workspace.admin.user.id),
        Some(&manager),
        Some(json!({ "role": "USER", "permissions": [] })),
    )
    .await;
    assert_eq!(change.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn access_changes_apply_to_existing_tokens() {
    let workspace = workspace().await;
    let member = token_for(&workspace.state, &workspace.member);

    let before = send(&workspace.router, Method::GET, "/users", Some(&member), None).await;
    assert_eq!(before.status(), StatusCode::FORBIDDEN);

    let granted = workspace
        .state
        .user_service
        .update_user_access(
            &workspace.admin.user.principal(),
            workspace.member.user.id,
            Role::User,
            vec![Permission::ManageUsers],
        )
        .await;
    assert!(granted.is_ok());

    let after = send(&workspace.router, Method::GET, "/users", Some(&member), None).await;
    assert_eq!(after.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleted_users_lose_access_immediately() {
    let workspace = workspace().await;
    let member = token_for(&workspace.state, &workspace.member);

    let deleted = workspace
        .state
        .user_service
        .delete_user(&workspace.admin.user.principal(), workspace.member.user.id)
        .await;
    assert!(deleted.is_ok());

    let requests = [
        (Method::GET, "/leads", None),
        (Method::POST, "/leads", Some(json!({ "name": "Peter" }))),
        (Method::GET, "/invoices", None),
        (Method::GET, "/users/me", None),
    ];
    for (method, uri, payload) in requests {
        let response = send(&workspace.router, method, uri, Some(&member), payload).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn register_and_login_are_public() {
    let workspace = workspace().await;

    let duplicate = send(
        &workspace.router,
        Method::POST,
        "/users/register",
        None,
        Some(json!({
            "user": {
                "email": "ada@example.com",
                "password": TEST_PASSWORD,
                "first_name": "Ada",
                "last_name": "Lovelace"
            },
            "workspace": { "name": "Globex" }
        })),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    let body = body_json(duplicate).await;
    assert_eq!(body["message"], "User already exists.");

    let login = send(
        &workspace.router,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let body = body_json(login).await;
    let token = body["data"]["token"].as_str().unwrap_or_default().to_owned();

    let me = send(&workspace.router, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(me.status(), StatusCode::OK);
    let body = body_json(me).await;
    assert_eq!(body["data"]["user"]["role"], "ADMIN");
}
