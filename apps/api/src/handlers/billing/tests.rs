use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use eleads_application::ClientInput;
use eleads_domain::{Principal, Role};

use super::{create_invoice_handler, set_invoice_status_handler, update_invoice_handler};
use crate::dto::{InvoiceRequest, InvoiceStatusRequest};
use crate::error::ApiJson;
use crate::state::AppState;
use crate::test_support::{
    body_json, existing_workspace, in_memory_state, new_workspace, seed_account,
};

struct Billing {
    state: AppState,
    admin: Principal,
    manager: Principal,
    member: Principal,
    client_id: String,
}

async fn billing() -> Billing {
    let state = in_memory_state();
    let admin = seed_account(&state, "ada@example.com", new_workspace("Acme Inc")).await;
    let workspace = existing_workspace(&admin.workspace.id().to_string());
    let manager = seed_account(&state, "grace@example.com", workspace.clone()).await;
    let member = seed_account(&state, "alan@example.com", workspace).await;
    let admin = admin.user.principal();

    let promoted = state
        .user_service
        .update_user_access(&admin, manager.user.id, Role::Manager, Vec::new())
        .await;
    let Ok(manager) = promoted else {
        panic!("promotion should succeed");
    };

    let client = state
        .client_service
        .create_client(
            &admin,
            ClientInput {
                name: "Initech".to_owned(),
                ..ClientInput::default()
            },
        )
        .await;
    let Ok(client) = client else {
        panic!("client creation should succeed");
    };

    Billing {
        state,
        admin,
        manager: manager.principal(),
        member: member.user.principal(),
        client_id: client.id.to_string(),
    }
}

fn invoice(client_id: &str, number: &str) -> InvoiceRequest {
    InvoiceRequest {
        client_id: client_id.to_owned(),
        number: number.to_owned(),
        amount_cents: 12_500,
        currency: "eur".to_owned(),
        due_date: Some("2026-12-31".to_owned()),
    }
}

async fn issue(billing: &Billing, principal: Principal, number: &str) -> axum::response::Response {
    create_invoice_handler(
        State(billing.state.clone()),
        Extension(principal),
        ApiJson(invoice(&billing.client_id, number)),
    )
    .await
    .into_response()
}

#[tokio::test]
async fn only_billing_creators_issue_invoices() {
    let billing = billing().await;

    let by_member = issue(&billing, billing.member.clone(), "INV-001").await;
    assert_eq!(by_member.status(), StatusCode::FORBIDDEN);

    let by_manager = issue(&billing, billing.manager.clone(), "INV-001").await;
    assert_eq!(by_manager.status(), StatusCode::CREATED);
    let body = body_json(by_manager).await;
    assert_eq!(body["data"]["status"], "DRAFT");
    assert_eq!(body["data"]["currency"], "EUR");
    assert_eq!(body["data"]["due_date"], "2026-12-31");
}

#[tokio::test]
async fn duplicate_invoice_number_is_a_conflict() {
    let billing = billing().await;
    let first = issue(&billing, billing.manager.clone(), "INV-001").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = issue(&billing, billing.manager.clone(), "INV-001").await;

    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn paid_invoices_are_frozen() {
    let billing = billing().await;
    let created = body_json(issue(&billing, billing.manager.clone(), "INV-001").await).await;
    let invoice_id = created["data"]["id"].as_str().unwrap_or_default().to_owned();

    for status in ["SENT", "PAID"] {
        let response = set_invoice_status_handler(
            State(billing.state.clone()),
            Extension(billing.admin.clone()),
            Path(invoice_id.clone()),
            ApiJson(InvoiceStatusRequest {
                status: status.to_owned(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let edit = update_invoice_handler(
        State(billing.state.clone()),
        Extension(billing.manager.clone()),
        Path(invoice_id),
        ApiJson(invoice(&billing.client_id, "INV-001")),
    )
    .await
    .into_response();

    assert_eq!(edit.status(), StatusCode::BAD_REQUEST);
}
