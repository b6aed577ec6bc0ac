use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{LineupId, SignupToken, TicketId},
    error::{ApiError, ErrorCode},
    protocol::StudentProfile,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct ServerState {
    verify_calls: Arc<Mutex<Vec<DkuVerificationRequest>>>,
}

const GOOD_PASSWORD: &str = "correct-horse";

fn student() -> StudentProfile {
    StudentProfile {
        student_name: "Kim Dan".into(),
        student_id: "32201234".into(),
        age: "22".into(),
        gender: "F".into(),
        major: "Software".into(),
    }
}

async fn handle_verify(
    State(state): State<ServerState>,
    Json(payload): Json<DkuVerificationRequest>,
) -> Result<Json<DkuVerificationResponse>, (StatusCode, Json<ApiError>)> {
    state
        .verify_calls
        .lock()
        .expect("lock")
        .push(payload.clone());
    if payload.dku_password != GOOD_PASSWORD {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, "portal password mismatch")),
        ));
    }
    Ok(Json(DkuVerificationResponse {
        signup_token: SignupToken::new("signup-token-1"),
        student: student(),
    }))
}

async fn handle_reverify(Json(payload): Json<DkuVerificationRequest>) -> StatusCode {
    if payload.dku_password == GOOD_PASSWORD {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn handle_events() -> Json<Vec<FestivalEvent>> {
    Json(
        [1, 2, 3]
            .into_iter()
            .map(|id| FestivalEvent {
                id: EventId(id),
                name: format!("event {id}"),
                festival_date: None,
                ticketing_opens_at: None,
            })
            .collect(),
    )
}

async fn handle_my_ticket(
    Path(event_id): Path<i64>,
) -> Result<Json<TicketInfo>, (StatusCode, String)> {
    if event_id == 2 {
        return Err((StatusCode::NOT_FOUND, "no ticket".into()));
    }
    Ok(Json(TicketInfo {
        id: TicketId(event_id * 100),
        name: "Kim Dan".into(),
        major: "Software".into(),
        student_id: "32201234".into(),
        issued: false,
        turn: event_id as u32,
    }))
}

async fn handle_lineup(
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LineupInfo>>, StatusCode> {
    let date = match query.get("festivalDate").map(String::as_str) {
        Some("FIRST_DAY") => FestivalDate::FirstDay,
        Some("SECOND_DAY") => FestivalDate::SecondDay,
        Some("THIRD_DAY") => FestivalDate::ThirdDay,
        _ => return Err(StatusCode::BAD_REQUEST),
    };
    let base = match date {
        FestivalDate::FirstDay => 10,
        FestivalDate::SecondDay => 20,
        FestivalDate::ThirdDay => 30,
    };
    Ok(Json(
        (0..2)
            .map(|offset| LineupInfo {
                id: LineupId(base + offset),
                singer: format!("singer {}", base + offset),
                festival_date: date,
                image_url: None,
                performance_time: None,
            })
            .collect(),
    ))
}

async fn spawn_api_server() -> anyhow::Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route(routes::DKU_VERIFY, post(handle_verify))
        .route(routes::DKU_REVERIFY, post(handle_reverify))
        .route(routes::TICKET_EVENTS, get(handle_events))
        .route("/ticket/event/:event_id", get(handle_my_ticket))
        .route(routes::LINEUP, get(handle_lineup))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/"), state))
}

fn credentials(password: &str) -> DkuVerificationRequest {
    DkuVerificationRequest {
        dku_student_id: "32201234".into(),
        dku_password: password.into(),
    }
}

#[tokio::test]
async fn verify_returns_signup_token_and_profile() {
    let (api_url, state) = spawn_api_server().await.expect("spawn server");
    let client = FestaClient::new(api_url).expect("client");

    let response = client
        .verify(&credentials(GOOD_PASSWORD))
        .await
        .expect("verify");
    assert_eq!(response.signup_token, SignupToken::new("signup-token-1"));
    assert_eq!(response.student, student());

    let calls = state.verify_calls.lock().expect("lock");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].dku_student_id, "32201234");
}

#[tokio::test]
async fn verify_failure_surfaces_server_message() {
    let (api_url, _) = spawn_api_server().await.expect("spawn server");
    let client = FestaClient::new(api_url).expect("client");

    let err = client
        .verify(&credentials("wrong-password"))
        .await
        .expect_err("verify should fail");
    assert_eq!(err.to_string(), "portal password mismatch");
    assert_eq!(err.code(), Some(ErrorCode::Validation));
}

#[tokio::test]
async fn reverify_accepts_empty_payload_and_maps_status_errors() {
    let (api_url, _) = spawn_api_server().await.expect("spawn server");
    let client = FestaClient::new(api_url).expect("client");

    client
        .reverify(&credentials(GOOD_PASSWORD))
        .await
        .expect("reverify");

    let err = client
        .reverify(&credentials("nope"))
        .await
        .expect_err("reverify should fail");
    assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    assert_eq!(err.to_string(), "Unauthorized");
}

#[tokio::test]
async fn my_ticket_list_drops_failed_lookups_in_order() {
    let (api_url, _) = spawn_api_server().await.expect("spawn server");
    let client = FestaClient::new(api_url).expect("client");

    let tickets = my_ticket_list(&client).await.expect("ticket list");
    assert_eq!(tickets, vec![TicketId(100), TicketId(300)]);
}

#[tokio::test]
async fn full_lineup_concatenates_days_in_order() {
    let (api_url, _) = spawn_api_server().await.expect("spawn server");
    let client = FestaClient::new(api_url).expect("client");

    let lineup = full_lineup(&client).await.expect("lineup");
    let ids: Vec<i64> = lineup.iter().map(|entry| entry.id.0).collect();
    assert_eq!(ids, vec![10, 11, 20, 21, 30, 31]);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = FestaClient::with_timeout("http://127.0.0.1:1", Duration::from_secs(2))
        .expect("client");
    let err = client.list_events().await.expect_err("no server");
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.code(), None);
}

/// In-memory lookup where only the listed events resolve.
struct ScriptedTickets {
    ok: HashSet<i64>,
}

#[async_trait]
impl TicketApi for ScriptedTickets {
    async fn list_events(&self) -> ClientResult<Vec<FestivalEvent>> {
        Ok(Vec::new())
    }

    async fn my_ticket(&self, event_id: EventId) -> ClientResult<TicketInfo> {
        // Later ids resolve first so ordering cannot come from completion order.
        tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(event_id.0 as u64 * 5)))
            .await;
        if !self.ok.contains(&event_id.0) {
            return Err(ClientError::api(ErrorCode::NotFound, "no ticket"));
        }
        Ok(TicketInfo {
            id: TicketId(event_id.0),
            name: String::new(),
            major: String::new(),
            student_id: String::new(),
            issued: true,
            turn: 0,
        })
    }
}

#[tokio::test]
async fn resolve_tickets_keeps_exactly_the_successes_in_request_order() {
    let api = ScriptedTickets {
        ok: HashSet::from([1, 4, 6, 9]),
    };
    let requested: Vec<EventId> = [9, 1, 2, 6, 3, 4].into_iter().map(EventId).collect();

    let outcome = resolve_tickets(&api, &requested).await;
    let resolved: Vec<i64> = outcome.tickets.iter().map(|(id, _)| id.0).collect();
    let failed: Vec<i64> = outcome.failed.iter().map(|(id, _)| id.0).collect();

    assert_eq!(resolved, vec![9, 1, 6, 4]);
    assert_eq!(failed, vec![2, 3]);
}

#[tokio::test]
async fn resolve_tickets_with_no_events_is_empty() {
    let api = ScriptedTickets { ok: HashSet::new() };
    let outcome = resolve_tickets(&api, &[]).await;
    assert!(outcome.tickets.is_empty());
    assert!(outcome.failed.is_empty());
}
