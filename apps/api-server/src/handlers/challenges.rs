//! Food challenge endpoints.

use actix_web::{HttpResponse, web};

use mumii_core::domain::ChallengeStatus;
use mumii_shared::dto::{
    ChallengeQuery, ChallengesResponse, JoinChallengeRequest, JoinChallengeResponse,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/challenges?status=active|completed|available
///
/// Any other status value lists every challenge.
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ChallengeQuery>,
) -> AppResult<HttpResponse> {
    let status = query.status.as_deref().and_then(ChallengeStatus::parse);
    let challenges = state.catalog.challenges(status);

    Ok(HttpResponse::Ok().json(ChallengesResponse::from(challenges)))
}

/// POST /api/challenges/{id}/join
pub async fn join(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<JoinChallengeRequest>>,
) -> AppResult<HttpResponse> {
    let challenge_id = path.into_inner();

    if state.catalog.challenge(&challenge_id).is_none() {
        return Err(AppError::not_found("Challenge not found"));
    }

    let user_id = body
        .and_then(|b| b.into_inner().user_id)
        .unwrap_or_else(|| "anonymous".to_string());

    tracing::info!(challenge_id = %challenge_id, user_id = %user_id, "Challenge joined");

    Ok(HttpResponse::Ok().json(JoinChallengeResponse {
        success: true,
        message: format!("User {user_id} joined challenge {challenge_id}"),
        challenge_id,
    }))
}
