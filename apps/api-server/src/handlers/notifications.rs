//! Push notification endpoints. Subscriptions are kept in memory and
//! "sending" only logs.

use actix_web::{HttpResponse, web};

use mumii_shared::dto::{AckResponse, SendNotificationRequest, SubscribeRequest};

use crate::middleware::error::AppResult;
use crate::state::{AppState, PushSubscription};

/// POST /api/notifications/subscribe
pub async fn subscribe(
    state: web::Data<AppState>,
    body: web::Json<SubscribeRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let total = state
        .save_subscription(PushSubscription {
            user_id: req.user_id,
            subscription: req.subscription,
        })
        .await;

    tracing::info!(total, "New push subscription");
    Ok(HttpResponse::Ok().json(AckResponse::ok("Subscription saved successfully")))
}

/// POST /api/notifications/send
pub async fn send(
    state: web::Data<AppState>,
    body: web::Json<SendNotificationRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let recipients = state
        .subscriptions
        .read()
        .await
        .iter()
        .filter(|s| req.user_id.is_none() || s.user_id == req.user_id)
        .count();

    tracing::info!(
        user_id = ?req.user_id,
        title = %req.title,
        body = ?req.body,
        has_data = req.data.is_some(),
        recipients,
        "Sending notification"
    );

    Ok(HttpResponse::Ok().json(AckResponse::ok("Notification sent successfully")))
}
