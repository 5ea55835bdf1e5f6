//! Social sharing. Shares are only logged.

use actix_web::{HttpResponse, web};

use mumii_shared::dto::{ShareRequest, ShareResponse};

use crate::middleware::error::{AppError, AppResult};

/// POST /api/social/share
pub async fn share(body: web::Json<ShareRequest>) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let platform = req
        .platform
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("platform is required"))?;

    tracing::info!(
        platform = %platform,
        url = ?req.url,
        content = ?req.content,
        "Content shared"
    );

    Ok(HttpResponse::Ok().json(ShareResponse {
        success: true,
        message: format!("Content shared successfully on {platform}"),
        share_url: req.url,
        platform,
        timestamp: chrono::Utc::now(),
    }))
}
