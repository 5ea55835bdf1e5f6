//! Authentication handlers.

use actix_web::{HttpResponse, web};

use mumii_core::domain::NewUser;
use mumii_core::error::RepoError;
use mumii_core::ports::AuthError;
use mumii_infra::mask_email;
use mumii_shared::dto::{PublicUser, SigninRequest, SigninResponse, SignupRequest, SignupResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// A present, non-empty field.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(name), Some(email), Some(password)) = (
        required(req.name),
        required(req.email),
        required(req.password),
    ) else {
        return Err(AppError::bad_request("All fields are required"));
    };

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("User already exists"));
    }

    // Bcrypt is CPU-bound; keep it off the worker threads
    let passwords = state.passwords.clone();
    let password_hash = web::block(move || passwords.hash(&password)).await??;

    let user = state
        .users
        .insert(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            RepoError::Constraint(_) => AppError::conflict("User already exists"),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, user_email = %mask_email(&user.email), "User signed up");

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User created successfully".to_string(),
        user: PublicUser::summary(&user),
    }))
}

/// POST /api/auth/signin
///
/// Unknown email and wrong password get the same 401.
pub async fn signin(
    state: web::Data<AppState>,
    body: web::Json<SigninRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::debug!(user_email = %mask_email(&email), "Signin for unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    let passwords = state.passwords.clone();
    let hash = user.password_hash.clone();
    let valid = web::block(move || passwords.verify(&password, &hash)).await??;

    if !valid {
        tracing::debug!(user_id = %user.id, "Signin with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.generate_token(&user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "User signed in");

    Ok(HttpResponse::Ok().json(SigninResponse {
        message: "Login successful".to_string(),
        token,
        user: PublicUser::with_favorites(&user),
    }))
}
