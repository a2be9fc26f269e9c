//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use common::error::StoreError;
use rust_decimal::Decimal;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    models::{LoginCredentials, NewUser},
    validation::{validate_login, validate_password},
};

use crate::{
    doc::ApiDoc,
    error::{ApiError, ApiResult, ErrorResponse},
    listing::ListingQuery,
    middleware::{AUTH_TOKEN_HEADER, AuthUser, auth_middleware, optional_auth_middleware},
    models::{
        LoginResponse, RegisterResponse,
        ad::{Ad, AdSummary, CreateAdRequest, ListAdsParams, NewAd},
    },
    ownership::resolve_is_owner,
    state::AppState,
};

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Prices are stored as `NUMERIC(12, 2)`
const PRICE_SCALE: u32 = 2;
const MAX_PRICE_CENTS: i64 = 999_999_999_999;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/ads", post(create_ad))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/ads", get(list_ads))
        .route("/ads/:id", get(get_ad))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "marketplace-api"
    }))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    request_body = LoginCredentials,
    tags = ["accounts"],
    security([]),
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid handle or password", body = ErrorResponse),
        (status = 409, description = "Handle already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginCredentials>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    validate_login(&payload.login).map_err(ApiError::Validation)?;
    validate_password(&payload.password).map_err(ApiError::Validation)?;

    match state
        .store(state.user_repository.get_by_handle(&payload.login))
        .await
    {
        Ok(_) => {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let password_hash = state
        .passwords
        .hash_async(payload.password)
        .await
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

    let new_user = NewUser::new(payload.login, password_hash);
    let user = state
        .store(state.user_repository.insert(&new_user))
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same handle
            StoreError::Conflict => ApiError::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;

    info!(guid = %user.guid, "Registered user {}", user.username);

    Ok(Json(RegisterResponse {
        guid: user.guid,
        username: user.username,
    }))
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginCredentials,
    tags = ["accounts"],
    security([]),
    responses(
        (
            status = 200,
            description = "Logged in",
            body = LoginResponse,
            headers(("X-Auth-Token" = String, description = "The issued access token"))
        ),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginCredentials>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let user = match state
        .store(state.user_repository.get_by_handle(&payload.login))
        .await
    {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            state.passwords.verify_decoy_async(payload.password).await;
            warn!("Login attempt for unknown user");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => return Err(e.into()),
    };

    if !state
        .passwords
        .verify_async(user.password_hash, payload.password)
        .await
    {
        warn!(guid = %user.guid, "Login attempt with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .jwt_service
        .generate_access_token(user.guid)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    let header_value = HeaderValue::from_str(&token).map_err(|e| {
        error!("Token is not a valid header value: {}", e);
        ApiError::InternalServerError
    })?;

    info!(guid = %user.guid, "User logged in");

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    };

    Ok((
        StatusCode::OK,
        [(AUTH_TOKEN_HEADER, header_value)],
        Json(response),
    ))
}

fn validate_new_ad(payload: &CreateAdRequest) -> Result<(), String> {
    let title_len = payload.title.chars().count();
    if title_len == 0 || title_len > MAX_TITLE_LEN {
        return Err(format!(
            "Title must be between 1 and {MAX_TITLE_LEN} characters"
        ));
    }

    let description_len = payload.description.chars().count();
    if description_len == 0 || description_len > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "Description must be between 1 and {MAX_DESCRIPTION_LEN} characters"
        ));
    }

    if payload.price < Decimal::ZERO {
        return Err("Price must not be negative".to_string());
    }

    let max_price = Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE);
    if payload.price > max_price {
        return Err(format!("Price must not exceed {max_price}"));
    }

    if payload.price.normalize().scale() > PRICE_SCALE {
        return Err(format!(
            "Price must have at most {PRICE_SCALE} decimal places"
        ));
    }

    Url::parse(&payload.image_url).map_err(|_| "Image URL must be an absolute URL".to_string())?;

    Ok(())
}

/// Create a new ad owned by the caller
#[utoipa::path(
    post,
    path = "/ads",
    request_body = CreateAdRequest,
    tags = ["ads"],
    responses(
        (status = 200, description = "Ad created", body = Ad),
        (status = 400, description = "Invalid ad fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_ad(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateAdRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    validate_new_ad(&payload).map_err(ApiError::Validation)?;

    // A token can outlive its account
    match state.store(state.user_repository.get_by_id(user.id)).await {
        Ok(_) => {}
        Err(StoreError::NotFound) => return Err(ApiError::Unauthorized),
        Err(e) => return Err(e.into()),
    }

    let new_ad = NewAd {
        user_guid: user.id,
        title: payload.title,
        description: payload.description,
        image_url: payload.image_url,
        price: payload.price,
    };

    let ad = state.store(state.ad_repository.insert(&new_ad)).await?;

    Ok(Json(ad))
}

/// List ads with paging, sorting and price filters
#[utoipa::path(
    get,
    path = "/ads",
    params(ListAdsParams),
    tags = ["ads"],
    security((), ("bearer" = []), ("auth_token" = [])),
    responses(
        (status = 200, description = "One page of ads", body = [AdSummary]),
        (status = 400, description = "Malformed price bound", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ads(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Query(params): Query<ListAdsParams>,
) -> ApiResult<impl IntoResponse> {
    let query = ListingQuery::from_params(&params)?;
    let viewer = viewer.map(|Extension(user)| user);

    let ads = state.store(state.ad_repository.list(&query)).await?;

    let summaries: Vec<AdSummary> = ads
        .into_iter()
        .map(|ad| {
            let is_owner = resolve_is_owner(viewer.as_ref(), ad.user_guid);
            AdSummary::new(ad, is_owner)
        })
        .collect();

    Ok(Json(summaries))
}

/// Get a single ad by id
#[utoipa::path(
    get,
    path = "/ads/{id}",
    params(("id" = i64, Path, description = "Positive ad id")),
    tags = ["ads"],
    security((), ("bearer" = []), ("auth_token" = [])),
    responses(
        (status = 200, description = "The ad", body = AdSummary),
        (status = 400, description = "Id is not a positive integer", body = ErrorResponse),
        (status = 404, description = "No such ad", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_ad(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = id
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::Validation("Ad id must be a positive integer".to_string()))?;

    let ad = match state.store(state.ad_repository.get_by_id(id)).await {
        Ok(ad) => ad,
        Err(StoreError::NotFound) => return Err(ApiError::NotFound),
        Err(e) => return Err(e.into()),
    };

    let is_owner = resolve_is_owner(viewer.as_ref().map(|Extension(user)| user), ad.user_guid);

    Ok(Json(AdSummary::new(ad, is_owner)))
}
