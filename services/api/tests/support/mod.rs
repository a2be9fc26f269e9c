//! Shared helpers for the HTTP tests: in-memory stores and request plumbing.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use api::{
    listing::{ListingQuery, SortField, SortOrder},
    models::ad::{Ad, AdWithAuthor, NewAd},
    repositories::AdStore,
    routes::create_router,
    state::AppState,
};
use async_trait::async_trait;
use auth::{
    JwtConfig, JwtService, PasswordService,
    models::{NewUser, User},
    password::Params,
    repositories::UserStore,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::Utc;
use common::error::{StoreError, StoreResult};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Users and ads kept in memory, mirroring the Postgres schema's rules
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    ads: Mutex<Vec<Ad>>,
}

impl InMemoryStore {
    pub fn ad_count(&self) -> usize {
        self.ads.lock().unwrap().len()
    }

    fn with_author(&self, ad: &Ad) -> StoreResult<AdWithAuthor> {
        let users = self.users.lock().unwrap();
        let author = users.get(&ad.user_guid).ok_or(StoreError::NotFound)?;
        Ok(AdWithAuthor {
            id: ad.id,
            user_guid: ad.user_guid,
            author_login: author.username.clone(),
            title: ad.title.clone(),
            description: ad.description.clone(),
            image_url: ad.image_url.clone(),
            price: ad.price,
            created_at: ad.created_at,
        })
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, new_user: &NewUser) -> StoreResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            guid: new_user.guid,
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.insert(user.guid, user.clone());
        Ok(user)
    }

    async fn get_by_handle(&self, username: &str) -> StoreResult<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, guid: Uuid) -> StoreResult<User> {
        self.users
            .lock()
            .unwrap()
            .get(&guid)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, guid: Uuid) -> StoreResult<()> {
        self.users
            .lock()
            .unwrap()
            .remove(&guid)
            .ok_or(StoreError::NotFound)?;
        self.ads.lock().unwrap().retain(|ad| ad.user_guid != guid);
        Ok(())
    }
}

#[async_trait]
impl AdStore for InMemoryStore {
    async fn insert(&self, new_ad: &NewAd) -> StoreResult<Ad> {
        let mut ads = self.ads.lock().unwrap();
        let ad = Ad {
            id: ads.iter().map(|ad| ad.id).max().unwrap_or(0) + 1,
            user_guid: new_ad.user_guid,
            title: new_ad.title.clone(),
            description: new_ad.description.clone(),
            image_url: new_ad.image_url.clone(),
            price: new_ad.price,
            created_at: Utc::now(),
        };
        ads.push(ad.clone());
        Ok(ad)
    }

    async fn list(&self, query: &ListingQuery) -> StoreResult<Vec<AdWithAuthor>> {
        let mut matching: Vec<Ad> = self
            .ads
            .lock()
            .unwrap()
            .iter()
            .filter(|ad| query.admits(ad.price))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::Price => a.price.cmp(&b.price),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            }
            .then(a.id.cmp(&b.id));
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        matching
            .iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .map(|ad| self.with_author(ad))
            .collect()
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<AdWithAuthor> {
        let ad = self
            .ads
            .lock()
            .unwrap()
            .iter()
            .find(|ad| ad.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        self.with_author(&ad)
    }
}

/// Ad store whose listing never finishes in time
pub struct StalledAdStore;

#[async_trait]
impl AdStore for StalledAdStore {
    async fn insert(&self, _new_ad: &NewAd) -> StoreResult<Ad> {
        Err(StoreError::Timeout)
    }

    async fn list(&self, _query: &ListingQuery) -> StoreResult<Vec<AdWithAuthor>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    async fn get_by_id(&self, _id: i64) -> StoreResult<AdWithAuthor> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(StoreError::NotFound)
    }
}

pub fn jwt_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: JWT_SECRET.to_string(),
        access_token_expiry: 900,
    })
    .unwrap()
}

pub fn state_with(users: Arc<dyn UserStore>, ads: Arc<dyn AdStore>, timeout: Duration) -> AppState {
    AppState {
        jwt_service: jwt_service(),
        passwords: PasswordService::with_params(Params::new(1024, 1, 1, None).unwrap()),
        user_repository: users,
        ad_repository: ads,
        store_timeout: timeout,
    }
}

/// Router over a fresh in-memory store
pub fn app() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let state = state_with(store.clone(), store.clone(), Duration::from_secs(5));
    (create_router(state), store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn register(app: &Router, login: &str, password: &str) -> TestResponse {
    send(
        app,
        json_request(
            "POST",
            "/register",
            None,
            json!({ "login": login, "password": password }),
        ),
    )
    .await
}

pub async fn login(app: &Router, login: &str, password: &str) -> TestResponse {
    send(
        app,
        json_request(
            "POST",
            "/login",
            None,
            json!({ "login": login, "password": password }),
        ),
    )
    .await
}

/// Register and log in, returning the access token
pub async fn sign_up(app: &Router, handle: &str) -> String {
    let registered = register(app, handle, "Passw0rd!").await;
    assert_eq!(registered.status, StatusCode::OK, "{:?}", registered.body);
    let logged_in = login(app, handle, "Passw0rd!").await;
    assert_eq!(logged_in.status, StatusCode::OK, "{:?}", logged_in.body);
    logged_in.body["token"].as_str().unwrap().to_string()
}

pub async fn create_ad(app: &Router, token: &str, title: &str, price: f64) -> i64 {
    let response = send(
        app,
        json_request(
            "POST",
            "/ads",
            Some(token),
            json!({
                "title": title,
                "description": format!("{title} in good condition"),
                "image_url": "https://example.com/image.png",
                "price": price,
            }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["id"].as_i64().unwrap()
}
