//! Application state shared across handlers

use std::{future::Future, sync::Arc, time::Duration};

use auth::{JwtService, PasswordService, repositories::UserStore};
use common::{database::with_deadline, error::StoreResult};

use crate::repositories::AdStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub passwords: PasswordService,
    pub user_repository: Arc<dyn UserStore>,
    pub ad_repository: Arc<dyn AdStore>,
    /// Upper bound on any single store call made for a request
    pub store_timeout: Duration,
}

impl AppState {
    /// Run a store call under the request deadline
    pub async fn store<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        with_deadline(self.store_timeout, fut).await
    }
}
