use std::sync::Arc;

use crate::admin::AdminGateway;
use crate::auth::{AuthService, TokenCodec};
use crate::config::Config;
use crate::store::{DocumentStore, ObjectStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub users: Arc<dyn UserStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub auth: AuthService,
    pub admin: AdminGateway,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        documents: Arc<dyn DocumentStore>,
        users: Arc<dyn UserStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let tokens = TokenCodec::new(&config.jwt_secret);
        let auth = AuthService::new(users.clone(), tokens.clone());
        let admin = AdminGateway::new(
            config.admin_email.clone(),
            config.admin_password.clone(),
            tokens,
        );
        Self {
            documents,
            users,
            objects,
            auth,
            admin,
            config,
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::store::memory::{MemoryDocumentStore, MemoryObjectStore, MemoryUserStore};

    /// An `AppState` over in-memory stores, with handles to inspect them.
    pub struct TestApp {
        pub state: AppState,
        pub documents: Arc<MemoryDocumentStore>,
        pub users: Arc<MemoryUserStore>,
        pub objects: Arc<MemoryObjectStore>,
    }

    pub fn test_app() -> TestApp {
        let documents = Arc::new(MemoryDocumentStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let state = AppState::new(
            Config::for_tests(),
            documents.clone(),
            users.clone(),
            objects.clone(),
        );
        TestApp {
            state,
            documents,
            users,
            objects,
        }
    }
}
