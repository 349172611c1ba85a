use std::sync::Arc;

use sea_orm::DatabaseConnection;

use cardoctor_auth_types::identity::AuthGate;
use cardoctor_domain::collection::Collection;

use crate::infra::db::DbCollection;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub token_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        db: impl Into<Arc<DatabaseConnection>>,
        token_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            db: db.into(),
            token_secret: token_secret.into(),
        }
    }

    pub fn services(&self) -> DbCollection {
        self.collection(Collection::Services)
    }

    pub fn bookings(&self) -> DbCollection {
        self.collection(Collection::Bookings)
    }

    pub fn users(&self) -> DbCollection {
        self.collection(Collection::Users)
    }

    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(Arc::clone(&self.token_secret))
    }

    fn collection(&self, collection: Collection) -> DbCollection {
        DbCollection {
            db: Arc::clone(&self.db),
            collection,
        }
    }
}
