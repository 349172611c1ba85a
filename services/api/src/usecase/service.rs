use cardoctor_core::error::AppError;
use cardoctor_domain::document::{Document, Filter};

use crate::domain::repository::DocumentCollection;
use crate::usecase::parse_id;

/// Fields returned by the single-service lookup, besides `_id`.
pub const SERVICE_PROJECTION: [&str; 4] = ["title", "price", "service_id", "img"];

// ── ListServices ──────────────────────────────────────────────────────────────

pub struct ListServicesUseCase<C: DocumentCollection> {
    pub services: C,
}

impl<C: DocumentCollection> ListServicesUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Document>, AppError> {
        self.services.find(&Filter::All).await
    }
}

// ── GetService ────────────────────────────────────────────────────────────────

pub struct GetServiceUseCase<C: DocumentCollection> {
    pub services: C,
}

impl<C: DocumentCollection> GetServiceUseCase<C> {
    pub async fn execute(&self, id: &str) -> Result<Option<Document>, AppError> {
        let id = parse_id(id)?;
        let service = self.services.find_one(id).await?;
        Ok(service.map(|doc| doc.project(&SERVICE_PROJECTION)))
    }
}
