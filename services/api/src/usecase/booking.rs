use serde_json::{Map, Value};

use cardoctor_core::error::AppError;
use cardoctor_domain::document::{Document, Filter};
use cardoctor_domain::outcome::{DeleteResult, InsertOneResult, UpdateResult};

use crate::domain::repository::DocumentCollection;
use crate::usecase::parse_id;

// ── ListBookings ──────────────────────────────────────────────────────────────

pub struct ListBookingsInput {
    /// Email from the verified session token.
    pub identity_email: Option<String>,
    /// `email` query parameter.
    pub email: Option<String>,
}

pub struct ListBookingsUseCase<C: DocumentCollection> {
    pub bookings: C,
}

impl<C: DocumentCollection> ListBookingsUseCase<C> {
    /// Bookings owned by the caller.
    ///
    /// The requested email must be present and equal to the token's email;
    /// anything else is [`AppError::Forbidden`]. This is stricter than a plain
    /// inequality test: a token without an `email` claim is refused even when
    /// the query carries no `email` either, a case where two missing values
    /// would otherwise compare equal and pass.
    pub async fn execute(&self, input: ListBookingsInput) -> Result<Vec<Document>, AppError> {
        let email = match (input.email, input.identity_email) {
            (Some(requested), Some(owner)) if requested == owner => requested,
            (requested, owner) => {
                tracing::debug!(?requested, ?owner, "booking list for another identity");
                return Err(AppError::Forbidden);
            }
        };

        self.bookings.find(&Filter::field_eq("email", email)).await
    }
}

// ── CreateBooking ─────────────────────────────────────────────────────────────

pub struct CreateBookingUseCase<C: DocumentCollection> {
    pub bookings: C,
}

impl<C: DocumentCollection> CreateBookingUseCase<C> {
    pub async fn execute(
        &self,
        booking: Map<String, Value>,
    ) -> Result<InsertOneResult, AppError> {
        self.bookings.insert_one(booking).await
    }
}

// ── UpdateBookingStatus ───────────────────────────────────────────────────────

pub struct UpdateBookingStatusUseCase<C: DocumentCollection> {
    pub bookings: C,
}

impl<C: DocumentCollection> UpdateBookingStatusUseCase<C> {
    /// Set only the `status` field. A missing status is stored as `null`.
    pub async fn execute(
        &self,
        id: &str,
        status: Option<Value>,
    ) -> Result<UpdateResult, AppError> {
        let id = parse_id(id)?;
        let mut fields = Map::new();
        fields.insert("status".to_owned(), status.unwrap_or(Value::Null));
        self.bookings.set_fields(id, fields).await
    }
}

// ── DeleteBooking ─────────────────────────────────────────────────────────────

pub struct DeleteBookingUseCase<C: DocumentCollection> {
    pub bookings: C,
}

impl<C: DocumentCollection> DeleteBookingUseCase<C> {
    pub async fn execute(&self, id: &str) -> Result<DeleteResult, AppError> {
        let id = parse_id(id)?;
        self.bookings.delete_one(id).await
    }
}
