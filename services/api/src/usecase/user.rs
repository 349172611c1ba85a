use serde_json::{Map, Value};

use cardoctor_core::error::AppError;
use cardoctor_domain::document::{Document, Filter};
use cardoctor_domain::outcome::InsertOneResult;

use crate::domain::repository::DocumentCollection;
use crate::usecase::parse_id;

pub struct ListUsersUseCase<C: DocumentCollection> {
    pub users: C,
}

impl<C: DocumentCollection> ListUsersUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Document>, AppError> {
        self.users.find(&Filter::All).await
    }
}

pub struct GetUserUseCase<C: DocumentCollection> {
    pub users: C,
}

impl<C: DocumentCollection> GetUserUseCase<C> {
    pub async fn execute(&self, id: &str) -> Result<Option<Document>, AppError> {
        self.users.find_one(parse_id(id)?).await
    }
}

pub struct CreateUserUseCase<C: DocumentCollection> {
    pub users: C,
}

impl<C: DocumentCollection> CreateUserUseCase<C> {
    pub async fn execute(&self, user: Map<String, Value>) -> Result<InsertOneResult, AppError> {
        self.users.insert_one(user).await
    }
}
