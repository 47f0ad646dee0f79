//! Book model and related request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full book model (DB + API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    /// Unique business key
    pub isbn: String,
    pub author: String,
    /// Cover image URL
    pub image: String,
    pub pages: i32,
    pub publisher: String,
    pub subtitle: String,
    pub title: String,
    pub genre: Option<String>,
    pub year: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create book request. Also used for updates, which replace every field.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "isbn cannot be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "author cannot be empty"))]
    pub author: String,
    pub image: String,
    #[validate(range(min = 1, message = "pages must be positive"))]
    pub pages: i32,
    pub publisher: String,
    pub subtitle: String,
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: String,
    pub genre: Option<String>,
    pub year: String,
}

/// Optional filters for the general book search.
///
/// A field that is absent (or empty) imposes no constraint. `subtitle` and
/// `title` match by substring containment; every other field matches by
/// exact equality.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookFilter {
    pub isbn: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub image: Option<String>,
    pub pages: Option<i32>,
    pub publisher: Option<String>,
    pub subtitle: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
}

/// Optional filters for the narrower catalog search (exact match only)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CatalogFilter {
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<String>,
}
