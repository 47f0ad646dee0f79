//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookFilter, CatalogFilter, CreateBook},
};

use super::AuthenticatedUser;

/// Create a new book
///
/// This endpoint is deliberately public: no credentials are required.
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "A book with this isbn already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Search books with optional filters
///
/// Every supplied filter must match (AND). `subtitle` and `title` match by
/// substring containment, the other fields by exact equality. With no
/// filters supplied, every stored book is returned. Result order is not
/// guaranteed.
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    security(("basic_auth" = [])),
    params(BookFilter),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<BookFilter>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.search(&filter).await?;
    Ok(Json(books))
}

/// Search books by genre, publisher and year
///
/// Narrower, index-friendly variant of the general search: the three
/// fields are optional and match by exact equality. Result order is not
/// guaranteed.
#[utoipa::path(
    get,
    path = "/api/books/catalog",
    tag = "books",
    security(("basic_auth" = [])),
    params(CatalogFilter),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn search_catalog(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<CatalogFilter>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.search_catalog(&filter).await?;
    Ok(Json(books))
}

/// Get the unique book with the given isbn
#[utoipa::path(
    get,
    path = "/api/books/isbn/{isbn}",
    tag = "books",
    security(("basic_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book isbn")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_by_isbn(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.find_by_isbn(&isbn).await?;
    Ok(Json(book))
}

/// Get some book written by the given author
///
/// When several books share the author, which one is returned is
/// implementation-chosen.
#[utoipa::path(
    get,
    path = "/api/books/author/{author}",
    tag = "books",
    security(("basic_auth" = [])),
    params(
        ("author" = String, Path, description = "Author name")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "No book by this author")
    )
)]
pub async fn first_book_by_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(author): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.find_first_by_author(&author).await?;
    Ok(Json(book))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    security(("basic_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book))
}

/// Update an existing book (full replace)
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    security(("basic_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found"),
        (status = 409, description = "A book with this isbn already exists")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(book): Json<CreateBook>,
) -> AppResult<Json<Book>> {
    let updated = state.services.books.update_book(id, book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    security(("basic_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
