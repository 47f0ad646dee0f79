//! Catalog service for book operations

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, CatalogFilter, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // isbn is unique; a duplicate is a conflict, not a database error
        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(
                "A book with this isbn already exists".to_string(),
            ));
        }

        self.repository.books.create(&book).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Replace every field of an existing book
    pub async fn update_book(&self, id: i32, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.books.isbn_exists(&book.isbn, Some(id)).await? {
            return Err(AppError::Conflict(
                "A book with this isbn already exists".to_string(),
            ));
        }

        self.repository
            .books
            .update(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.delete(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Search books matching every supplied filter field
    pub async fn search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        self.repository.books.search(filter).await
    }

    /// Search books by genre, publisher and year
    pub async fn search_catalog(&self, filter: &CatalogFilter) -> AppResult<Vec<Book>> {
        self.repository.books.search_catalog(filter).await
    }

    /// Get the unique book with the given isbn
    pub async fn find_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.repository
            .books
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with isbn {} not found", isbn)))
    }

    /// Get some book written by the given author
    pub async fn find_first_by_author(&self, author: &str) -> AppResult<Book> {
        self.repository
            .books
            .find_first_by_author(author)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No book by author {} found", author)))
    }
}
