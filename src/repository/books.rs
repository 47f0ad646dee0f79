//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, BookFilter, CatalogFilter, CreateBook},
};

/// A single bind value for the dynamically built filter queries
#[derive(Debug, PartialEq)]
enum Bind {
    Text(String),
    Int(i32),
}

fn push_exact(conditions: &mut Vec<String>, binds: &mut Vec<Bind>, column: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.is_empty() {
            binds.push(Bind::Text(v.to_string()));
            conditions.push(format!("{} = ${}", column, binds.len()));
        }
    }
}

fn push_contains(conditions: &mut Vec<String>, binds: &mut Vec<Bind>, column: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.is_empty() {
            binds.push(Bind::Text(format!("%{}%", v)));
            conditions.push(format!("{} LIKE ${}", column, binds.len()));
        }
    }
}

/// Build the conjunction of per-field conditions for the general filter.
///
/// Only supplied, non-empty fields participate. `subtitle` and `title`
/// match by case-sensitive substring containment (LIKE); every other
/// field matches by exact equality.
fn build_filter(filter: &BookFilter) -> (String, Vec<Bind>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    push_exact(&mut conditions, &mut binds, "isbn", filter.isbn.as_deref());
    push_exact(&mut conditions, &mut binds, "author", filter.author.as_deref());
    push_exact(&mut conditions, &mut binds, "genre", filter.genre.as_deref());
    push_exact(&mut conditions, &mut binds, "image", filter.image.as_deref());
    if let Some(pages) = filter.pages {
        binds.push(Bind::Int(pages));
        conditions.push(format!("pages = ${}", binds.len()));
    }
    push_exact(&mut conditions, &mut binds, "publisher", filter.publisher.as_deref());
    push_contains(&mut conditions, &mut binds, "subtitle", filter.subtitle.as_deref());
    push_contains(&mut conditions, &mut binds, "title", filter.title.as_deref());
    push_exact(&mut conditions, &mut binds, "year", filter.year.as_deref());

    if conditions.is_empty() {
        ("TRUE".to_string(), binds)
    } else {
        (conditions.join(" AND "), binds)
    }
}

/// Same optional-exact-match construction restricted to genre, publisher
/// and year.
fn build_catalog_filter(filter: &CatalogFilter) -> (String, Vec<Bind>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    push_exact(&mut conditions, &mut binds, "genre", filter.genre.as_deref());
    push_exact(&mut conditions, &mut binds, "publisher", filter.publisher.as_deref());
    push_exact(&mut conditions, &mut binds, "year", filter.year.as_deref());

    if conditions.is_empty() {
        ("TRUE".to_string(), binds)
    } else {
        (conditions.join(" AND "), binds)
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Get the unique book with the given isbn
    pub async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Get some book written by the given author, if any.
    ///
    /// Which one is returned among several is implementation-chosen.
    pub async fn find_first_by_author(&self, author: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE author = $1 LIMIT 1")
            .bind(author)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Search books matching every supplied filter field.
    ///
    /// Result order is unspecified: there is no ORDER BY and callers must
    /// not rely on any particular ordering.
    pub async fn search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let (where_clause, binds) = build_filter(filter);
        let query = format!("SELECT * FROM books WHERE {}", where_clause);

        let mut builder = sqlx::query_as::<_, Book>(&query);
        for bind in &binds {
            builder = match bind {
                Bind::Text(v) => builder.bind(v),
                Bind::Int(v) => builder.bind(v),
            };
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Search books by the narrower genre/publisher/year filter.
    ///
    /// Result order is unspecified, as for `search`.
    pub async fn search_catalog(&self, filter: &CatalogFilter) -> AppResult<Vec<Book>> {
        let (where_clause, binds) = build_catalog_filter(filter);
        let query = format!("SELECT * FROM books WHERE {}", where_clause);

        let mut builder = sqlx::query_as::<_, Book>(&query);
        for bind in &binds {
            builder = match bind {
                Bind::Text(v) => builder.bind(v),
                Bind::Int(v) => builder.bind(v),
            };
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Check if a book with this isbn already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                isbn, author, image, pages, publisher, subtitle, title, genre, year,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.author)
        .bind(&book.image)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.subtitle)
        .bind(&book.title)
        .bind(&book.genre)
        .bind(&book.year)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replace every field of an existing book
    pub async fn update(&self, id: i32, book: &CreateBook) -> AppResult<Option<Book>> {
        let now = Utc::now();

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET isbn = $1, author = $2, image = $3, pages = $4, publisher = $5,
                subtitle = $6, title = $7, genre = $8, year = $9, updated_at = $10
            WHERE id = $11
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.author)
        .bind(&book.image)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.subtitle)
        .bind(&book.title)
        .bind(&book.genre)
        .bind(&book.year)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a book. Returns false when no row had this id.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        let (clause, binds) = build_filter(&BookFilter::default());
        assert_eq!(clause, "TRUE");
        assert!(binds.is_empty());
    }

    #[test]
    fn title_filter_uses_substring_containment() {
        let filter = BookFilter {
            title: Some("raven".to_string()),
            ..Default::default()
        };
        let (clause, binds) = build_filter(&filter);
        assert_eq!(clause, "title LIKE $1");
        assert_eq!(binds, vec![Bind::Text("%raven%".to_string())]);
    }

    #[test]
    fn exact_fields_use_equality() {
        let filter = BookFilter {
            genre: Some("Narrative Poem".to_string()),
            year: Some("1845".to_string()),
            ..Default::default()
        };
        let (clause, binds) = build_filter(&filter);
        assert_eq!(clause, "genre = $1 AND year = $2");
        assert_eq!(
            binds,
            vec![
                Bind::Text("Narrative Poem".to_string()),
                Bind::Text("1845".to_string()),
            ]
        );
    }

    #[test]
    fn all_nine_fields_are_numbered_in_order() {
        let filter = BookFilter {
            isbn: Some("978-3-16-148410-0".to_string()),
            author: Some("Edgar Alan Poe".to_string()),
            genre: Some("Narrative Poem".to_string()),
            image: Some("http://my-image.net/book".to_string()),
            pages: Some(33),
            publisher: Some("El planeta".to_string()),
            subtitle: Some("and other poems".to_string()),
            title: Some("The raven".to_string()),
            year: Some("1845".to_string()),
        };
        let (clause, binds) = build_filter(&filter);
        assert_eq!(
            clause,
            "isbn = $1 AND author = $2 AND genre = $3 AND image = $4 AND pages = $5 \
             AND publisher = $6 AND subtitle LIKE $7 AND title LIKE $8 AND year = $9"
        );
        assert_eq!(binds.len(), 9);
        assert_eq!(binds[4], Bind::Int(33));
        assert_eq!(binds[6], Bind::Text("%and other poems%".to_string()));
    }

    #[test]
    fn empty_strings_impose_no_constraint() {
        let filter = BookFilter {
            isbn: Some(String::new()),
            title: Some(String::new()),
            author: Some("Edgar Alan Poe".to_string()),
            ..Default::default()
        };
        let (clause, binds) = build_filter(&filter);
        assert_eq!(clause, "author = $1");
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn catalog_filter_is_exact_on_three_fields() {
        let filter = CatalogFilter {
            genre: Some("Narrative Poem".to_string()),
            publisher: None,
            year: Some("1845".to_string()),
        };
        let (clause, binds) = build_catalog_filter(&filter);
        assert_eq!(clause, "genre = $1 AND year = $2");
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn empty_catalog_filter_matches_everything() {
        let (clause, binds) = build_catalog_filter(&CatalogFilter::default());
        assert_eq!(clause, "TRUE");
        assert!(binds.is_empty());
    }
}
