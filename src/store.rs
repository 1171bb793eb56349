//! In-memory record store for authors and books.
//!
//! [`Records`] holds the two collections and the lookup primitives, all plain
//! linear scans. [`Repository`] is the surface the GraphQL layer sees; its
//! mutation methods validate and apply in one step. [`MemoryStore`] is the
//! only implementation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::datamodel::{Author, Book, seed_authors, seed_books};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("author {0} does not exist")]
    AuthorNotFound(i32),
    #[error("book {0} does not exist")]
    BookNotFound(i32),
    #[error("an author named `{0}` already exists")]
    DuplicateAuthorName(String),
    #[error("a book named `{0}` already exists")]
    DuplicateBookName(String),
    #[error("no usable new name given for author {0}")]
    NoAuthorChanges(i32),
    #[error("neither a usable new name nor an existing author id given for book {0}")]
    NoBookChanges(i32),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Default, Clone)]
pub struct Records {
    authors: Vec<Author>,
    books: Vec<Book>,
}

impl Records {
    pub fn new(authors: Vec<Author>, books: Vec<Book>) -> Self {
        Self { authors, books }
    }

    pub fn seeded() -> Self {
        Self::new(seed_authors(), seed_books())
    }

    pub fn author(&self, id: i32) -> Option<&Author> {
        self.authors.iter().find(|author| author.id == id)
    }

    pub fn book(&self, id: i32) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn books_by_author(&self, author_id: i32) -> impl Iterator<Item = &Book> {
        self.books
            .iter()
            .filter(move |book| book.author_id == author_id)
    }

    pub fn author_name_taken(&self, name: &str) -> bool {
        self.authors.iter().any(|author| author.name == name)
    }

    pub fn book_name_taken(&self, name: &str) -> bool {
        self.books.iter().any(|book| book.name == name)
    }

    /// Max-plus-one; `1` for an empty collection.
    pub fn next_author_id(&self) -> i32 {
        self.authors.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    /// Max-plus-one; `1` for an empty collection.
    pub fn next_book_id(&self) -> i32 {
        self.books.iter().map(|b| b.id).max().unwrap_or(0) + 1
    }

    pub fn append_author(&mut self, author: Author) {
        self.authors.push(author);
    }

    pub fn append_book(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Removes the first author equal to `author`.
    pub fn remove_author(&mut self, author: &Author) {
        if let Some(idx) = self.authors.iter().position(|a| a == author) {
            self.authors.remove(idx);
        }
    }

    /// Removes the first book equal to `book`.
    pub fn remove_book(&mut self, book: &Book) {
        if let Some(idx) = self.books.iter().position(|b| b == book) {
            self.books.remove(idx);
        }
    }
}

/// Everything the API layer may do with the stored records.
///
/// Lookups of a missing id yield `None`. Mutations are all-or-nothing: on
/// `Err` nothing was changed.
pub trait Repository: Send + Sync {
    fn author(&self, id: i32) -> Option<Author>;
    fn authors(&self) -> Vec<Author>;
    fn book(&self, id: i32) -> Option<Book>;
    fn books(&self) -> Vec<Book>;
    fn books_by_author(&self, author_id: i32) -> Vec<Book>;

    /// Looks up several authors in one pass. Ids that match nothing are
    /// absent from the result.
    fn authors_by_ids(&self, ids: &[i32]) -> HashMap<i32, Author>;

    /// Groups the books of several authors in one pass. Every requested id
    /// is present, possibly with no books.
    fn books_by_authors(&self, author_ids: &[i32]) -> HashMap<i32, Vec<Book>>;

    fn add_author(&self, name: &str) -> Result<Author>;
    fn add_book(&self, name: &str, author_id: i32) -> Result<Book>;
    fn edit_author(&self, id: i32, name: Option<&str>) -> Result<Author>;
    fn edit_book(&self, id: i32, name: Option<&str>, author_id: Option<i32>) -> Result<Book>;
    fn delete_author(&self, id: i32) -> Result<Author>;
    fn delete_book(&self, id: i32) -> Result<Book>;
}

pub type SharedRepository = Arc<dyn Repository>;

/// [`Repository`] over a lock-guarded [`Records`]. Each call holds the lock
/// for its whole duration and nothing longer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new(records: Records) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn seeded() -> Self {
        Self::new(Records::seeded())
    }

    pub fn shared(self) -> SharedRepository {
        Arc::new(self)
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Records {
        self.records.read().clone()
    }
}

impl Repository for MemoryStore {
    fn author(&self, id: i32) -> Option<Author> {
        self.records.read().author(id).cloned()
    }

    fn authors(&self) -> Vec<Author> {
        self.records.read().authors().to_vec()
    }

    fn book(&self, id: i32) -> Option<Book> {
        self.records.read().book(id).cloned()
    }

    fn books(&self) -> Vec<Book> {
        self.records.read().books().to_vec()
    }

    fn books_by_author(&self, author_id: i32) -> Vec<Book> {
        self.records
            .read()
            .books_by_author(author_id)
            .cloned()
            .collect()
    }

    fn authors_by_ids(&self, ids: &[i32]) -> HashMap<i32, Author> {
        let records = self.records.read();
        records
            .authors()
            .iter()
            .filter(|author| ids.contains(&author.id))
            .map(|author| (author.id, author.clone()))
            .collect()
    }

    fn books_by_authors(&self, author_ids: &[i32]) -> HashMap<i32, Vec<Book>> {
        let records = self.records.read();
        let mut books: HashMap<i32, Vec<Book>> = author_ids
            .iter()
            .map(|&id| (id, Vec::new()))
            .collect();
        for book in records.books() {
            if let Some(shelf) = books.get_mut(&book.author_id) {
                shelf.push(book.clone());
            }
        }
        books
    }

    fn add_author(&self, name: &str) -> Result<Author> {
        let mut records = self.records.write();
        if records.author_name_taken(name) {
            return Err(StoreError::DuplicateAuthorName(name.into()));
        }

        let author = Author {
            id: records.next_author_id(),
            name: name.into(),
        };
        records.append_author(author.clone());
        Ok(author)
    }

    fn add_book(&self, name: &str, author_id: i32) -> Result<Book> {
        let mut records = self.records.write();
        if records.book_name_taken(name) {
            return Err(StoreError::DuplicateBookName(name.into()));
        }
        if records.author(author_id).is_none() {
            return Err(StoreError::AuthorNotFound(author_id));
        }

        let book = Book {
            id: records.next_book_id(),
            name: name.into(),
            author_id,
        };
        records.append_book(book.clone());
        Ok(book)
    }

    fn edit_author(&self, id: i32, name: Option<&str>) -> Result<Author> {
        let mut records = self.records.write();
        let current = records
            .author(id)
            .cloned()
            .ok_or(StoreError::AuthorNotFound(id))?;

        let name = match name {
            Some(name) if records.author_name_taken(name) => {
                return Err(StoreError::DuplicateAuthorName(name.into()));
            }
            Some(name) if !name.is_empty() => name,
            _ => return Err(StoreError::NoAuthorChanges(id)),
        };

        records.remove_author(&current);
        let edited = Author {
            name: name.into(),
            ..current
        };
        records.append_author(edited.clone());
        Ok(edited)
    }

    fn edit_book(&self, id: i32, name: Option<&str>, author_id: Option<i32>) -> Result<Book> {
        let mut records = self.records.write();
        let current = records
            .book(id)
            .cloned()
            .ok_or(StoreError::BookNotFound(id))?;

        // A rejected field is left as it was; the edit only fails when no
        // field survives validation.
        let name = name.filter(|name| !name.is_empty() && !records.book_name_taken(name));
        let author_id = author_id.filter(|&author_id| records.author(author_id).is_some());
        if name.is_none() && author_id.is_none() {
            return Err(StoreError::NoBookChanges(id));
        }

        records.remove_book(&current);
        let edited = Book {
            id: current.id,
            name: name.map_or(current.name, Into::into),
            author_id: author_id.unwrap_or(current.author_id),
        };
        records.append_book(edited.clone());
        Ok(edited)
    }

    fn delete_author(&self, id: i32) -> Result<Author> {
        let mut records = self.records.write();
        let author = records
            .author(id)
            .cloned()
            .ok_or(StoreError::AuthorNotFound(id))?;
        records.remove_author(&author);
        Ok(author)
    }

    fn delete_book(&self, id: i32) -> Result<Book> {
        let mut records = self.records.write();
        let book = records
            .book(id)
            .cloned()
            .ok_or(StoreError::BookNotFound(id))?;
        records.remove_book(&book);
        Ok(book)
    }
}
