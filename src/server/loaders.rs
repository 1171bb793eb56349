use std::collections::HashMap;

use async_graphql::Context;

use crate::store::SharedRepository;

use super::dataloader::{BatchLoader, DataLoader};
use super::schema::{Author, Book};

pub trait Loaders {
    fn repository(&self) -> &SharedRepository;
    fn load_author(&self, id: i32) -> impl Future<Output = Option<Author>> + Send;
    fn load_books_by_author(&self, author_id: i32) -> impl Future<Output = Vec<Book>> + Send;
    /// Forgets everything loaded so far, so that resolvers running after a
    /// mutation observe its effects.
    fn forget_loaded(&self);
}

impl Loaders for Context<'_> {
    fn repository(&self) -> &SharedRepository {
        self.data_unchecked::<SharedRepository>()
    }

    fn load_author(&self, id: i32) -> impl Future<Output = Option<Author>> + Send {
        self.data_unchecked::<DataLoader<LoadAuthors>>().load(id)
    }

    fn load_books_by_author(&self, author_id: i32) -> impl Future<Output = Vec<Book>> + Send {
        let loader = self.data_unchecked::<DataLoader<LoadBooksByAuthor>>();
        async move { loader.load(author_id).await.unwrap_or_default() }
    }

    fn forget_loaded(&self) {
        self.data_unchecked::<DataLoader<LoadAuthors>>().clear();
        self.data_unchecked::<DataLoader<LoadBooksByAuthor>>().clear();
    }
}

pub struct LoadAuthors {
    repository: SharedRepository,
}

impl LoadAuthors {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }
}

impl BatchLoader for LoadAuthors {
    type K = i32;
    type V = Author;

    fn load_batch(
        &mut self,
        keys: Vec<Self::K>,
    ) -> impl Future<Output = HashMap<Self::K, Self::V>> + Send + 'static {
        let repository = self.repository.clone();
        async move {
            let authors: HashMap<_, _> = repository
                .authors_by_ids(&keys)
                .into_iter()
                .map(|(id, author)| (id, Author::from(author)))
                .collect();

            tracing::debug!(
                requested = keys.len(),
                found = authors.len(),
                "resolved authors"
            );
            authors
        }
    }
}

pub struct LoadBooksByAuthor {
    repository: SharedRepository,
}

impl LoadBooksByAuthor {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }
}

impl BatchLoader for LoadBooksByAuthor {
    type K = i32;
    type V = Vec<Book>;

    fn load_batch(
        &mut self,
        keys: Vec<Self::K>,
    ) -> impl Future<Output = HashMap<Self::K, Self::V>> + Send + 'static {
        let repository = self.repository.clone();
        async move {
            let books: HashMap<_, Vec<Book>> = repository
                .books_by_authors(&keys)
                .into_iter()
                .map(|(id, books)| (id, books.into_iter().map(Book::from).collect()))
                .collect();

            tracing::debug!(authors = keys.len(), "resolved books by author");
            books
        }
    }
}
