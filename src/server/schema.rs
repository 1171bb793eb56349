use async_graphql::{ComplexObject, Context, Object, SimpleObject};

use crate::datamodel;

use super::loaders::Loaders;

/// This represents a book written by an author.
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
#[graphql(complex)]
pub struct Book {
    /// The book unique identifier.
    pub id: i32,
    /// The book title.
    pub name: String,
    /// The author's unique identifier.
    pub author_id: i32,
}

#[ComplexObject]
impl Book {
    /// The author's details.
    async fn author(&self, ctx: &Context<'_>) -> Option<Author> {
        ctx.load_author(self.author_id).await
    }
}

impl From<datamodel::Book> for Book {
    fn from(book: datamodel::Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            author_id: book.author_id,
        }
    }
}

/// This represents an author of a book.
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
#[graphql(complex)]
pub struct Author {
    /// The author unique identifier.
    pub id: i32,
    /// The author name.
    pub name: String,
}

#[ComplexObject]
impl Author {
    /// All of the author's books.
    async fn books(&self, ctx: &Context<'_>) -> Vec<Book> {
        ctx.load_books_by_author(self.id).await
    }
}

impl From<datamodel::Author> for Author {
    fn from(author: datamodel::Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
        }
    }
}

/// Some GraphQL endpoints to play around with the library.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Query the archived books.
    async fn books(&self, ctx: &Context<'_>) -> Vec<Book> {
        ctx.repository().books().into_iter().map(Book::from).collect()
    }

    /// Query the archived authors.
    async fn authors(&self, ctx: &Context<'_>) -> Vec<Author> {
        ctx.repository()
            .authors()
            .into_iter()
            .map(Author::from)
            .collect()
    }

    /// Get a single book data.
    async fn book(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The book unique identifier.")] id: i32,
    ) -> Option<Book> {
        ctx.repository().book(id).map(Book::from)
    }

    /// Get a single author data.
    async fn author(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The author unique identifier.")] id: i32,
    ) -> Option<Author> {
        ctx.repository().author(id).map(Author::from)
    }
}
