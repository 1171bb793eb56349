use async_graphql::{Context, Object, SimpleObject};

use crate::store::StoreError;

use super::loaders::Loaders;
use super::schema::{Author, Book};

#[derive(SimpleObject, Debug)]
pub struct BookPayload {
    /// Whether the mutation succeeded.
    success: bool,
    /// The affected book, `null` when the mutation failed.
    book: Option<Book>,
}

impl BookPayload {
    fn new(book: Option<Book>) -> Self {
        Self {
            success: book.is_some(),
            book,
        }
    }
}

#[derive(SimpleObject, Debug)]
pub struct AuthorPayload {
    /// Whether the mutation succeeded.
    success: bool,
    /// The affected author, `null` when the mutation failed.
    author: Option<Author>,
}

impl AuthorPayload {
    fn new(author: Option<Author>) -> Self {
        Self {
            success: author.is_some(),
            author,
        }
    }
}

/// Turns a store outcome into the payload record. Rejections are only logged,
/// clients just see `success: false`.
fn settle<R, T: From<R>>(
    ctx: &Context<'_>,
    mutation: &'static str,
    outcome: Result<R, StoreError>,
) -> Option<T> {
    match outcome {
        Ok(record) => {
            ctx.forget_loaded();
            tracing::info!(mutation, "applied");
            Some(T::from(record))
        }
        Err(err) => {
            tracing::debug!(mutation, reason = %err, "rejected");
            None
        }
    }
}

/// Some GraphQL mutations to play around with the library.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Add a new book.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The new book title.")] name: String,
        #[graphql(desc = "The new book author's unique identifier.")] author_id: i32,
    ) -> BookPayload {
        let outcome = ctx.repository().add_book(&name, author_id);
        BookPayload::new(settle(ctx, "addBook", outcome))
    }

    /// Add a new author.
    async fn add_author(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The new author name.")] name: String,
    ) -> AuthorPayload {
        let outcome = ctx.repository().add_author(&name);
        AuthorPayload::new(settle(ctx, "addAuthor", outcome))
    }

    // Supplied fields that fail validation are left unchanged; the edit
    // fails when none is usable.
    /// Edit an existing book.
    async fn edit_book(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the book to edit.")] id: i32,
        #[graphql(desc = "The new book title.")] name: Option<String>,
        #[graphql(desc = "The new book author's unique identifier.")] author_id: Option<i32>,
    ) -> BookPayload {
        let outcome = ctx
            .repository()
            .edit_book(id, name.as_deref(), author_id);
        BookPayload::new(settle(ctx, "editBook", outcome))
    }

    /// Edit an existing author.
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the author to edit.")] id: i32,
        #[graphql(desc = "The new author name.")] name: Option<String>,
    ) -> AuthorPayload {
        let outcome = ctx.repository().edit_author(id, name.as_deref());
        AuthorPayload::new(settle(ctx, "editAuthor", outcome))
    }

    /// Delete an existing book.
    async fn delete_book(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the book to delete.")] id: i32,
    ) -> BookPayload {
        let outcome = ctx.repository().delete_book(id);
        BookPayload::new(settle(ctx, "deleteBook", outcome))
    }

    /// Delete an existing author. Their books are kept.
    async fn delete_author(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the author to delete.")] id: i32,
    ) -> AuthorPayload {
        let outcome = ctx.repository().delete_author(id);
        AuthorPayload::new(settle(ctx, "deleteAuthor", outcome))
    }
}
