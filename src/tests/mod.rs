use std::sync::Arc;

use cynic::{MutationBuilder as _, QueryBuilder as _};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;

use crate::client::{
    AddBook, AddBookVariables, AuthorById, AuthorName, AuthorVariables, BookTitle, Catalogue,
    Client, DeleteAuthor, DeleteAuthorVariables,
};
use crate::store::{MemoryStore, Repository, SharedRepository};


fn seeded() -> (Arc<MemoryStore>, SharedRepository) {
    let store = Arc::new(MemoryStore::seeded());
    let repository: SharedRepository = store.clone();
    (store, repository)
}

#[tokio::test]
async fn lists_seeded_books_with_authors() {
    let (_, repository) = seeded();
    let server = testserver::Server::start(repository, true);
    let client = Client::new(server.graphql_url());

    let res = client.run(Catalogue::build(())).await.unwrap();
    assert!(res.errors.is_none(), "{:?}", res.errors);
    let books = res.data.unwrap().books;

    assert_eq!(books.len(), 8);
    assert_eq!(books[0].name, "Harry Potter and the Chamber of Secrets");
    assert_eq!(
        books[6].author,
        Some(AuthorName {
            id: 3,
            name: "Brent Weeks".into(),
        })
    );
}

#[tokio::test]
async fn added_book_is_visible_to_later_requests() {
    let (store, repository) = seeded();
    let server = testserver::Server::start(repository, true);
    let client = Client::new(server.graphql_url());

    let res = client
        .run(AddBook::build(AddBookVariables {
            name: "New Book".into(),
            author_id: 1,
        }))
        .await
        .unwrap();
    let payload = res.data.unwrap().add_book;
    assert!(payload.success);
    let book = payload.book.unwrap();
    assert_eq!((book.id, book.author_id), (9, 1));
    assert_eq!(store.books().len(), 9);

    let res = client
        .run(AuthorById::build(AuthorVariables { id: 1 }))
        .await
        .unwrap();
    let author = res.data.unwrap().author.unwrap();
    assert_eq!(
        author.books.last(),
        Some(&BookTitle {
            id: 9,
            name: "New Book".into(),
        })
    );
}

#[tokio::test]
async fn duplicate_book_is_rejected() {
    let (store, repository) = seeded();
    let server = testserver::Server::start(repository, true);
    let client = Client::new(server.graphql_url());

    let res = client
        .run(AddBook::build(AddBookVariables {
            name: "Beyond the Shadows".into(),
            author_id: 3,
        }))
        .await
        .unwrap();
    let payload = res.data.unwrap().add_book;

    assert!(!payload.success);
    assert_eq!(payload.book, None);
    assert_eq!(store.books().len(), 8);
}

#[tokio::test]
async fn deleting_an_author_orphans_their_books() {
    let (store, repository) = seeded();
    let server = testserver::Server::start(repository, true);
    let client = Client::new(server.graphql_url());

    let res = client
        .run(DeleteAuthor::build(DeleteAuthorVariables { id: 2 }))
        .await
        .unwrap();
    let payload = res.data.unwrap().delete_author;
    assert!(payload.success);
    assert_eq!(payload.author.map(|a| a.name).as_deref(), Some("J. R. R. Tolkien"));

    let res = client
        .run(DeleteAuthor::build(DeleteAuthorVariables { id: 2 }))
        .await
        .unwrap();
    assert!(!res.data.unwrap().delete_author.success);

    let res = client.run(Catalogue::build(())).await.unwrap();
    let books = res.data.unwrap().books;
    let orphans: Vec<_> = books.iter().filter(|b| b.author_id == 2).collect();
    assert_eq!(orphans.len(), 3);
    assert!(orphans.iter().all(|b| b.author.is_none()));
    assert_eq!(store.authors().len(), 2);
}

#[tokio::test]
async fn serves_home_and_graphiql_pages() {
    let (_, repository) = seeded();
    let server = testserver::Server::start(repository, true);

    let home = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(home.status(), StatusCode::OK);
    assert!(home.text().await.unwrap().contains("GraphQL - Demo Server"));

    let graphiql = reqwest::get(server.graphql_url()).await.unwrap();
    assert_eq!(graphiql.status(), StatusCode::OK);
    assert!(graphiql.text().await.unwrap().contains("graphiql"));
}

#[tokio::test]
async fn graphiql_can_be_disabled() {
    let (_, repository) = seeded();
    let server = testserver::Server::start(repository, false);

    let graphiql = reqwest::get(server.graphql_url()).await.unwrap();
    assert_eq!(graphiql.status(), StatusCode::METHOD_NOT_ALLOWED);

    let client = Client::new(server.graphql_url());
    let res = client.run(Catalogue::build(())).await.unwrap();
    assert_eq!(res.data.unwrap().books.len(), 8);
}
