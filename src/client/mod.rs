use cynic::http::{CynicReqwestError, ReqwestExt};
use cynic::serde;
use reqwest::Url;

pub struct Client {
    client: reqwest::Client,
    url: Url,
}

impl Client {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub async fn run<ResponseData, Input>(
        &self,
        op: cynic::Operation<ResponseData, Input>,
    ) -> Result<cynic::GraphQlResponse<ResponseData>, CynicReqwestError>
    where
        Input: serde::Serialize,
        ResponseData: serde::de::DeserializeOwned + 'static,
    {
        self.client.post(self.url.clone()).run_graphql(op).await
    }
}

#[cynic::schema("library")]
mod schema {}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "QueryRoot")]
pub struct Catalogue {
    pub books: Vec<Book>,
}

#[derive(cynic::QueryFragment, Debug, PartialEq)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    pub author: Option<AuthorName>,
}

#[derive(cynic::QueryFragment, Debug, PartialEq)]
#[cynic(graphql_type = "Author")]
pub struct AuthorName {
    pub id: i32,
    pub name: String,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct AuthorVariables {
    pub id: i32,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "QueryRoot", variables = "AuthorVariables")]
pub struct AuthorById {
    #[arguments(id: $id)]
    pub author: Option<Author>,
}

#[derive(cynic::QueryFragment, Debug, PartialEq)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub books: Vec<BookTitle>,
}

#[derive(cynic::QueryFragment, Debug, PartialEq)]
#[cynic(graphql_type = "Book")]
pub struct BookTitle {
    pub id: i32,
    pub name: String,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct AddBookVariables {
    pub name: String,
    pub author_id: i32,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "MutationRoot", variables = "AddBookVariables")]
pub struct AddBook {
    #[arguments(name: $name, authorId: $author_id)]
    pub add_book: BookPayload,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct DeleteAuthorVariables {
    pub id: i32,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "MutationRoot", variables = "DeleteAuthorVariables")]
pub struct DeleteAuthor {
    #[arguments(id: $id)]
    pub delete_author: AuthorPayload,
}

#[derive(cynic::QueryFragment, Debug, PartialEq)]
pub struct BookPayload {
    pub success: bool,
    pub book: Option<Book>,
}

#[derive(cynic::QueryFragment, Debug, PartialEq)]
pub struct AuthorPayload {
    pub success: bool,
    pub author: Option<AuthorName>,
}
