use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptySubscription, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

mod dataloader;
mod loaders;
mod mutations;
mod schema;

use crate::store::SharedRepository;
use dataloader::DataLoader;
use loaders::{LoadAuthors, LoadBooksByAuthor};
use mutations::MutationRoot;
use schema::QueryRoot;

pub type LibrarySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

const HOME_PAGE: &str = r#"<html>
    <head>
        <title>GraphQL - Demo Server</title>
    </head>
    <body>
        <h1>GraphQL - Demo Server</h1>
        <p>
            Hello, World!
            <br>
            Let's learn GraphQL together :)
        </p>
        <p>
            <a href="/graphql"><b>Let's go</b></a>.
        </p>
    </body>
</html>
"#;

pub fn build_schema(repository: SharedRepository) -> LibrarySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(repository)
        .finish()
}

/// Runs one GraphQL request with fresh per-request loaders. Both front-ends
/// go through here; executing on the schema directly would leave nested
/// `author`/`books` fields waiting on loaders nobody drives.
pub async fn execute(
    schema: &LibrarySchema,
    repository: &SharedRepository,
    request: impl Into<async_graphql::Request>,
) -> async_graphql::Response {
    let load_authors = DataLoader::new(LoadAuthors::new(repository.clone()));
    let load_books = DataLoader::new(LoadBooksByAuthor::new(repository.clone()));
    let request = request
        .into()
        .data(load_authors.clone())
        .data(load_books.clone());

    let execute = schema.execute(request);
    load_books.wrap(load_authors.wrap(execute)).await
}

#[derive(Clone)]
struct AppState {
    schema: LibrarySchema,
    repository: SharedRepository,
}

async fn home() -> impl IntoResponse {
    Html(HOME_PAGE)
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[axum::debug_handler]
async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    execute(&state.schema, &state.repository, req.into_inner())
        .await
        .into()
}

pub fn make_app(repository: SharedRepository, graphiql_enabled: bool) -> Router {
    let schema = build_schema(repository.clone());

    let endpoint = if graphiql_enabled {
        get(graphiql).post(graphql_handler)
    } else {
        post(graphql_handler)
    };

    Router::new()
        .route("/", get(home))
        .route("/graphql", endpoint)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { schema, repository })
}
