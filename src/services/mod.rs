pub mod error;
pub mod transport;
pub mod auth_link;
pub mod graphql;
pub mod operations;
pub mod graphql_client;
pub mod api_client;

pub use error::{ClientError, GraphQlError};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use auth_link::AuthenticatedTransport;
pub use graphql::Operation;
pub use graphql_client::{FetchPolicy, GraphQlClient, QueryKey};
pub use api_client::ApiClient;
