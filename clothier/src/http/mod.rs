//! HTTP session layer.
//!
//! Every remote call in the pipeline goes through the [`AsyncHttpClient`]
//! trait so that stages can be exercised against in-memory mocks. A run
//! obtains its client from an [`HttpConnector`], which opens one session
//! (connection pool) per run; dropping the client closes the pool.

mod client;
mod session;

pub use client::{AsyncHttpClient, HttpError, ReqwestClient};
pub use session::{load_auth_cookie, HttpConnector, ReqwestConnector, SessionConfig};

#[cfg(test)]
pub use client::tests::MockAsyncHttpClient;
#[cfg(test)]
pub use session::tests::MockConnector;
