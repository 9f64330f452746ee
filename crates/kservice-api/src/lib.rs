mod error;
pub use error::ApiError;

mod context;
pub use context::RequestContext;

mod handler;
pub use handler::ApiHandler;

mod request;
pub use request::CreateWorkerRequest;

mod adapter;
pub use adapter::PodApiAdapter;

mod pipeline;
pub use pipeline::Operation;

mod http;
pub use http::HttpApi;

pub use axum;
