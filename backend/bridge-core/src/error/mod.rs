pub mod config;
pub mod content;
pub mod form;
pub mod host;
pub mod http_request;
pub mod loader;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Loader(#[from] loader::LoaderError),

    #[error(transparent)]
    Content(#[from] content::ContentError),

    #[error(transparent)]
    HttpRequest(#[from] http_request::HttpRequestError),

    #[error(transparent)]
    Form(#[from] form::FormError),

    #[error(transparent)]
    Host(#[from] host::HostError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Model(#[from] models::ModelError),

    #[error(transparent)]
    Url(#[from] common::UrlError),
}
