mod content;
mod http_request;
