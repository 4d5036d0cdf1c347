mod http;
mod message;
