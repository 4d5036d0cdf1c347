mod handshake_tests;
mod http_request;
