mod handshake;
mod helpers;
