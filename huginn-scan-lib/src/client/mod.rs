pub mod handshaker;
pub mod tcp;

pub use handshaker::{HandshakeError, Handshaker, NetworkError, SecurityFailure};
pub use tcp::TcpHandshaker;
