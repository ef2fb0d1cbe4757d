use actix_web::HttpRequest;
use std::net::SocketAddr;

/// Caller IP without port. Honours `Forwarded` / `X-Forwarded-For` before
/// falling back to the peer address.
pub fn client_address(req: &HttpRequest) -> String {
    let info = req.connection_info();
    let address = info.realip_remote_addr().map(strip_port);
    address.unwrap_or_else(|| "unknown".to_string())
}

fn strip_port(addr: &str) -> String {
    match addr.parse::<SocketAddr>() {
        Ok(socket) => socket.ip().to_string(),
        Err(_) => addr.to_string(),
    }
}
