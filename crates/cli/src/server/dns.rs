use ferrous_doh_infrastructure::dns::message::{error_reply, reply_matches};
use ferrous_doh_infrastructure::dns::LoadBalancer;
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

pub async fn start_dns_server(bind_addr: &str, balancer: Arc<LoadBalancer>) -> anyhow::Result<()> {
    let socket = Arc::new(UdpSocket::bind(bind_addr).await?);

    info!(
        bind_address = %socket.local_addr()?,
        upstreams = balancer.len(),
        policy = balancer.policy_name(),
        "DNS server ready"
    );

    let mut recv_buf = [0u8; 4096];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!(error = %e, "UDP receive failed");
                continue;
            }
        };

        let datagram: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let balancer = Arc::clone(&balancer);
        let socket = Arc::clone(&socket);

        tokio::spawn(async move {
            if let Some(response) = handle_datagram(&balancer, &datagram).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "Failed to send reply");
                }
            }
        });
    }
}

/// Forwards one client datagram and returns the wire reply, or `None` when
/// the datagram is not a DNS message.
pub async fn handle_datagram(balancer: &LoadBalancer, datagram: &[u8]) -> Option<Vec<u8>> {
    let request = match Message::from_vec(datagram) {
        Ok(request) => request,
        Err(e) => {
            debug!(len = datagram.len(), error = %e, "Dropping unparsable datagram");
            return None;
        }
    };

    let reply = match balancer.query(datagram).await {
        Ok(reply) if reply_matches(&request, &reply) => reply,
        Ok(reply) => {
            warn!(
                request_id = request.id(),
                reply_id = reply.id(),
                "Upstream reply does not match request"
            );
            error_reply(&request, ResponseCode::FormErr)
        }
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "Upstream pool failed");
            error_reply(&request, ResponseCode::ServFail)
        }
    };

    match reply.to_vec() {
        Ok(wire) => Some(wire),
        Err(e) => {
            warn!(error = %e, "Failed to encode reply");
            None
        }
    }
}
