//! Ferrous DoH infrastructure: DNS-over-HTTPS transport, upstream load
//! balancing and the metrics they emit.
pub mod dns;
pub mod metrics;
