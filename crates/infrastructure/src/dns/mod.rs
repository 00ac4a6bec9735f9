pub mod load_balancer;
pub mod message;
pub mod transport;

pub use load_balancer::{
    LoadBalancer, LoadBalancerOptions, RandomPolicy, RoundRobinPolicy, SelectionPolicy,
    SequentialPolicy,
};
pub use transport::{HttpsTransport, InstrumentedClient, UpstreamClient};
