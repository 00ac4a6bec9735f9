pub mod balancer;
pub mod policy;
pub mod pool;

pub use balancer::{LoadBalancer, LoadBalancerOptions, DEFAULT_REQUEST_TIMEOUT};
pub use policy::{RandomPolicy, RoundRobinPolicy, SelectionPolicy, SequentialPolicy};
