use anyhow::Context;
use ferrous_doh_infrastructure::dns::message::{build_query, rcode_name};
use ferrous_doh_infrastructure::dns::LoadBalancer;
use hickory_proto::rr::RecordType;
use std::time::Instant;

/// One-shot lookup, printed in a dig-like layout.
pub async fn run(balancer: &LoadBalancer, name: &str, record_type: RecordType) -> anyhow::Result<()> {
    let (id, request) = build_query(name, record_type)
        .with_context(|| format!("invalid query for {}", name))?;

    let started = Instant::now();
    let reply = balancer.query(&request).await?;
    let elapsed = started.elapsed();

    println!(
        ";; ->>HEADER<<- status: {}, id: {}, answers: {}",
        rcode_name(reply.response_code()),
        id,
        reply.answers().len()
    );
    for record in reply.answers() {
        println!("{}", record);
    }
    println!(";; Query time: {} msec", elapsed.as_millis());

    Ok(())
}
