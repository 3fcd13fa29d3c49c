//! # Gate battery: qualitative orderings of the Phi-proxy
//!
//! Sweeps six textbook networks over their full state space and checks the
//! orderings a partition-based integration measure should respect:
//!
//! ```text
//! XOR > AND, XOR > OR          both inputs needed vs. one input decides
//! loop > chain                 feedback vs. none
//! majority > 0                 redundant but still integrated
//! ```
//!
//! ## Running this demo
//!
//! ```text
//! cargo run --example gates
//! RUST_LOG=phi_core=debug cargo run --example gates   # per-state events
//! ```

use phi_core::{run_canonical_validation, PhiError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry().with(fmt::layer()).with(env_filter).init();
}

fn main() -> Result<(), PhiError> {
    init_tracing();

    let report = run_canonical_validation()?;

    println!("{:<28} {:>5} {:>10} {:>10} {:>10}  MIP (all active)", "network", "nodes", "max", "mean", "active");
    println!("{}", "─".repeat(90));
    for n in &report.networks {
        let mip = n.mip_active().map_or_else(|| "-".to_owned(), |c| c.to_string());
        println!(
            "{:<28} {:>5} {:>10.6} {:>10.6} {:>10.6}  {}",
            n.display_name,
            n.nodes,
            n.sweep.max,
            n.sweep.mean,
            n.phi_all_active(),
            mip
        );
        println!("    expectation: {}", n.expectation);
    }

    println!();
    for v in &report.validations {
        let mark = if v.passed { "PASS" } else { "FAIL" };
        println!("[{mark}] {:<52} {}", v.name, v.values);
    }
    println!();
    println!(
        "{}/{} orderings hold ({:.1}%)",
        report.passed(),
        report.total(),
        report.pass_rate()
    );

    Ok(())
}
