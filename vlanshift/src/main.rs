//! vlanshift command line.
//!
//! # Usage
//!
//! ```bash
//! # Default plan against ./res/testbeds/testbed.yaml
//! vlanshift
//!
//! # Custom plan and snapshot date, slow links
//! vlanshift --testbed lab.yaml --plan plans/access.yaml --date 2024-05-01 --timeout 90
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::info;

use vlanshift::{ConnectOptions, HostKeyPolicy, Inventory, Orchestrator, Plan, RunContext};

/// Run VLAN migration tasks against a testbed
#[derive(Parser, Debug)]
#[command(name = "vlanshift")]
#[command(version)]
struct Args {
    /// Testbed YAML describing the devices
    #[arg(long, env = "VLANSHIFT_TESTBED", default_value = "./res/testbeds/testbed.yaml")]
    testbed: PathBuf,

    /// Plan YAML; the built-in plan is used when omitted
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Date stamp for snapshot files (YYYY-MM-DD), today by default
    #[arg(long)]
    date: Option<String>,

    /// Connect and per-command timeout in seconds
    #[arg(long, env = "VLANSHIFT_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// What to do with unknown or changed SSH host keys
    #[arg(long, value_enum, default_value_t = HostKeyPolicy::AcceptNew)]
    host_keys: HostKeyPolicy,

    /// known_hosts file, ~/.ssh/known_hosts by default
    #[arg(long)]
    known_hosts: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let options = ConnectOptions {
        timeout: Duration::from_secs(args.timeout),
        host_keys: args.host_keys,
        known_hosts: args.known_hosts.clone(),
    };
    let mut inventory = Inventory::load_with(&args.testbed, options)?;
    info!(
        "loaded {} devices from {}",
        inventory.len(),
        args.testbed.display()
    );

    let plan = match &args.plan {
        Some(path) => Plan::from_path(path)?,
        None => Plan::default(),
    };
    let context = match args.date {
        Some(date) => RunContext::new(date),
        None => RunContext::today(),
    };

    let report = Orchestrator::new(plan, context).run(&mut inventory).await;

    for device in &report.devices {
        println!("{}: {}", capitalize(&device.role), device.device);
        for (_, outcome) in &device.outcomes {
            println!("  {outcome}");
        }
        if let Some((task, error)) = &device.failure {
            eprintln!("  {task} failed: {error}");
        }
    }

    report.into_result()?;
    Ok(())
}

fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
