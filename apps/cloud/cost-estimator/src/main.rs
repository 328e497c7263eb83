//! Cost Estimator
//!
//! A calculator for usage-based hosting bills on Cloudflare and Vercel.
//! Sessions persist between runs: usage figures entered once are restored
//! on the next invocation and can be adjusted incrementally.

use clap::{Args, Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_billing::{
    CalculatorSession, Cloudflare, CloudflarePlan, CostEstimate, HostingProvider, Provider,
    SessionStore, Vercel, VercelPlan,
};
use eyre::Result;
use serde::Serialize;

mod config;
mod store;

use config::Config;
use store::FileStore;

#[derive(Parser)]
#[command(name = "cost-estimator")]
#[command(about = "Estimate monthly hosting costs on Cloudflare and Vercel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a month of usage, carrying the session forward
    Estimate {
        #[command(subcommand)]
        provider: EstimateCommand,
    },

    /// List supported providers and their plans
    Plans {
        /// Limit to one provider (cloudflare or vercel)
        provider: Option<Provider>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the saved session and its current estimate
    Show {
        /// Provider session to show (cloudflare or vercel)
        provider: Provider,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a session to plan defaults
    Reset {
        #[command(subcommand)]
        provider: ResetCommand,
    },
}

#[derive(Subcommand)]
enum EstimateCommand {
    /// Cloudflare Workers
    Cloudflare(CloudflareArgs),

    /// Vercel
    Vercel(VercelArgs),
}

#[derive(Args)]
struct CloudflareArgs {
    /// Plan to price (free or paid)
    #[arg(short, long)]
    plan: Option<CloudflarePlan>,

    /// Worker requests per month
    #[arg(long)]
    worker_requests: Option<f64>,

    /// Worker CPU time per month, in milliseconds
    #[arg(long)]
    cpu_milliseconds: Option<f64>,

    /// KV reads per month
    #[arg(long)]
    kv_reads: Option<f64>,

    /// KV writes per month
    #[arg(long)]
    kv_writes: Option<f64>,

    /// KV stored data, in GB
    #[arg(long)]
    kv_storage_gb: Option<f64>,

    /// R2 stored data, in GB
    #[arg(long)]
    r2_storage_gb: Option<f64>,

    /// Image transformations per month
    #[arg(long)]
    image_transformations: Option<f64>,

    /// Start from plan defaults instead of the saved session
    #[arg(long)]
    fresh: bool,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct VercelArgs {
    /// Plan to price (hobby, pro, or enterprise)
    #[arg(short, long)]
    plan: Option<VercelPlan>,

    /// Billed team seats
    #[arg(short, long)]
    team_members: Option<u32>,

    /// Fast data transfer, in GB
    #[arg(long)]
    data_transfer_gb: Option<f64>,

    /// Edge requests per month
    #[arg(long)]
    edge_requests: Option<f64>,

    /// Function invocations per month
    #[arg(long)]
    function_invocations: Option<f64>,

    /// Function compute, in GB-hours
    #[arg(long)]
    function_gb_hours: Option<f64>,

    /// ISR reads per month
    #[arg(long)]
    isr_reads: Option<f64>,

    /// ISR writes per month
    #[arg(long)]
    isr_writes: Option<f64>,

    /// Images optimized per month
    #[arg(long)]
    image_optimizations: Option<f64>,

    /// Start from plan defaults instead of the saved session
    #[arg(long)]
    fresh: bool,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ResetCommand {
    /// Cloudflare Workers
    Cloudflare {
        /// Plan whose defaults to restore (free or paid)
        #[arg(short, long)]
        plan: Option<CloudflarePlan>,
    },

    /// Vercel
    Vercel {
        /// Plan whose defaults to restore (hobby, pro, or enterprise)
        #[arg(short, long)]
        plan: Option<VercelPlan>,
    },
}

fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    let store = FileStore::new(config.state_file);

    match cli.command {
        Commands::Estimate { provider } => match provider {
            EstimateCommand::Cloudflare(args) => estimate_cloudflare(store, args),
            EstimateCommand::Vercel(args) => estimate_vercel(store, args),
        },

        Commands::Plans { provider, json } => print_plans(provider, json),

        Commands::Show { provider, json } => match provider {
            Provider::Cloudflare => show_session(Cloudflare, store, json),
            Provider::Vercel => show_session(Vercel, store, json),
        },

        Commands::Reset { provider } => match provider {
            ResetCommand::Cloudflare { plan } => reset_session(Cloudflare, store, plan),
            ResetCommand::Vercel { plan } => reset_session(Vercel, store, plan),
        },
    }
}

fn estimate_cloudflare(store: FileStore, args: CloudflareArgs) -> Result<()> {
    let mut session = CalculatorSession::new(Cloudflare, store);
    if args.fresh {
        session.reset();
    }
    if let Some(plan) = args.plan {
        session.set_plan(plan);
    }

    session.update_usage(|usage| {
        if let Some(value) = args.worker_requests {
            usage.worker_requests = value;
        }
        if let Some(value) = args.cpu_milliseconds {
            usage.cpu_milliseconds = value;
        }
        if let Some(value) = args.kv_reads {
            usage.kv_reads = value;
        }
        if let Some(value) = args.kv_writes {
            usage.kv_writes = value;
        }
        if let Some(value) = args.kv_storage_gb {
            usage.kv_storage_gb = value;
        }
        if let Some(value) = args.r2_storage_gb {
            usage.r2_storage_gb = value;
        }
        if args.image_transformations.is_some() {
            usage.image_transformations = args.image_transformations;
        }
    });

    report_session(&session, args.json, false)
}

fn estimate_vercel(store: FileStore, args: VercelArgs) -> Result<()> {
    let mut session = CalculatorSession::new(Vercel, store);
    if args.fresh {
        session.reset();
    }
    if let Some(plan) = args.plan {
        session.set_plan(plan);
    }
    if let Some(team_members) = args.team_members {
        session.set_team_members(team_members);
    }

    session.update_usage(|usage| {
        if let Some(value) = args.data_transfer_gb {
            usage.data_transfer_gb = value;
        }
        if let Some(value) = args.edge_requests {
            usage.edge_requests = value;
        }
        if let Some(value) = args.function_invocations {
            usage.function_invocations = value;
        }
        if let Some(value) = args.function_gb_hours {
            usage.function_gb_hours = value;
        }
        if let Some(value) = args.isr_reads {
            usage.isr_reads = value;
        }
        if let Some(value) = args.isr_writes {
            usage.isr_writes = value;
        }
        if args.image_optimizations.is_some() {
            usage.image_optimizations = args.image_optimizations;
        }
    });

    report_session(&session, args.json, false)
}

fn show_session<P: HostingProvider>(provider: P, store: FileStore, json: bool) -> Result<()> {
    let session = CalculatorSession::new(provider, store);
    report_session(&session, json, true)
}

fn reset_session<P: HostingProvider>(
    provider: P,
    store: FileStore,
    plan: Option<P::Plan>,
) -> Result<()> {
    let mut session = CalculatorSession::new(provider, store);
    session.reset();
    if let Some(plan) = plan {
        session.set_plan(plan);
    }

    // Resetting only touches memory; write the restored figures back
    let restored = session.usage().clone();
    session.set_usage(restored);

    println!(
        "{} session reset to {} plan defaults",
        session.provider().provider(),
        session.plan()
    );
    Ok(())
}

#[derive(Serialize)]
struct SessionReport {
    provider: Provider,
    plan: String,
    team_members: u32,
    usage: serde_json::Value,
    estimate: CostEstimate,
}

fn report_session<P: HostingProvider, S: SessionStore>(
    session: &CalculatorSession<P, S>,
    json: bool,
    show_usage: bool,
) -> Result<()> {
    let estimate = session.estimate();

    if json {
        let report = SessionReport {
            provider: session.provider().provider(),
            plan: session.plan().to_string(),
            team_members: session.team_members(),
            usage: serde_json::to_value(session.usage())?,
            estimate,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} ({} plan)", session.provider().provider(), session.plan());
    println!();

    if show_usage {
        if let serde_json::Value::Object(fields) = serde_json::to_value(session.usage())? {
            for (name, value) in fields {
                println!("  {name:<24} {value}");
            }
        }
        if session.provider().storage_keys().team_members.is_some() {
            println!("  {:<24} {}", "team_members", session.team_members());
        }
        println!();
    }

    for line in &estimate.breakdown {
        match line.included {
            Some(included) if line.value > 0.0 => println!(
                "  {:<24} {:>10}   ({included} included)",
                line.label,
                money(line.value)
            ),
            _ => println!("  {:<24} {:>10}", line.label, money(line.value)),
        }
    }
    println!("  {:-<36}", "");
    println!("  {:<24} {:>10}", "Total", money(estimate.total));
    Ok(())
}

#[derive(Serialize)]
struct PlanRow {
    plan: String,
    /// Monthly total at the plan's preset usage for a single seat; absent
    /// for custom-quoted plans
    #[serde(skip_serializing_if = "Option::is_none")]
    at_preset_total: Option<f64>,
}

#[derive(Serialize)]
struct PlanListing {
    provider: Provider,
    plans: Vec<PlanRow>,
}

fn print_plans(provider: Option<Provider>, json: bool) -> Result<()> {
    let listings: Vec<PlanListing> = [plan_listing(&Cloudflare), plan_listing(&Vercel)]
        .into_iter()
        .filter(|listing| provider.is_none_or(|wanted| listing.provider == wanted))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    for listing in listings {
        println!("{}:", listing.provider);
        for row in listing.plans {
            match row.at_preset_total {
                Some(total) => println!("  {:<12} {:>10}", row.plan, money(total)),
                None => println!("  {:<12} {:>10}", row.plan, "custom"),
            }
        }
    }
    Ok(())
}

fn plan_listing<P: HostingProvider>(provider: &P) -> PlanListing {
    let plans = provider
        .plans()
        .iter()
        .map(|&plan| PlanRow {
            plan: plan.to_string(),
            at_preset_total: provider
                .plan_preset(plan)
                .map(|usage| provider.estimate(&usage, plan, 1).total),
        })
        .collect();

    PlanListing {
        provider: provider.provider(),
        plans,
    }
}

fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}
