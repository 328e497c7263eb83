//! Vercel managed-hosting pricing
//!
//! Per-seat plan math: hobby is free and hard-capped, pro bills $20 per
//! seat per month and grants a $20-per-seat usage credit pool that absorbs
//! metered overage before it is billed, enterprise is custom quoted (no
//! published coefficients, estimated at zero here).
//! https://vercel.com/pricing

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{HostingProvider, MILLION, Meter};
use crate::models::{CostEstimate, CostLine, LineCategory, Provider, StorageKeys};

/// Monthly usage across the Vercel platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VercelUsage {
    /// Fast data transfer, in GB
    pub data_transfer_gb: f64,
    /// Edge network requests per month
    pub edge_requests: f64,
    /// Serverless function invocations per month
    pub function_invocations: f64,
    /// Serverless function compute, in GB-hours
    pub function_gb_hours: f64,
    /// Incremental static regeneration reads per month
    pub isr_reads: f64,
    /// Incremental static regeneration writes per month
    pub isr_writes: f64,
    /// Source images optimized per month, absent when the feature is unused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_optimizations: Option<f64>,
}

/// Vercel plans
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VercelPlan {
    /// Personal plan: free, hard-capped allowances
    #[default]
    Hobby,
    /// $20 per seat per month with a $20-per-seat usage credit
    Pro,
    /// Custom quoted; not estimated here
    Enterprise,
}

/// Billing coefficients for one Vercel plan
struct PlanRates {
    /// Dollars per seat per month
    seat_price: f64,
    /// Usage credit granted per seat per month
    credit_per_seat: f64,
    data_transfer_gb: Meter,
    edge_requests: Meter,
    function_invocations: Meter,
    function_gb_hours: Meter,
    isr_reads: Meter,
    isr_writes: Meter,
    image_optimizations: Meter,
}

fn plan_rates(plan: VercelPlan) -> PlanRates {
    match plan {
        VercelPlan::Hobby => PlanRates {
            seat_price: 0.0,
            credit_per_seat: 0.0,
            data_transfer_gb: Meter { included: 100.0, rate: 0.0, per: 1.0 },
            edge_requests: Meter { included: MILLION, rate: 0.0, per: MILLION },
            function_invocations: Meter { included: MILLION, rate: 0.0, per: MILLION },
            function_gb_hours: Meter { included: 100.0, rate: 0.0, per: 1.0 },
            isr_reads: Meter { included: MILLION, rate: 0.0, per: MILLION },
            isr_writes: Meter { included: 200_000.0, rate: 0.0, per: MILLION },
            image_optimizations: Meter { included: 1_000.0, rate: 0.0, per: 1_000.0 },
        },
        VercelPlan::Pro => PlanRates {
            seat_price: 20.0, // $20.00 per seat
            credit_per_seat: 20.0, // $20.00 usage credit per seat
            data_transfer_gb: Meter { included: 1_000.0, rate: 0.15, per: 1.0 }, // $0.15 per GB
            edge_requests: Meter { included: 10.0 * MILLION, rate: 2.00, per: MILLION }, // $2.00 per additional million
            function_invocations: Meter { included: MILLION, rate: 0.60, per: MILLION }, // $0.60 per additional million
            function_gb_hours: Meter { included: 1_000.0, rate: 0.18, per: 1.0 }, // $0.18 per GB-hour
            isr_reads: Meter { included: 10.0 * MILLION, rate: 0.40, per: MILLION }, // $0.40 per additional million
            isr_writes: Meter { included: 2.0 * MILLION, rate: 4.00, per: MILLION }, // $4.00 per additional million
            image_optimizations: Meter { included: 5_000.0, rate: 5.00, per: 1_000.0 }, // $5.00 per 1,000
        },
        // Custom quoted: no published coefficients, safe zero baseline
        VercelPlan::Enterprise => PlanRates {
            seat_price: 0.0,
            credit_per_seat: 0.0,
            data_transfer_gb: Meter { included: 0.0, rate: 0.0, per: 1.0 },
            edge_requests: Meter { included: 0.0, rate: 0.0, per: MILLION },
            function_invocations: Meter { included: 0.0, rate: 0.0, per: MILLION },
            function_gb_hours: Meter { included: 0.0, rate: 0.0, per: 1.0 },
            isr_reads: Meter { included: 0.0, rate: 0.0, per: MILLION },
            isr_writes: Meter { included: 0.0, rate: 0.0, per: MILLION },
            image_optimizations: Meter { included: 0.0, rate: 0.0, per: 1_000.0 },
        },
    }
}

/// Canonical example usage for a plan: the plan's included allowances
///
/// Enterprise has no preset (nothing is published to preset from).
fn preset(plan: VercelPlan) -> Option<VercelUsage> {
    if plan == VercelPlan::Enterprise {
        return None;
    }
    let rates = plan_rates(plan);
    Some(VercelUsage {
        data_transfer_gb: rates.data_transfer_gb.included,
        edge_requests: rates.edge_requests.included,
        function_invocations: rates.function_invocations.included,
        function_gb_hours: rates.function_gb_hours.included,
        isr_reads: rates.isr_reads.included,
        isr_writes: rates.isr_writes.included,
        image_optimizations: None,
    })
}

/// Price a monthly Vercel usage snapshot under a plan for a team
///
/// Pure function: no I/O, no mutation of the inputs, deterministic for
/// identical arguments. Negative usage values are clamped to zero. The
/// base price and the credit pool both scale with `team_members`.
pub fn calculate(usage: &VercelUsage, plan: VercelPlan, team_members: u32) -> CostEstimate {
    let rates = plan_rates(plan);
    let seats = f64::from(team_members);
    let base = CostLine::new("Base Plan", rates.seat_price * seats, LineCategory::Base);

    let lines = vec![
        CostLine::new(
            "Data Transfer",
            rates.data_transfer_gb.charge(usage.data_transfer_gb),
            LineCategory::Bandwidth,
        )
        .with_included(rates.data_transfer_gb.included),
        CostLine::new(
            "Edge Requests",
            rates.edge_requests.charge(usage.edge_requests),
            LineCategory::Requests,
        )
        .with_included(rates.edge_requests.included),
        CostLine::new(
            "Function Invocations",
            rates.function_invocations.charge(usage.function_invocations),
            LineCategory::Compute,
        )
        .with_included(rates.function_invocations.included),
        CostLine::new(
            "Function Duration",
            rates.function_gb_hours.charge(usage.function_gb_hours),
            LineCategory::Compute,
        )
        .with_included(rates.function_gb_hours.included),
        CostLine::new(
            "ISR Reads",
            rates.isr_reads.charge(usage.isr_reads),
            LineCategory::Requests,
        )
        .with_included(rates.isr_reads.included),
        CostLine::new(
            "ISR Writes",
            rates.isr_writes.charge(usage.isr_writes),
            LineCategory::Requests,
        )
        .with_included(rates.isr_writes.included),
        CostLine::new(
            "Image Optimization",
            rates
                .image_optimizations
                .charge(usage.image_optimizations.unwrap_or(0.0)),
            LineCategory::Images,
        )
        .with_included(rates.image_optimizations.included),
    ];

    CostEstimate::from_lines(base, lines, rates.credit_per_seat * seats)
}

/// Vercel calculator descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct Vercel;

impl HostingProvider for Vercel {
    type Usage = VercelUsage;
    type Plan = VercelPlan;

    fn provider(&self) -> Provider {
        Provider::Vercel
    }

    fn default_usage(&self) -> VercelUsage {
        // Hobby always has a preset
        preset(VercelPlan::Hobby).unwrap_or(VercelUsage {
            data_transfer_gb: 0.0,
            edge_requests: 0.0,
            function_invocations: 0.0,
            function_gb_hours: 0.0,
            isr_reads: 0.0,
            isr_writes: 0.0,
            image_optimizations: None,
        })
    }

    fn plans(&self) -> &'static [VercelPlan] {
        &[VercelPlan::Hobby, VercelPlan::Pro, VercelPlan::Enterprise]
    }

    fn plan_preset(&self, plan: VercelPlan) -> Option<VercelUsage> {
        preset(plan)
    }

    fn storage_keys(&self) -> StorageKeys {
        StorageKeys {
            usage: "vercel_usage",
            team_members: Some("vercel_team_members"),
        }
    }

    fn estimate(&self, usage: &VercelUsage, plan: VercelPlan, team_members: u32) -> CostEstimate {
        calculate(usage, plan, team_members)
    }
}
