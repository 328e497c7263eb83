//! Cloudflare Workers pricing
//!
//! Usage-based plan math for the Workers platform: the paid plan bills
//! $5/month plus metered overage, the free plan is hard-capped (the
//! platform throttles instead of billing, so free overage rates are zero).
//! https://developers.cloudflare.com/workers/platform/pricing/

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{HostingProvider, MILLION, Meter};
use crate::models::{CostEstimate, CostLine, LineCategory, Provider, StorageKeys};

/// Monthly usage across the Workers platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudflareUsage {
    /// Worker invocations per month
    pub worker_requests: f64,
    /// Worker CPU time per month, in milliseconds
    pub cpu_milliseconds: f64,
    /// Workers KV read operations per month
    pub kv_reads: f64,
    /// Workers KV write operations per month
    pub kv_writes: f64,
    /// Workers KV stored data, in GB
    pub kv_storage_gb: f64,
    /// R2 stored data, in GB
    pub r2_storage_gb: f64,
    /// Image transformations per month, absent when the feature is unused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_transformations: Option<f64>,
}

/// Workers plans
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
pub enum CloudflarePlan {
    /// Hard-capped allowances, no overage billing
    #[default]
    Free,
    /// $5/month plus metered overage
    Paid,
}

/// Billing coefficients for one Workers plan
struct PlanRates {
    base_price: f64,
    worker_requests: Meter,
    cpu_milliseconds: Meter,
    kv_reads: Meter,
    kv_writes: Meter,
    kv_storage_gb: Meter,
    r2_storage_gb: Meter,
    image_transformations: Meter,
}

fn plan_rates(plan: CloudflarePlan) -> PlanRates {
    match plan {
        CloudflarePlan::Free => PlanRates {
            base_price: 0.0,
            worker_requests: Meter { included: 3.0 * MILLION, rate: 0.0, per: MILLION }, // 100k/day cap
            cpu_milliseconds: Meter { included: 30.0 * MILLION, rate: 0.0, per: MILLION },
            kv_reads: Meter { included: 3.0 * MILLION, rate: 0.0, per: MILLION }, // 100k/day cap
            kv_writes: Meter { included: 30_000.0, rate: 0.0, per: MILLION }, // 1k/day cap
            kv_storage_gb: Meter { included: 1.0, rate: 0.0, per: 1.0 },
            r2_storage_gb: Meter { included: 10.0, rate: 0.0, per: 1.0 },
            image_transformations: Meter { included: 5_000.0, rate: 0.0, per: 1_000.0 },
        },
        CloudflarePlan::Paid => PlanRates {
            base_price: 5.0, // $5.00/month
            worker_requests: Meter { included: 10.0 * MILLION, rate: 0.30, per: MILLION }, // $0.30 per additional million
            cpu_milliseconds: Meter { included: 30.0 * MILLION, rate: 0.02, per: MILLION }, // $0.02 per additional million ms
            kv_reads: Meter { included: 10.0 * MILLION, rate: 0.50, per: MILLION }, // $0.50 per additional million
            kv_writes: Meter { included: MILLION, rate: 5.00, per: MILLION }, // $5.00 per additional million
            kv_storage_gb: Meter { included: 1.0, rate: 0.50, per: 1.0 }, // $0.50 per GB-month
            r2_storage_gb: Meter { included: 10.0, rate: 0.015, per: 1.0 }, // $0.015 per GB-month
            image_transformations: Meter { included: 5_000.0, rate: 0.50, per: 1_000.0 }, // $0.50 per 1,000
        },
    }
}

/// Canonical example usage for a plan: the plan's included allowances
fn preset(plan: CloudflarePlan) -> CloudflareUsage {
    let rates = plan_rates(plan);
    CloudflareUsage {
        worker_requests: rates.worker_requests.included,
        cpu_milliseconds: rates.cpu_milliseconds.included,
        kv_reads: rates.kv_reads.included,
        kv_writes: rates.kv_writes.included,
        kv_storage_gb: rates.kv_storage_gb.included,
        r2_storage_gb: rates.r2_storage_gb.included,
        image_transformations: None,
    }
}

/// Price a monthly Workers usage snapshot under a plan
///
/// Pure function: no I/O, no mutation of the inputs, deterministic for
/// identical arguments. Negative usage values are clamped to zero.
pub fn calculate(usage: &CloudflareUsage, plan: CloudflarePlan) -> CostEstimate {
    let rates = plan_rates(plan);
    let base = CostLine::new("Base Plan", rates.base_price, LineCategory::Base);

    let lines = vec![
        CostLine::new(
            "Worker Requests",
            rates.worker_requests.charge(usage.worker_requests),
            LineCategory::Requests,
        )
        .with_included(rates.worker_requests.included),
        CostLine::new(
            "CPU Time",
            rates.cpu_milliseconds.charge(usage.cpu_milliseconds),
            LineCategory::Compute,
        )
        .with_included(rates.cpu_milliseconds.included),
        CostLine::new(
            "KV Reads",
            rates.kv_reads.charge(usage.kv_reads),
            LineCategory::Requests,
        )
        .with_included(rates.kv_reads.included),
        CostLine::new(
            "KV Writes",
            rates.kv_writes.charge(usage.kv_writes),
            LineCategory::Requests,
        )
        .with_included(rates.kv_writes.included),
        CostLine::new(
            "KV Storage",
            rates.kv_storage_gb.charge(usage.kv_storage_gb),
            LineCategory::Storage,
        )
        .with_included(rates.kv_storage_gb.included),
        CostLine::new(
            "R2 Storage",
            rates.r2_storage_gb.charge(usage.r2_storage_gb),
            LineCategory::Storage,
        )
        .with_included(rates.r2_storage_gb.included),
        CostLine::new(
            "Image Transformations",
            rates
                .image_transformations
                .charge(usage.image_transformations.unwrap_or(0.0)),
            LineCategory::Images,
        )
        .with_included(rates.image_transformations.included),
    ];

    // Workers has no usage credit pool on any plan
    CostEstimate::from_lines(base, lines, 0.0)
}

/// Cloudflare Workers calculator descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct Cloudflare;

impl HostingProvider for Cloudflare {
    type Usage = CloudflareUsage;
    type Plan = CloudflarePlan;

    fn provider(&self) -> Provider {
        Provider::Cloudflare
    }

    fn default_usage(&self) -> CloudflareUsage {
        preset(CloudflarePlan::Free)
    }

    fn plans(&self) -> &'static [CloudflarePlan] {
        &[CloudflarePlan::Free, CloudflarePlan::Paid]
    }

    fn plan_preset(&self, plan: CloudflarePlan) -> Option<CloudflareUsage> {
        Some(preset(plan))
    }

    fn storage_keys(&self) -> StorageKeys {
        StorageKeys {
            usage: "cloudflare_usage",
            team_members: None,
        }
    }

    fn estimate(
        &self,
        usage: &CloudflareUsage,
        plan: CloudflarePlan,
        _team_members: u32,
    ) -> CostEstimate {
        calculate(usage, plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_preset_bills_base_price_only() {
        let usage = preset(CloudflarePlan::Paid);
        let estimate = calculate(&usage, CloudflarePlan::Paid);

        assert_eq!(estimate.base_price, 5.00);
        assert_eq!(estimate.usage_charges, 0.0);
        assert_eq!(estimate.credits_applied, 0.0);
        assert_eq!(estimate.total, 5.00);
        for line in &estimate.breakdown[1..] {
            assert_eq!(line.value, 0.0);
        }
    }

    #[test]
    fn test_worker_request_overage() {
        let usage = CloudflareUsage {
            worker_requests: 11_000_000.0, // 1M over the 10M included
            ..preset(CloudflarePlan::Paid)
        };
        let estimate = calculate(&usage, CloudflarePlan::Paid);

        let requests = estimate
            .breakdown
            .iter()
            .find(|line| line.label == "Worker Requests")
            .unwrap();
        assert_eq!(requests.value, 0.30);
        assert_eq!(requests.included, Some(10_000_000.0));
        assert_eq!(estimate.usage_charges, 0.30);
        assert_eq!(estimate.total, 5.30);
        assert_eq!(estimate.breakdown_total(), estimate.total);
    }

    #[test]
    fn test_overage_grows_linearly_past_quota() {
        let at_quota = CloudflareUsage {
            worker_requests: 10_000_000.0,
            ..preset(CloudflarePlan::Paid)
        };
        let one_over = CloudflareUsage {
            worker_requests: 11_000_000.0,
            ..preset(CloudflarePlan::Paid)
        };
        let two_over = CloudflareUsage {
            worker_requests: 12_000_000.0,
            ..preset(CloudflarePlan::Paid)
        };

        let at = calculate(&at_quota, CloudflarePlan::Paid).usage_charges;
        let one = calculate(&one_over, CloudflarePlan::Paid).usage_charges;
        let two = calculate(&two_over, CloudflarePlan::Paid).usage_charges;

        assert_eq!(at, 0.0);
        assert_eq!(one - at, 0.30);
        assert_eq!(two - one, 0.30);
    }

    #[test]
    fn test_below_quota_stays_free_of_overage() {
        let usage = CloudflareUsage {
            worker_requests: 9_000_000.0,
            ..preset(CloudflarePlan::Paid)
        };
        let estimate = calculate(&usage, CloudflarePlan::Paid);
        assert_eq!(estimate.total, 5.00);
    }

    #[test]
    fn test_free_plan_never_bills() {
        let usage = CloudflareUsage {
            worker_requests: 50_000_000.0,
            kv_writes: 2_000_000.0,
            image_transformations: Some(100_000.0),
            ..preset(CloudflarePlan::Free)
        };
        let estimate = calculate(&usage, CloudflarePlan::Free);

        assert_eq!(estimate.base_price, 0.0);
        assert_eq!(estimate.usage_charges, 0.0);
        assert_eq!(estimate.total, 0.0);
    }

    #[test]
    fn test_negative_usage_clamped_to_zero() {
        let usage = CloudflareUsage {
            worker_requests: -5_000_000.0,
            kv_storage_gb: -3.0,
            ..preset(CloudflarePlan::Paid)
        };
        let estimate = calculate(&usage, CloudflarePlan::Paid);

        assert_eq!(estimate.usage_charges, 0.0);
        assert_eq!(estimate.total, 5.00);
        for line in &estimate.breakdown {
            assert!(line.value >= 0.0);
        }
    }

    #[test]
    fn test_absent_image_metric_treated_as_zero() {
        let mut usage = preset(CloudflarePlan::Paid);
        usage.image_transformations = None;
        let without = calculate(&usage, CloudflarePlan::Paid);

        usage.image_transformations = Some(0.0);
        let with_zero = calculate(&usage, CloudflarePlan::Paid);

        assert_eq!(without.total, with_zero.total);
    }

    #[test]
    fn test_image_transformation_overage() {
        let usage = CloudflareUsage {
            image_transformations: Some(7_000.0), // 2,000 over the 5,000 included
            ..preset(CloudflarePlan::Paid)
        };
        let estimate = calculate(&usage, CloudflarePlan::Paid);

        let images = estimate
            .breakdown
            .iter()
            .find(|line| line.label == "Image Transformations")
            .unwrap();
        assert_eq!(images.value, 1.00); // 2 * $0.50
    }

    #[test]
    fn test_descriptor_presets_and_keys() {
        let provider = Cloudflare;
        assert_eq!(provider.provider(), Provider::Cloudflare);
        assert_eq!(provider.plans()[0], CloudflarePlan::Free);
        assert_eq!(provider.default_usage(), preset(CloudflarePlan::Free));
        assert!(provider.plan_preset(CloudflarePlan::Paid).is_some());
        assert_eq!(provider.storage_keys().usage, "cloudflare_usage");
        assert_eq!(provider.storage_keys().team_members, None);
    }

    #[test]
    fn test_usage_survives_json_round_trip() {
        let usage = CloudflareUsage {
            image_transformations: Some(1_234.0),
            ..preset(CloudflarePlan::Paid)
        };
        let blob = serde_json::to_string(&usage).unwrap();
        let back: CloudflareUsage = serde_json::from_str(&blob).unwrap();
        assert_eq!(back, usage);
    }
}
