use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Hosting provider enumeration
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
pub enum Provider {
    #[default]
    Cloudflare,
    Vercel,
}

/// Display category for a breakdown line
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
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LineCategory {
    /// Fixed plan price
    Base,
    /// Data transfer
    Bandwidth,
    /// Execution time and invocations
    Compute,
    /// Request-counted operations
    Requests,
    /// Stored data
    Storage,
    /// Image processing
    Images,
    /// Usage credit, recorded as a negative value
    Credit,
}

/// One itemized charge (or credit) contributing to the total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    /// Display label
    pub label: String,
    /// Charge in dollars; negative only for credit lines
    pub value: f64,
    /// Display category
    pub category: LineCategory,
    /// Included quota for metered lines, in the metric's own unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<f64>,
}

impl CostLine {
    /// Create a breakdown line
    pub fn new(label: impl Into<String>, value: f64, category: LineCategory) -> Self {
        Self {
            label: label.into(),
            value,
            category,
            included: None,
        }
    }

    /// Annotate the line with its included quota
    pub fn with_included(mut self, quota: f64) -> Self {
        self.included = Some(quota);
        self
    }
}

/// Itemized monthly cost estimate produced by a pricing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Fixed plan price, before usage
    pub base_price: f64,
    /// Sum of all metered overage charges, before credits
    pub usage_charges: f64,
    /// Credit applied against usage charges, never more than the pool
    /// and never more than the usage charges themselves
    pub credits_applied: f64,
    /// `base_price + max(0, usage_charges - credits_applied)`
    pub total: f64,
    /// Base line, one line per metered resource, and a trailing negative
    /// credit line when any credit applied, in provider-declared order
    pub breakdown: Vec<CostLine>,
}

impl CostEstimate {
    /// Assemble an estimate from a base line, metered lines, and a credit pool
    ///
    /// Applies `credits = min(pool, usage)` and appends a single negative
    /// "Credits Applied" line when any credit was consumed, so that the
    /// breakdown always sums to the total.
    pub fn from_lines(base: CostLine, usage_lines: Vec<CostLine>, credit_pool: f64) -> Self {
        let base_price = base.value;
        let usage_charges: f64 = usage_lines.iter().map(|line| line.value).sum();
        let credits_applied = credit_pool.max(0.0).min(usage_charges);

        let mut breakdown = Vec::with_capacity(usage_lines.len() + 2);
        breakdown.push(base);
        breakdown.extend(usage_lines);
        if credits_applied > 0.0 {
            breakdown.push(CostLine::new(
                "Credits Applied",
                -credits_applied,
                LineCategory::Credit,
            ));
        }

        Self {
            base_price,
            usage_charges,
            credits_applied,
            total: base_price + (usage_charges - credits_applied).max(0.0),
            breakdown,
        }
    }

    /// Sum of all breakdown line values
    pub fn breakdown_total(&self) -> f64 {
        self.breakdown.iter().map(|line| line.value).sum()
    }
}

/// Persistence key names declared by a provider
///
/// One key for the serialized usage blob; the team-members key exists only
/// for providers whose pricing depends on team size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key for the usage inputs JSON blob
    pub usage: &'static str,
    /// Key for the team-member count, stored as a base-10 integer string
    pub team_members: Option<&'static str>,
}
