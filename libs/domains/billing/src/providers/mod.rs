//! Hosting provider pricing modules
//!
//! Each provider module bundles its usage shape, its plan enum, its rate
//! tables and plan presets, and a pure pricing engine, exposed to the
//! session layer through the [`HostingProvider`] trait. Shapes differ per
//! provider, so the trait carries them as associated types and sessions are
//! parameterized per concrete provider.

use std::fmt::{Debug, Display};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{CostEstimate, Provider, StorageKeys};

pub mod cloudflare;
pub mod vercel;

pub use cloudflare::{Cloudflare, CloudflarePlan, CloudflareUsage};
pub use vercel::{Vercel, VercelPlan, VercelUsage};

pub(crate) const MILLION: f64 = 1_000_000.0;

/// Compile-time descriptor of one provider's calculator
///
/// Binds together a provider's default inputs, its ordered plan set with
/// per-plan presets, its persistence key names, and its pricing engine.
/// Implementors are stateless unit structs; all rate data is declared in
/// the provider's module.
pub trait HostingProvider {
    /// Usage metric record for this provider
    type Usage: Debug + Clone + PartialEq + Serialize + DeserializeOwned;
    /// Closed set of plans offered by this provider
    ///
    /// Plan enums carry no borrowed data; the bound lets [`Self::plans`]
    /// hand out its static slice through generic code.
    type Plan: Debug + Copy + Eq + Default + Display + 'static;

    /// Provider identity
    fn provider(&self) -> Provider;

    /// Canonical starting inputs for a fresh session
    fn default_usage(&self) -> Self::Usage;

    /// Plans in display order; the first entry is the default plan
    ///
    /// Never empty.
    fn plans(&self) -> &'static [Self::Plan];

    /// Canonical example inputs for a plan
    ///
    /// Returns `None` for plans without published coefficients (custom
    /// quoted); selecting such a plan leaves the current inputs in place.
    fn plan_preset(&self, plan: Self::Plan) -> Option<Self::Usage>;

    /// Persistence key names used by sessions for this provider
    fn storage_keys(&self) -> StorageKeys;

    /// Price a usage snapshot under a plan
    ///
    /// Pure: no I/O, no mutation, deterministic for identical arguments.
    /// Providers that do not bill per seat ignore `team_members`.
    fn estimate(&self, usage: &Self::Usage, plan: Self::Plan, team_members: u32) -> CostEstimate;
}

/// Billing coefficients for one metered resource under a plan
///
/// `rate` dollars are charged per `per` units of usage beyond `included`.
/// Metrics billed from the first unit set `included` to zero; plans with
/// no overage billing set `rate` to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Meter {
    pub included: f64,
    pub rate: f64,
    pub per: f64,
}

impl Meter {
    /// Overage charge for a usage value
    ///
    /// Negative usage is clamped to zero before the quota is applied, so
    /// the result is never negative.
    pub fn charge(&self, usage: f64) -> f64 {
        (usage.max(0.0) - self.included).max(0.0) / self.per * self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plans_for<P: HostingProvider>(provider: &P) -> &'static [P::Plan] {
        provider.plans()
    }

    #[test]
    fn test_plans_slice_is_static_through_generic_code() {
        assert_eq!(plans_for(&Cloudflare).first(), Some(&CloudflarePlan::Free));
        assert_eq!(plans_for(&Vercel).first(), Some(&VercelPlan::Hobby));
    }

    #[test]
    fn test_meter_charge_at_and_below_quota() {
        let meter = Meter {
            included: 10.0,
            rate: 2.0,
            per: 1.0,
        };
        assert_eq!(meter.charge(0.0), 0.0);
        assert_eq!(meter.charge(10.0), 0.0);
    }

    #[test]
    fn test_meter_charge_beyond_quota() {
        let meter = Meter {
            included: 10.0,
            rate: 2.0,
            per: 1.0,
        };
        assert_eq!(meter.charge(13.0), 6.0);
    }

    #[test]
    fn test_meter_charge_per_million_scaling() {
        let meter = Meter {
            included: 10.0 * MILLION,
            rate: 0.30,
            per: MILLION,
        };
        assert_eq!(meter.charge(11.0 * MILLION), 0.30);
    }

    #[test]
    fn test_meter_clamps_negative_usage() {
        let meter = Meter {
            included: 0.0,
            rate: 5.0,
            per: 1.0,
        };
        assert_eq!(meter.charge(-42.0), 0.0);
    }

    #[test]
    fn test_meter_from_first_unit() {
        let meter = Meter {
            included: 0.0,
            rate: 0.15,
            per: 1.0,
        };
        assert_eq!(meter.charge(100.0), 15.0);
    }
}
