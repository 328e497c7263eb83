//! Calculator session lifecycle
//!
//! A [`CalculatorSession`] owns the mutable state of one pricing
//! calculator: the usage figures being edited, the selected plan, and the
//! team size. Construction hydrates that state from a [`SessionStore`];
//! every mutation writes the changed state back. Persistence is strictly
//! best effort: a missing, malformed, or failing store degrades to plan
//! defaults with a warning, never to an error the caller has to handle.

use tracing::{debug, warn};

use crate::models::CostEstimate;
use crate::providers::HostingProvider;
use crate::store::SessionStore;

/// A session starts with the owner as its only member
const DEFAULT_TEAM_MEMBERS: u32 = 1;

/// Mutable calculator state for one provider, backed by a store
pub struct CalculatorSession<P: HostingProvider, S: SessionStore> {
    provider: P,
    store: S,
    usage: P::Usage,
    plan: P::Plan,
    team_members: u32,
}

impl<P: HostingProvider, S: SessionStore> CalculatorSession<P, S> {
    /// Open a session, restoring previously saved usage and team size
    ///
    /// Anything the store cannot produce is replaced by the provider's
    /// defaults. The selected plan always starts at the provider's first
    /// plan; plans are a view preference and are not persisted.
    pub fn new(provider: P, store: S) -> Self {
        let keys = provider.storage_keys();
        let usage = hydrate_usage(&provider, &store, keys.usage);
        let team_members = keys
            .team_members
            .map(|key| hydrate_team_members(&store, key))
            .unwrap_or(DEFAULT_TEAM_MEMBERS);
        let plan = provider.plans().first().copied().unwrap_or_default();

        Self {
            provider,
            store,
            usage,
            plan,
            team_members,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn usage(&self) -> &P::Usage {
        &self.usage
    }

    pub fn plan(&self) -> P::Plan {
        self.plan
    }

    pub fn team_members(&self) -> u32 {
        self.team_members
    }

    /// Price the current session state
    pub fn estimate(&self) -> CostEstimate {
        self.provider
            .estimate(&self.usage, self.plan, self.team_members)
    }

    /// Replace the usage figures and persist them
    pub fn set_usage(&mut self, usage: P::Usage) {
        self.usage = usage;
        self.persist_usage();
    }

    /// Edit the usage figures in place and persist the result
    pub fn update_usage(&mut self, apply: impl FnOnce(&mut P::Usage)) {
        apply(&mut self.usage);
        self.persist_usage();
    }

    /// Switch the selected plan
    ///
    /// When the plan publishes a preset, the usage figures are replaced by
    /// it and persisted; plans without a preset leave the figures alone.
    pub fn set_plan(&mut self, plan: P::Plan) {
        self.plan = plan;
        if let Some(preset) = self.provider.plan_preset(plan) {
            debug!(plan = %plan, "applying plan preset");
            self.usage = preset;
            self.persist_usage();
        }
    }

    /// Change the team size and persist it
    ///
    /// Providers without per-seat pricing keep the value in memory only.
    pub fn set_team_members(&mut self, team_members: u32) {
        self.team_members = team_members;
        self.persist_team_members();
    }

    /// Restore the default plan and its default usage figures
    ///
    /// The team size is kept and nothing is written to the store; the next
    /// explicit mutation persists whatever state it produces.
    pub fn reset(&mut self) {
        self.plan = self.provider.plans().first().copied().unwrap_or_default();
        self.usage = self.provider.default_usage();
        debug!(plan = %self.plan, "session reset to defaults");
    }

    fn persist_usage(&self) {
        let key = self.provider.storage_keys().usage;
        match serde_json::to_string(&self.usage) {
            Ok(blob) => {
                if let Err(error) = self.store.save(key, &blob) {
                    warn!(key, %error, "failed to persist usage");
                }
            }
            Err(error) => warn!(key, %error, "failed to serialize usage"),
        }
    }

    fn persist_team_members(&self) {
        let Some(key) = self.provider.storage_keys().team_members else {
            return;
        };
        if let Err(error) = self.store.save(key, &self.team_members.to_string()) {
            warn!(key, %error, "failed to persist team size");
        }
    }
}

fn hydrate_usage<P: HostingProvider, S: SessionStore>(
    provider: &P,
    store: &S,
    key: &str,
) -> P::Usage {
    match store.load(key) {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(usage) => {
                debug!(key, "restored usage from store");
                usage
            }
            Err(error) => {
                warn!(key, %error, "stored usage is malformed, using plan defaults");
                provider.default_usage()
            }
        },
        Ok(None) => {
            debug!(key, "no stored usage, using plan defaults");
            provider.default_usage()
        }
        Err(error) => {
            warn!(key, %error, "failed to load usage, using plan defaults");
            provider.default_usage()
        }
    }
}

fn hydrate_team_members<S: SessionStore>(store: &S, key: &str) -> u32 {
    match store.load(key) {
        Ok(Some(blob)) => match blob.trim().parse() {
            Ok(team_members) => {
                debug!(key, team_members, "restored team size from store");
                team_members
            }
            Err(error) => {
                warn!(key, %error, "stored team size is malformed, using default");
                DEFAULT_TEAM_MEMBERS
            }
        },
        Ok(None) => DEFAULT_TEAM_MEMBERS,
        Err(error) => {
            warn!(key, %error, "failed to load team size, using default");
            DEFAULT_TEAM_MEMBERS
        }
    }
}
