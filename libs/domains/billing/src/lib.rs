//! Billing Domain
//!
//! This module provides a complete domain implementation for estimating
//! usage-based hosting costs across cloud platforms.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Session   │  ← Mutable calculator state, hydration, persistence
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Providers  │  ← Plan coefficient tables, pure pricing math
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Estimates, breakdown lines, enums
//! └─────────────┘
//! ```

pub mod error;
pub mod models;
pub mod providers;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use models::{CostEstimate, CostLine, LineCategory, Provider, StorageKeys};
pub use providers::cloudflare::{Cloudflare, CloudflarePlan, CloudflareUsage};
pub use providers::vercel::{Vercel, VercelPlan, VercelUsage};
pub use providers::HostingProvider;
pub use session::CalculatorSession;
pub use store::{MemoryStore, SessionStore};
