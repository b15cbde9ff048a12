//! Result structs assembled by the engine and handed to the display layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{RegisteredRight, RiskFlag, Tenant};

/// Resolved valuation triple. All three amounts are in KRW; `notes` records
/// every inference the resolver had to make.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValuationResult {
    pub fmv: i64,
    pub appraisal: i64,
    pub min_bid: i64,
    pub notes: Vec<String>,
}

/// Legal disposition of every encumbrance and tenancy on the register.
///
/// Every input right lands in exactly one of the three right buckets, and
/// every input tenant in exactly one of the two tenant buckets, with derived
/// fields filled; nothing is dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RightsAnalysisResult {
    /// The base extinguishing right, when one qualifies.
    pub base_right: Option<RegisteredRight>,
    pub assumed_rights: Vec<RegisteredRight>,
    pub extinguished_rights: Vec<RegisteredRight>,
    pub at_risk_rights: Vec<RegisteredRight>,
    pub assumed_tenants: Vec<Tenant>,
    /// Tenants without standing; their deposits do not survive the sale.
    pub extinguished_tenants: Vec<Tenant>,
    pub risk_flags: BTreeSet<RiskFlag>,
    /// Assumed rights' policy-adjusted claims plus assumed tenants' net
    /// deposits, in KRW.
    pub assumed_total: i64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostBreakdown {
    pub acquisition_tax: i64,
    pub education_tax: i64,
    pub special_rural_tax: i64,
    pub total_tax: i64,
    pub eviction_cost: i64,
    pub misc_cost: i64,
    /// bid + assumed amount + taxes + eviction + misc.
    pub total_acquisition: i64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitResult {
    pub margin_vs_fmv: i64,
    pub margin_rate_vs_fmv: f64,
    pub margin_vs_exit: i64,
    pub margin_rate_vs_exit: f64,
    /// Minimum resale price that avoids a loss, ignoring sale-side costs.
    pub break_even_price: i64,
}

/// Three suggested bid levels, all bounded by the policy cap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidLadder {
    pub conservative: i64,
    pub balanced: i64,
    pub aggressive: i64,
}

/// The full feasibility report for one engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineOutput {
    pub schema_version: String,
    pub case_id: String,
    pub bid_price: i64,
    pub valuation: ValuationResult,
    pub rights: RightsAnalysisResult,
    pub costs: CostBreakdown,
    pub profit: ProfitResult,
    /// 0..=1 signal of how aggressively the bid exceeds fair value.
    pub overheat: f64,
    /// Hard ceiling for any recommended or simulated bid.
    pub bid_cap: i64,
    pub ladder: BidLadder,
    pub competitor_bids: Option<Vec<i64>>,
    pub notes: Vec<String>,
}
