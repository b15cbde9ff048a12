//! Cross-boundary contracts for the auction feasibility engine.
//!
//! This crate holds every type that crosses the engine boundary: the property
//! snapshot handed in by the content-generation side, the registered-right and
//! tenant records inside it, and the result structs the engine hands back out.
//! All types are serde-serializable so producers can fabricate snapshots as
//! JSON and consumers can render reports without linking the engine itself.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION_V1: &str = "1.0";

pub mod report;

pub use report::{
    BidLadder, CostBreakdown, EngineOutput, ProfitResult, RightsAnalysisResult, ValuationResult,
};

// ---------------------------------------------------------------------------
// Property taxonomy
// ---------------------------------------------------------------------------

/// Court-auction property categories.
///
/// `Unknown` catches tags the producer emits that this engine has no table
/// entry for; downstream layers fall back to default coefficients and record
/// a note instead of failing. Deserialization is lenient for the same reason.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    StudioOffice,
    DetachedHouse,
    MultiFamilyHouse,
    MultiplexHouse,
    RowHouse,
    Commercial,
    Unknown,
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "apartment" => Self::Apartment,
            "studio_office" => Self::StudioOffice,
            "detached_house" => Self::DetachedHouse,
            "multi_family_house" => Self::MultiFamilyHouse,
            "multiplex_house" => Self::MultiplexHouse,
            "row_house" => Self::RowHouse,
            "commercial" => Self::Commercial,
            _ => Self::Unknown,
        })
    }
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::StudioOffice => "studio_office",
            Self::DetachedHouse => "detached_house",
            Self::MultiFamilyHouse => "multi_family_house",
            Self::MultiplexHouse => "multiplex_house",
            Self::RowHouse => "row_house",
            Self::Commercial => "commercial",
            Self::Unknown => "unknown",
        }
    }
}

/// The fifteen registered-right categories the classifier understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RightKind {
    Mortgage,
    RegisteredMortgage,
    Seizure,
    ProvisionalSeizure,
    SecurityPreRegistration,
    OwnershipTransferClaimPreRegistration,
    PlainPreRegistration,
    AdvanceNoticeRegistration,
    LeaseholdRight,
    ResidentialTenancyRight,
    CommercialTenancyRight,
    ProvisionalDisposition,
    Lien,
    StatutorySuperficies,
    GraveUsageRight,
}

impl RightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mortgage => "mortgage",
            Self::RegisteredMortgage => "registered_mortgage",
            Self::Seizure => "seizure",
            Self::ProvisionalSeizure => "provisional_seizure",
            Self::SecurityPreRegistration => "security_pre_registration",
            Self::OwnershipTransferClaimPreRegistration => {
                "ownership_transfer_claim_pre_registration"
            }
            Self::PlainPreRegistration => "plain_pre_registration",
            Self::AdvanceNoticeRegistration => "advance_notice_registration",
            Self::LeaseholdRight => "leasehold_right",
            Self::ResidentialTenancyRight => "residential_tenancy_right",
            Self::CommercialTenancyRight => "commercial_tenancy_right",
            Self::ProvisionalDisposition => "provisional_disposition",
            Self::Lien => "lien",
            Self::StatutorySuperficies => "statutory_superficies",
            Self::GraveUsageRight => "grave_usage_right",
        }
    }

    pub const ALL: [RightKind; 15] = [
        Self::Mortgage,
        Self::RegisteredMortgage,
        Self::Seizure,
        Self::ProvisionalSeizure,
        Self::SecurityPreRegistration,
        Self::OwnershipTransferClaimPreRegistration,
        Self::PlainPreRegistration,
        Self::AdvanceNoticeRegistration,
        Self::LeaseholdRight,
        Self::ResidentialTenancyRight,
        Self::CommercialTenancyRight,
        Self::ProvisionalDisposition,
        Self::Lien,
        Self::StatutorySuperficies,
        Self::GraveUsageRight,
    ];
}

/// How an encumbrance or tenancy survives the sale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Extinguished,
    Assumed,
    AtRisk,
}

/// How a right's claim amount enters the assumed-amount sum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    FullAmount,
    NoAmount,
    Estimated,
    MarketDiscounted,
}

/// Aggregated risk tags raised by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    OwnershipDispute,
    CommercialTenancy,
    Lien,
    StatutorySuperficies,
    GraveUsage,
    UnclearDividend,
    MultipleTenants,
}

impl RiskFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OwnershipDispute => "ownership_dispute",
            Self::CommercialTenancy => "commercial_tenancy",
            Self::Lien => "lien",
            Self::StatutorySuperficies => "statutory_superficies",
            Self::GraveUsage => "grave_usage",
            Self::UnclearDividend => "unclear_dividend",
            Self::MultipleTenants => "multiple_tenants",
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot records
// ---------------------------------------------------------------------------

/// One registered encumbrance from the property's register extract.
///
/// `priority_rank` and `disposition` are derived fields: the classifier fills
/// them on its own copies, input records are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredRight {
    pub right_id: String,
    pub kind: RightKind,
    /// Registered claim in KRW. Several kinds carry no monetary claim.
    pub claim_amount: Option<i64>,
    pub registered_on: NaiveDate,
    #[serde(default)]
    pub priority_rank: Option<u32>,
    #[serde(default)]
    pub disposition: Option<Disposition>,
}

/// An occupying tenant. `has_standing` and `is_assumed` are derived relative
/// to the base extinguishing right; producers leave them false.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tenant {
    pub tenant_id: String,
    pub deposit: i64,
    pub moved_in: NaiveDate,
    /// Fixed-date (confirmation) registration, when the tenant obtained one.
    pub fixed_date: Option<NaiveDate>,
    /// Commercial occupancy (shop lease) rather than residential.
    #[serde(default)]
    pub commercial: bool,
    #[serde(default)]
    pub small_tenant: bool,
    /// Statutory priority-payment entitlement for small tenants, in KRW.
    #[serde(default)]
    pub priority_payment: i64,
    #[serde(default)]
    pub has_standing: bool,
    #[serde(default)]
    pub is_assumed: bool,
}

impl Tenant {
    /// Deposit the buyer would actually carry: small tenants recover their
    /// priority payment from the distribution first.
    pub fn net_deposit(&self) -> i64 {
        if self.small_tenant {
            (self.deposit - self.priority_payment).max(0)
        } else {
            self.deposit
        }
    }
}

/// Outcome of one prior auction round for this property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidRound {
    pub round_no: u32,
    pub min_bid: i64,
    pub sold: bool,
    pub winning_bid: Option<i64>,
    pub bidder_count: Option<u32>,
}

/// Read-only view of one auction listing at report time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySnapshot {
    pub schema_version: String,
    pub case_id: String,
    pub property_type: PropertyType,
    pub appraisal: Option<i64>,
    pub min_bid: Option<i64>,
    /// Optional externally-sourced fair-value estimate.
    pub fmv_hint: Option<i64>,
    /// Named market indicators as multipliers centered on 1.0.
    #[serde(default)]
    pub market_signals: BTreeMap<String, f64>,
    #[serde(default)]
    pub rights: Vec<RegisteredRight>,
    #[serde(default)]
    pub tenants: Vec<Tenant>,
    pub dividend_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub history: Vec<BidRound>,
}

impl PropertySnapshot {
    /// True when the snapshot carries nothing the pipeline could work from.
    pub fn is_structurally_empty(&self) -> bool {
        self.appraisal.is_none()
            && self.min_bid.is_none()
            && self.fmv_hint.is_none()
            && self.rights.is_empty()
            && self.tenants.is_empty()
    }

    /// A small worked example: an apartment with a senior mortgage and one
    /// protected tenant, one prior passed round.
    pub fn sample() -> Self {
        let date =
            |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).expect("valid sample date");
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            case_id: "2025-TA-10412".to_string(),
            property_type: PropertyType::Apartment,
            appraisal: Some(480_000_000),
            min_bid: Some(384_000_000),
            fmv_hint: None,
            market_signals: BTreeMap::new(),
            rights: vec![
                RegisteredRight {
                    right_id: "right:1".to_string(),
                    kind: RightKind::RegisteredMortgage,
                    claim_amount: Some(260_000_000),
                    registered_on: date(2019, 3, 11),
                    priority_rank: None,
                    disposition: None,
                },
                RegisteredRight {
                    right_id: "right:2".to_string(),
                    kind: RightKind::ProvisionalSeizure,
                    claim_amount: Some(40_000_000),
                    registered_on: date(2022, 8, 2),
                    priority_rank: None,
                    disposition: None,
                },
            ],
            tenants: vec![Tenant {
                tenant_id: "tenant:1".to_string(),
                deposit: 120_000_000,
                moved_in: date(2018, 11, 5),
                fixed_date: Some(date(2018, 11, 6)),
                commercial: false,
                small_tenant: false,
                priority_payment: 0,
                has_standing: false,
                is_assumed: false,
            }],
            dividend_deadline: Some(date(2025, 5, 30)),
            history: vec![BidRound {
                round_no: 1,
                min_bid: 480_000_000,
                sold: false,
                winning_bid: None,
                bidder_count: Some(4),
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Engine input envelope
// ---------------------------------------------------------------------------

/// Competitive pressure preset for the simulated field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Per-run overrides for the cost tables. `None` keeps the table value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CostOverrides {
    pub acquisition_tax_rate: Option<f64>,
    pub education_tax_rate: Option<f64>,
    pub special_rural_tax_rate: Option<f64>,
    pub eviction_base: Option<i64>,
    pub misc_base: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineOptions {
    /// Append per-layer summary notes to the report trail.
    #[serde(default)]
    pub verbose: bool,
    pub exit_price: Option<i64>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Simulated competitor count; defaults from bidding history, then from
    /// the difficulty preset.
    pub competitor_count: Option<usize>,
    #[serde(default)]
    pub include_competition: bool,
    /// Bid price granularity in KRW.
    pub tick: i64,
    pub kappa_override: Option<f64>,
    #[serde(default)]
    pub cost_overrides: CostOverrides,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            exit_price: None,
            difficulty: Difficulty::Normal,
            competitor_count: None,
            include_competition: false,
            tick: 100_000,
            kappa_override: None,
            cost_overrides: CostOverrides::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineInput {
    pub snapshot: PropertySnapshot,
    pub bid_price: i64,
    #[serde(default)]
    pub options: EngineOptions,
}

impl EngineInput {
    pub fn new(snapshot: PropertySnapshot, bid_price: i64) -> Self {
        Self {
            snapshot,
            bid_price,
            options: EngineOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_property_type_tag_deserializes_to_unknown() {
        let parsed: PropertyType =
            serde_json::from_str(r#""ranch_house""#).expect("unknown tag accepted");
        assert_eq!(parsed, PropertyType::Unknown);
    }

    #[test]
    fn net_deposit_subtracts_priority_payment_for_small_tenants() {
        let mut tenant = PropertySnapshot::sample().tenants[0].clone();
        tenant.deposit = 50_000_000;
        tenant.small_tenant = true;
        tenant.priority_payment = 20_000_000;
        assert_eq!(tenant.net_deposit(), 30_000_000);

        tenant.priority_payment = 90_000_000;
        assert_eq!(tenant.net_deposit(), 0);

        tenant.small_tenant = false;
        assert_eq!(tenant.net_deposit(), 50_000_000);
    }

    #[test]
    fn sample_snapshot_round_trips_through_json() {
        let snapshot = PropertySnapshot::sample();
        let encoded = serde_json::to_string(&snapshot).expect("serialize");
        let decoded: PropertySnapshot = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn structurally_empty_requires_no_usable_field() {
        let mut snapshot = PropertySnapshot::sample();
        assert!(!snapshot.is_structurally_empty());
        snapshot.appraisal = None;
        snapshot.min_bid = None;
        snapshot.fmv_hint = None;
        snapshot.rights.clear();
        snapshot.tenants.clear();
        assert!(snapshot.is_structurally_empty());
    }
}
