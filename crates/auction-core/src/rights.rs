//! Rights and tenancy classifier.
//!
//! Selects the base extinguishing right among the registered encumbrances,
//! then classifies every other right and every tenancy as extinguished,
//! assumed, or at-risk, and aggregates risk flags. The per-kind defaults live
//! in a declarative profile table; the classifier is a small interpreter over
//! that table.
//!
//! Ties on equal registration dates are resolved by input order: the
//! first-listed right wins priority. This is a documented convention of the
//! simulator, not a legal rule.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use contracts::{
    AmountPolicy, Disposition, RegisteredRight, RightKind, RightsAnalysisResult, RiskFlag, Tenant,
};

/// Fraction of a market-discounted claim that enters the assumed sum.
pub const MARKET_DISCOUNT: f64 = 0.7;

/// Three or more tenants on one listing raise `multiple_tenants`.
const MULTIPLE_TENANT_THRESHOLD: usize = 3;

// ---------------------------------------------------------------------------
// Right-kind profile table
// ---------------------------------------------------------------------------

/// Table defaults for one right kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RightProfile {
    pub default_disposition: Disposition,
    pub amount_policy: AmountPolicy,
    pub risk_flags: &'static [RiskFlag],
}

/// Default disposition, amount policy, and risk flags per right kind.
pub fn profile_for(kind: RightKind) -> RightProfile {
    use AmountPolicy::*;
    use Disposition::*;
    use RightKind::*;

    match kind {
        Mortgage | RegisteredMortgage | Seizure | ProvisionalSeizure
        | SecurityPreRegistration => RightProfile {
            default_disposition: Extinguished,
            amount_policy: FullAmount,
            risk_flags: &[],
        },
        OwnershipTransferClaimPreRegistration => RightProfile {
            default_disposition: Assumed,
            amount_policy: NoAmount,
            risk_flags: &[RiskFlag::OwnershipDispute],
        },
        PlainPreRegistration | AdvanceNoticeRegistration => RightProfile {
            default_disposition: AtRisk,
            amount_policy: NoAmount,
            risk_flags: &[RiskFlag::OwnershipDispute],
        },
        LeaseholdRight | ResidentialTenancyRight => RightProfile {
            default_disposition: Assumed,
            amount_policy: FullAmount,
            risk_flags: &[],
        },
        CommercialTenancyRight => RightProfile {
            default_disposition: Assumed,
            amount_policy: FullAmount,
            risk_flags: &[RiskFlag::CommercialTenancy],
        },
        ProvisionalDisposition => RightProfile {
            default_disposition: AtRisk,
            amount_policy: NoAmount,
            risk_flags: &[RiskFlag::OwnershipDispute],
        },
        Lien => RightProfile {
            default_disposition: AtRisk,
            amount_policy: MarketDiscounted,
            risk_flags: &[RiskFlag::Lien],
        },
        StatutorySuperficies => RightProfile {
            default_disposition: AtRisk,
            amount_policy: Estimated,
            risk_flags: &[RiskFlag::StatutorySuperficies],
        },
        GraveUsageRight => RightProfile {
            default_disposition: AtRisk,
            amount_policy: NoAmount,
            risk_flags: &[RiskFlag::GraveUsage],
        },
    }
}

/// The claim amount a right contributes when it ends up assumed, per its
/// kind's amount policy. Null claims count as zero.
pub fn policy_adjusted_claim(right: &RegisteredRight) -> i64 {
    let claim = right.claim_amount.unwrap_or(0);
    match profile_for(right.kind).amount_policy {
        AmountPolicy::FullAmount | AmountPolicy::Estimated => claim,
        AmountPolicy::NoAmount => 0,
        AmountPolicy::MarketDiscounted => (claim as f64 * MARKET_DISCOUNT).round() as i64,
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classify all rights and tenants against the base extinguishing right.
///
/// The input slices are never mutated; derived fields are filled on copies in
/// the result. Every input right lands in exactly one of the assumed /
/// extinguished / at-risk buckets and every tenant in assumed / extinguished.
pub fn classify_rights(
    rights: &[RegisteredRight],
    tenants: &[Tenant],
    dividend_deadline: Option<NaiveDate>,
) -> RightsAnalysisResult {
    let mut notes = Vec::new();

    // Priority order: registration date ascending, input order on ties.
    let mut ordered: Vec<RegisteredRight> = rights.to_vec();
    ordered.sort_by_key(|right| right.registered_on);
    for (index, right) in ordered.iter_mut().enumerate() {
        right.priority_rank = Some(index as u32 + 1);
    }

    let base_right = ordered
        .iter()
        .find(|right| profile_for(right.kind).default_disposition == Disposition::Extinguished)
        .cloned();

    match &base_right {
        Some(base) => notes.push(format!(
            "base extinguishing right: {} ({}) registered {}",
            base.right_id,
            base.kind.as_str(),
            base.registered_on
        )),
        None => notes.push(
            "no right qualifies as base; all rights keep their table defaults".to_string(),
        ),
    }

    let mut assumed_rights = Vec::new();
    let mut extinguished_rights = Vec::new();
    let mut at_risk_rights = Vec::new();
    let mut risk_flags: BTreeSet<RiskFlag> = BTreeSet::new();

    for mut right in ordered {
        for flag in profile_for(right.kind).risk_flags {
            risk_flags.insert(*flag);
        }

        let default = profile_for(right.kind).default_disposition;
        let disposition = match (&base_right, default) {
            (_, Disposition::AtRisk) => Disposition::AtRisk,
            (None, default) => default,
            (Some(base), Disposition::Assumed) => {
                if right.registered_on < base.registered_on {
                    Disposition::Assumed
                } else {
                    Disposition::Extinguished
                }
            }
            (Some(_), Disposition::Extinguished) => Disposition::Extinguished,
        };

        right.disposition = Some(disposition);
        match disposition {
            Disposition::Assumed => {
                let why = if base_right.is_some() {
                    "senior to the base right"
                } else {
                    "no base right to extinguish it"
                };
                notes.push(format!(
                    "{} ({}) survives the sale, {why}",
                    right.right_id,
                    right.kind.as_str()
                ));
                assumed_rights.push(right);
            }
            Disposition::AtRisk => {
                notes.push(format!(
                    "{} ({}) is not resolved by priority, marked at risk",
                    right.right_id,
                    right.kind.as_str()
                ));
                at_risk_rights.push(right);
            }
            Disposition::Extinguished => extinguished_rights.push(right),
        }
    }

    // Tenant standing is judged against the base right's registration date.
    let mut assumed_tenants = Vec::new();
    let mut extinguished_tenants = Vec::new();
    for tenant in tenants {
        let mut tenant = tenant.clone();
        tenant.has_standing = match &base_right {
            Some(base) => tenant.moved_in < base.registered_on,
            None => true,
        };
        tenant.is_assumed = tenant.has_standing;

        if tenant.commercial {
            risk_flags.insert(RiskFlag::CommercialTenancy);
        }
        if tenant.has_standing && tenant.fixed_date.is_none() {
            risk_flags.insert(RiskFlag::UnclearDividend);
            notes.push(format!(
                "{} has standing but no fixed-date registration",
                tenant.tenant_id
            ));
        }

        if tenant.is_assumed {
            let net = tenant.net_deposit();
            if tenant.small_tenant && net < tenant.deposit {
                notes.push(format!(
                    "{} is a small tenant, assumed deposit reduced to {net}",
                    tenant.tenant_id
                ));
            } else {
                notes.push(format!(
                    "{} deposit {} is assumed by the buyer",
                    tenant.tenant_id, tenant.deposit
                ));
            }
            assumed_tenants.push(tenant);
        } else {
            extinguished_tenants.push(tenant);
        }
    }

    if !tenants.is_empty() && dividend_deadline.is_none() {
        risk_flags.insert(RiskFlag::UnclearDividend);
        notes.push("dividend-request deadline unknown with tenants present".to_string());
    }
    if tenants.len() >= MULTIPLE_TENANT_THRESHOLD {
        risk_flags.insert(RiskFlag::MultipleTenants);
        notes.push(format!("{} tenants on one listing", tenants.len()));
    }

    let assumed_total = assumed_rights.iter().map(policy_adjusted_claim).sum::<i64>()
        + assumed_tenants
            .iter()
            .map(Tenant::net_deposit)
            .sum::<i64>();

    RightsAnalysisResult {
        base_right,
        assumed_rights,
        extinguished_rights,
        at_risk_rights,
        assumed_tenants,
        extinguished_tenants,
        risk_flags,
        assumed_total,
        notes,
    }
}
