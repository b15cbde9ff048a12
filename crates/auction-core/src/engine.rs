//! Engine orchestrator.
//!
//! Validates the input envelope, sequences valuation, rights classification,
//! cost, and profit, derives the policy cap, overheat score, and the
//! three-point bid ladder, and optionally attaches a simulated competing
//! field. Inside the pipeline everything is fail-open; the only hard errors
//! are structural input defects caught here at the boundary.

use std::fmt;

use contracts::{BidLadder, EngineInput, EngineOutput, ValuationResult};

use crate::competition::{self, round_to_tick};
use crate::{costs, policy, profit, rights, valuation};

#[derive(Debug, PartialEq, Eq)]
pub enum EngineError {
    InvalidBidPrice(i64),
    EmptySnapshot,
    NonPositivePrice { field: &'static str, value: i64 },
    NegativeAmount { field: &'static str, value: i64 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBidPrice(value) => {
                write!(f, "bid price must be positive, got {value}")
            }
            Self::EmptySnapshot => write!(
                f,
                "snapshot carries no appraisal, minimum bid, fmv hint, rights, or tenants"
            ),
            Self::NonPositivePrice { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::NegativeAmount { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

fn validate(input: &EngineInput) -> Result<(), EngineError> {
    if input.bid_price <= 0 {
        return Err(EngineError::InvalidBidPrice(input.bid_price));
    }
    let snapshot = &input.snapshot;
    if snapshot.is_structurally_empty() {
        return Err(EngineError::EmptySnapshot);
    }
    for (field, value) in [
        ("appraisal", snapshot.appraisal),
        ("min_bid", snapshot.min_bid),
        ("fmv_hint", snapshot.fmv_hint),
        ("exit_price", input.options.exit_price),
    ] {
        if let Some(value) = value {
            if value <= 0 {
                return Err(EngineError::NonPositivePrice { field, value });
            }
        }
    }
    for right in &snapshot.rights {
        if let Some(claim) = right.claim_amount {
            if claim < 0 {
                return Err(EngineError::NegativeAmount {
                    field: "claim_amount",
                    value: claim,
                });
            }
        }
    }
    for tenant in &snapshot.tenants {
        if tenant.deposit < 0 {
            return Err(EngineError::NegativeAmount {
                field: "deposit",
                value: tenant.deposit,
            });
        }
        if tenant.priority_payment < 0 {
            return Err(EngineError::NegativeAmount {
                field: "priority_payment",
                value: tenant.priority_payment,
            });
        }
    }
    Ok(())
}

/// Conservative rung sits on the shared field floor, aggressive on the policy
/// cap, balanced on the tick-rounded midpoint. Every rung stays at or under
/// the cap.
fn build_ladder(valuation: &ValuationResult, cap: i64, tick: i64) -> BidLadder {
    let tick = tick.max(1);
    let floor_raw = (valuation.min_bid as f64 * 1.02).max(valuation.fmv as f64 * 0.85);
    let conservative = round_to_tick(floor_raw, tick)
        .max(valuation.min_bid + tick)
        .min(cap);
    let mut aggressive = cap / tick * tick;
    if aggressive < conservative {
        aggressive = conservative;
    }
    let balanced = round_to_tick((conservative + aggressive) as f64 / 2.0, tick)
        .clamp(conservative, aggressive);
    BidLadder {
        conservative,
        balanced,
        aggressive,
    }
}

fn default_competitor_count(input: &EngineInput) -> usize {
    if let Some(count) = input.options.competitor_count {
        return count;
    }
    if let Some(count) = input
        .snapshot
        .history
        .last()
        .and_then(|round| round.bidder_count)
    {
        return count as usize;
    }
    match input.options.difficulty {
        contracts::Difficulty::Easy => 3,
        contracts::Difficulty::Normal => 4,
        contracts::Difficulty::Hard => 6,
    }
}

/// Run the full feasibility pipeline for one snapshot and candidate bid.
pub fn run_feasibility(input: &EngineInput) -> Result<EngineOutput, EngineError> {
    validate(input)?;
    let snapshot = &input.snapshot;
    let options = &input.options;

    let valuation = valuation::resolve_valuation(
        snapshot.appraisal,
        snapshot.min_bid,
        snapshot.fmv_hint,
        snapshot.property_type,
        &snapshot.market_signals,
        options.kappa_override,
    );
    let rights = rights::classify_rights(
        &snapshot.rights,
        &snapshot.tenants,
        snapshot.dividend_deadline,
    );
    let costs = costs::calc_costs(
        input.bid_price,
        rights.assumed_total,
        snapshot.property_type,
        &rights.risk_flags,
        &options.cost_overrides,
    );
    let profit =
        profit::evaluate_profit(valuation.fmv, costs.total_acquisition, options.exit_price);

    let overheat = policy::compute_overheat(input.bid_price, valuation.fmv, valuation.appraisal);
    let bid_cap = policy::cap_bid_price(valuation.fmv, valuation.min_bid);
    let ladder = build_ladder(&valuation, bid_cap, options.tick);

    let mut notes = Vec::new();
    notes.extend(valuation.notes.iter().cloned());
    notes.extend(rights.notes.iter().cloned());
    notes.extend(costs.notes.iter().cloned());

    let failed_rounds = snapshot.history.iter().filter(|round| !round.sold).count();
    if failed_rounds > 0 {
        notes.push(format!("{failed_rounds} prior round(s) closed without a sale"));
    }

    let competitor_bids = if options.include_competition || options.competitor_count.is_some() {
        let count = default_competitor_count(input);
        notes.push(format!("simulating {count} competing bid(s)"));
        Some(competition::generate_competitor_bids(
            count,
            valuation.fmv,
            valuation.appraisal,
            valuation.min_bid,
            input.bid_price,
            options.difficulty,
            overheat,
            options.tick,
        ))
    } else {
        None
    };

    if options.verbose {
        notes.push(format!(
            "valuation: fmv={} appraisal={} min_bid={}",
            valuation.fmv, valuation.appraisal, valuation.min_bid
        ));
        notes.push(format!(
            "rights: assumed_total={} flags={}",
            rights.assumed_total,
            rights.risk_flags.len()
        ));
        notes.push(format!(
            "costs: total_acquisition={}",
            costs.total_acquisition
        ));
        notes.push(format!(
            "policy: cap={bid_cap} overheat={overheat:.3}"
        ));
    }

    Ok(EngineOutput {
        schema_version: snapshot.schema_version.clone(),
        case_id: snapshot.case_id.clone(),
        bid_price: input.bid_price,
        valuation,
        rights,
        costs,
        profit,
        overheat,
        bid_cap,
        ladder,
        competitor_bids,
        notes,
    })
}
