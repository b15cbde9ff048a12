//! Valuation resolver.
//!
//! Derives the fair-market-value / appraisal / statutory-minimum-bid triple
//! from whichever subset the snapshot supplies. Missing members are inferred
//! with fixed fallbacks rather than rejected, so the pipeline never stalls on
//! an incomplete listing; every inference is appended to the note trail.

use std::collections::BTreeMap;

use contracts::{PropertyType, ValuationResult};

/// Fallback FMV when the snapshot carries no price information at all.
pub const DEFAULT_FMV: i64 = 300_000_000;

/// Statutory minimum-bid ratio against the appraisal.
pub const MIN_BID_RATIO: f64 = 0.8;

/// Appraisal-to-FMV coefficient for property types without a table entry.
pub const FALLBACK_KAPPA: f64 = 0.90;

/// Market-signal correction is clamped to this band around 1.0.
const SIGNAL_CLAMP: (f64, f64) = (0.9, 1.1);

/// Appraisal-to-FMV coefficient per property type. Court appraisals run above
/// realizable prices for the less liquid categories.
pub fn kappa_for(property_type: PropertyType) -> f64 {
    match property_type {
        PropertyType::Apartment => 0.95,
        PropertyType::StudioOffice => 0.90,
        PropertyType::DetachedHouse => 0.88,
        PropertyType::MultiFamilyHouse => 0.85,
        PropertyType::MultiplexHouse => 0.87,
        PropertyType::RowHouse => 0.86,
        PropertyType::Commercial => 0.83,
        PropertyType::Unknown => FALLBACK_KAPPA,
    }
}

fn round_krw(value: f64) -> i64 {
    value.round() as i64
}

/// Resolve the valuation triple. Infallible: every branch produces a result,
/// and identical inputs always yield identical output.
pub fn resolve_valuation(
    appraisal: Option<i64>,
    min_bid: Option<i64>,
    fmv_hint: Option<i64>,
    property_type: PropertyType,
    market_signals: &BTreeMap<String, f64>,
    kappa_override: Option<f64>,
) -> ValuationResult {
    let mut notes = Vec::new();
    let kappa = match kappa_override {
        Some(value) => {
            notes.push(format!("kappa overridden to {value:.2}"));
            value
        }
        None => kappa_for(property_type),
    };
    if property_type == PropertyType::Unknown && kappa_override.is_none() {
        notes.push(format!(
            "unrecognized property type, kappa falls back to {FALLBACK_KAPPA:.2}"
        ));
    }

    let (appraisal, min_bid, fmv) = match (appraisal, min_bid) {
        (None, None) => {
            let fmv = match fmv_hint {
                Some(hint) => {
                    notes.push(format!("no appraisal or minimum bid, fmv from hint {hint}"));
                    hint
                }
                None => {
                    notes.push(format!(
                        "no price information supplied, fmv falls back to {DEFAULT_FMV}"
                    ));
                    DEFAULT_FMV
                }
            };
            let appraisal = round_krw(fmv as f64 / kappa);
            let min_bid = round_krw(appraisal as f64 * MIN_BID_RATIO);
            notes.push(format!(
                "derived appraisal {appraisal} (fmv / {kappa:.2}) and minimum bid {min_bid}"
            ));
            (appraisal, min_bid, Some(fmv))
        }
        (Some(appraisal), None) => {
            let min_bid = round_krw(appraisal as f64 * MIN_BID_RATIO);
            notes.push(format!(
                "minimum bid absent, derived {min_bid} as appraisal x {MIN_BID_RATIO}"
            ));
            (appraisal, min_bid, None)
        }
        (None, Some(min_bid)) => {
            let appraisal = round_krw(min_bid as f64 / MIN_BID_RATIO);
            notes.push(format!(
                "appraisal absent, derived {appraisal} as minimum bid / {MIN_BID_RATIO}"
            ));
            (appraisal, min_bid, None)
        }
        (Some(appraisal), Some(min_bid)) => (appraisal, min_bid, None),
    };

    let mut fmv = match fmv.or(fmv_hint) {
        Some(known) => known,
        None => {
            let derived = round_krw(appraisal as f64 * kappa);
            notes.push(format!(
                "fmv unknown, derived {derived} as appraisal x {kappa:.2}"
            ));
            derived
        }
    };

    if !market_signals.is_empty() {
        let mean =
            market_signals.values().sum::<f64>() / market_signals.len() as f64;
        let factor = mean.clamp(SIGNAL_CLAMP.0, SIGNAL_CLAMP.1);
        let corrected = round_krw(fmv as f64 * factor);
        notes.push(format!(
            "market correction x{factor:.3} from {} signal(s): fmv {fmv} -> {corrected}",
            market_signals.len()
        ));
        fmv = corrected;
    }

    ValuationResult {
        fmv,
        appraisal,
        min_bid,
        notes,
    }
}
