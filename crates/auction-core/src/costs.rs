//! Acquisition cost calculator.
//!
//! Converts the bid price, the assumed-encumbrance total, and the classifier's
//! risk flags into taxes, eviction cost, miscellaneous cost, and the grand
//! total. Rates and bases come from per-type tables with per-run overrides;
//! an unknown property type falls back to the apartment row with a note.

use std::collections::BTreeSet;

use contracts::{CostBreakdown, CostOverrides, PropertyType, RiskFlag};

/// Education tax as a fraction of the bid price.
pub const EDUCATION_TAX_RATE: f64 = 0.001;

/// Special rural development tax as a fraction of the bid price.
pub const SPECIAL_RURAL_TAX_RATE: f64 = 0.002;

/// Base miscellaneous cost (registration, filing, title transfer paperwork).
pub const MISC_BASE: i64 = 2_000_000;

fn acquisition_tax_rate(property_type: PropertyType) -> f64 {
    match property_type {
        PropertyType::Apartment
        | PropertyType::DetachedHouse
        | PropertyType::MultiFamilyHouse
        | PropertyType::MultiplexHouse
        | PropertyType::RowHouse => 0.011,
        PropertyType::StudioOffice | PropertyType::Commercial => 0.046,
        PropertyType::Unknown => 0.011,
    }
}

fn eviction_base(property_type: PropertyType) -> i64 {
    match property_type {
        PropertyType::Apartment => 3_000_000,
        PropertyType::StudioOffice => 2_500_000,
        PropertyType::DetachedHouse => 5_000_000,
        PropertyType::MultiFamilyHouse => 6_000_000,
        PropertyType::MultiplexHouse => 4_000_000,
        PropertyType::RowHouse => 4_000_000,
        PropertyType::Commercial => 7_000_000,
        PropertyType::Unknown => 3_000_000,
    }
}

fn eviction_increment(flag: RiskFlag) -> i64 {
    match flag {
        RiskFlag::Lien => 15_000_000,
        RiskFlag::StatutorySuperficies => 10_000_000,
        RiskFlag::GraveUsage => 5_000_000,
        RiskFlag::CommercialTenancy => 5_000_000,
        _ => 0,
    }
}

fn misc_increment(flag: RiskFlag) -> i64 {
    match flag {
        RiskFlag::OwnershipDispute => 3_000_000,
        RiskFlag::UnclearDividend => 1_000_000,
        _ => 0,
    }
}

fn round_krw(value: f64) -> i64 {
    value.round() as i64
}

/// Compute the full cost breakdown for one candidate bid.
pub fn calc_costs(
    bid_price: i64,
    assumed_total: i64,
    property_type: PropertyType,
    risk_flags: &BTreeSet<RiskFlag>,
    overrides: &CostOverrides,
) -> CostBreakdown {
    let mut notes = Vec::new();

    if property_type == PropertyType::Unknown {
        notes.push("unrecognized property type, using apartment cost tables".to_string());
    }

    let acquisition_rate = overrides
        .acquisition_tax_rate
        .unwrap_or_else(|| acquisition_tax_rate(property_type));
    let education_rate = overrides.education_tax_rate.unwrap_or(EDUCATION_TAX_RATE);
    let rural_rate = overrides
        .special_rural_tax_rate
        .unwrap_or(SPECIAL_RURAL_TAX_RATE);

    let acquisition_tax = round_krw(bid_price as f64 * acquisition_rate);
    let education_tax = round_krw(bid_price as f64 * education_rate);
    let special_rural_tax = round_krw(bid_price as f64 * rural_rate);
    let total_tax = acquisition_tax + education_tax + special_rural_tax;
    notes.push(format!(
        "taxes at {:.3}% acquisition, {:.3}% education, {:.3}% rural on bid {bid_price}",
        acquisition_rate * 100.0,
        education_rate * 100.0,
        rural_rate * 100.0
    ));

    let mut eviction_cost = overrides
        .eviction_base
        .unwrap_or_else(|| eviction_base(property_type));
    let mut misc_cost = overrides.misc_base.unwrap_or(MISC_BASE);
    for flag in risk_flags {
        let eviction_extra = eviction_increment(*flag);
        if eviction_extra > 0 {
            eviction_cost += eviction_extra;
            notes.push(format!(
                "eviction +{eviction_extra} for {}",
                flag.as_str()
            ));
        }
        let misc_extra = misc_increment(*flag);
        if misc_extra > 0 {
            misc_cost += misc_extra;
            notes.push(format!("misc +{misc_extra} for {}", flag.as_str()));
        }
    }

    let total_acquisition = bid_price + assumed_total + total_tax + eviction_cost + misc_cost;

    CostBreakdown {
        acquisition_tax,
        education_tax,
        special_rural_tax,
        total_tax,
        eviction_cost,
        misc_cost,
        total_acquisition,
        notes,
    }
}
