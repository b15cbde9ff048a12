use std::collections::BTreeMap;

use auction_core::competition::{field_bounds, generate_competitor_bids};
use auction_core::policy::cap_bid_price;
use auction_core::rights::{classify_rights, policy_adjusted_claim};
use auction_core::run_feasibility;
use auction_core::valuation::resolve_valuation;
use chrono::{Days, NaiveDate};
use contracts::{
    Difficulty, EngineInput, PropertySnapshot, PropertyType, RegisteredRight, RightKind, Tenant,
};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid date")
}

fn right_from(index: usize, kind_index: usize, claim: i64, day_offset: u64) -> RegisteredRight {
    RegisteredRight {
        right_id: format!("r{index}"),
        kind: RightKind::ALL[kind_index % RightKind::ALL.len()],
        claim_amount: (claim > 0).then_some(claim),
        registered_on: base_date()
            .checked_add_days(Days::new(day_offset))
            .expect("offset in range"),
        priority_rank: None,
        disposition: None,
    }
}

fn tenant_from(index: usize, deposit: i64, day_offset: u64, small: bool) -> Tenant {
    Tenant {
        tenant_id: format!("t{index}"),
        deposit,
        moved_in: base_date()
            .checked_add_days(Days::new(day_offset))
            .expect("offset in range"),
        fixed_date: Some(base_date()),
        commercial: false,
        small_tenant: small,
        priority_payment: if small { deposit / 3 } else { 0 },
        has_standing: false,
        is_assumed: false,
    }
}

#[test]
fn scenario_d_five_competitors_under_the_user_bid() {
    let lowest_bid = 200_000_000;
    let user_bid = lowest_bid * 3 / 2;
    let fmv = 260_000_000;
    let appraisal = 290_000_000;
    let bids = generate_competitor_bids(
        5,
        fmv,
        appraisal,
        lowest_bid,
        user_bid,
        Difficulty::Normal,
        0.2,
        100_000,
    );
    assert_eq!(bids.len(), 5);
    let (lower, upper) = field_bounds(fmv, appraisal, lowest_bid, user_bid);
    for bid in &bids {
        assert!(*bid < user_bid);
        assert!(*bid >= lower.ceil() as i64);
        assert!(*bid <= upper.floor() as i64);
    }
    assert!(bids.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn full_report_round_trips_through_json() {
    let mut input = EngineInput::new(PropertySnapshot::sample(), 400_000_000);
    input.options.include_competition = true;
    let output = run_feasibility(&input).expect("report");

    let encoded_input = serde_json::to_string(&input).expect("serialize input");
    let decoded: EngineInput = serde_json::from_str(&encoded_input).expect("deserialize input");
    assert_eq!(input, decoded);

    let encoded_output = serde_json::to_string(&output).expect("serialize output");
    let decoded: contracts::EngineOutput =
        serde_json::from_str(&encoded_output).expect("deserialize output");
    assert_eq!(output, decoded);
}

proptest! {
    #[test]
    fn cap_respects_both_bounds(
        fmv in 1_000_000_i64..2_000_000_000,
        lowest_bid in 1_000_000_i64..2_000_000_000,
    ) {
        let cap = cap_bid_price(fmv, lowest_bid);
        prop_assert!(cap <= fmv);
        prop_assert!(cap as f64 <= fmv as f64 * 0.95);
        prop_assert!(cap as f64 <= (lowest_bid as f64 * 1.05).ceil());
    }

    #[test]
    fn competitor_field_is_bounded_sorted_and_strictly_below_user_bid(
        fmv in 100_000_000_i64..600_000_000,
        count in 1_usize..12,
        overheat in 0.0_f64..1.0,
    ) {
        let lowest_bid = fmv * 4 / 5;
        let user_bid = lowest_bid * 3 / 2;
        let appraisal = (fmv as f64 / 0.9) as i64;
        let bids = generate_competitor_bids(
            count,
            fmv,
            appraisal,
            lowest_bid,
            user_bid,
            Difficulty::Hard,
            overheat,
            100_000,
        );
        prop_assert_eq!(bids.len(), count);
        let (lower, upper) = field_bounds(fmv, appraisal, lowest_bid, user_bid);
        for bid in &bids {
            prop_assert!(*bid < user_bid);
            prop_assert!(*bid >= lower.ceil() as i64);
            prop_assert!(*bid <= upper.floor() as i64);
        }
        prop_assert!(bids.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn assumed_total_matches_recomputed_sum(
        specs in prop::collection::vec((0_usize..15, 0_i64..500_000_000, 0_u64..3650), 0..8),
        deposits in prop::collection::vec((1_000_000_i64..300_000_000, 0_u64..3650, any::<bool>()), 0..4),
    ) {
        let rights: Vec<RegisteredRight> = specs
            .iter()
            .enumerate()
            .map(|(index, (kind, claim, offset))| right_from(index, *kind, *claim, *offset))
            .collect();
        let tenants: Vec<Tenant> = deposits
            .iter()
            .enumerate()
            .map(|(index, (deposit, offset, small))| tenant_from(index, *deposit, *offset, *small))
            .collect();

        let result = classify_rights(&rights, &tenants, Some(base_date()));

        let expected: i64 = result.assumed_rights.iter().map(policy_adjusted_claim).sum::<i64>()
            + result.assumed_tenants.iter().map(Tenant::net_deposit).sum::<i64>();
        prop_assert!(result.assumed_total >= 0);
        prop_assert_eq!(result.assumed_total, expected);

        let bucketed = result.assumed_rights.len()
            + result.extinguished_rights.len()
            + result.at_risk_rights.len();
        prop_assert_eq!(bucketed, rights.len());
        let tenant_bucketed = result.assumed_tenants.len() + result.extinguished_tenants.len();
        prop_assert_eq!(tenant_bucketed, tenants.len());
    }

    #[test]
    fn no_base_right_means_table_defaults_everywhere(
        claims in prop::collection::vec(1_000_000_i64..100_000_000, 1..6),
    ) {
        // Only kinds whose default is not extinguished, so no base qualifies.
        let non_base = [
            RightKind::LeaseholdRight,
            RightKind::Lien,
            RightKind::ProvisionalDisposition,
            RightKind::GraveUsageRight,
            RightKind::OwnershipTransferClaimPreRegistration,
        ];
        let rights: Vec<RegisteredRight> = claims
            .iter()
            .enumerate()
            .map(|(index, claim)| {
                let mut right = right_from(index, 0, *claim, index as u64 * 30);
                right.kind = non_base[index % non_base.len()];
                right
            })
            .collect();
        let result = classify_rights(&rights, &[], Some(base_date()));
        prop_assert!(result.base_right.is_none());
        for right in result
            .assumed_rights
            .iter()
            .chain(&result.extinguished_rights)
            .chain(&result.at_risk_rights)
        {
            let expected = auction_core::rights::profile_for(right.kind).default_disposition;
            prop_assert_eq!(right.disposition, Some(expected));
        }
    }

    #[test]
    fn valuation_is_idempotent_and_positive(
        appraisal in prop::option::of(50_000_000_i64..1_000_000_000),
        min_bid in prop::option::of(40_000_000_i64..800_000_000),
        hint in prop::option::of(50_000_000_i64..1_000_000_000),
        signal in prop::option::of(0.5_f64..1.5),
    ) {
        let mut signals = BTreeMap::new();
        if let Some(value) = signal {
            signals.insert("trend".to_string(), value);
        }
        let first = resolve_valuation(
            appraisal,
            min_bid,
            hint,
            PropertyType::MultiplexHouse,
            &signals,
            None,
        );
        let second = resolve_valuation(
            appraisal,
            min_bid,
            hint,
            PropertyType::MultiplexHouse,
            &signals,
            None,
        );
        prop_assert_eq!(&first, &second);
        prop_assert!(first.fmv > 0);
        prop_assert!(first.appraisal > 0);
        prop_assert!(first.min_bid > 0);
    }
}
