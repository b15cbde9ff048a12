//! Competitor bid simulator.
//!
//! Produces a synthetic field of competing bids around FMV, bounded below by
//! the minimum-bid floor and above by the policy caps and the user's own bid.
//! The distribution shape (mean, spread, bounds, thin high tail) is the
//! contract; the randomness source is deliberately non-seeded, so exact
//! values differ between runs.
//!
//! Sampling uses a summed-uniform approximation of a truncated normal. A draw
//! that stays out of bounds after bounded retries falls back to the clamped
//! mean; under tight bounds this biases the field toward the mean, which the
//! grading model depends on.

use contracts::Difficulty;
use rand::Rng;

/// Out-of-bounds draws tolerated per sample before the mean fallback.
const MAX_SAMPLE_RETRIES: usize = 8;

fn difficulty_bias(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => -0.02,
        Difficulty::Normal => 0.0,
        Difficulty::Hard => 0.03,
    }
}

fn difficulty_spread_extra(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.0,
        Difficulty::Normal => 0.005,
        Difficulty::Hard => 0.01,
    }
}

pub(crate) fn round_to_tick(value: f64, tick: i64) -> i64 {
    let tick = tick.max(1);
    (value / tick as f64).round() as i64 * tick
}

/// Sum of twelve uniforms minus six: mean 0, variance 1.
fn summed_uniform_z<R: Rng>(rng: &mut R) -> f64 {
    (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0
}

/// Lower and upper price bounds for the simulated field.
pub fn field_bounds(fmv: i64, appraisal: i64, lowest_bid: i64, user_bid: i64) -> (f64, f64) {
    let lower = (lowest_bid as f64 * 1.02).max(fmv as f64 * 0.85);
    let upper = (fmv as f64 * 1.05)
        .min(appraisal as f64 * 0.99)
        .min(user_bid as f64 * 0.985);
    if upper < lower {
        (upper, upper)
    } else {
        (lower, upper)
    }
}

/// Generate `n` synthetic competing bids, sorted ascending, every one
/// strictly below `user_bid`.
#[allow(clippy::too_many_arguments)]
pub fn generate_competitor_bids(
    n: usize,
    fmv: i64,
    appraisal: i64,
    lowest_bid: i64,
    user_bid: i64,
    difficulty: Difficulty,
    overheat: f64,
    tick: i64,
) -> Vec<i64> {
    if n == 0 || fmv <= 0 || user_bid <= 0 {
        return Vec::new();
    }
    let tick = tick.max(1);
    let overheat = overheat.clamp(0.0, 1.0);

    let mean = fmv as f64 * (1.0 + difficulty_bias(difficulty) + 0.03 * overheat);
    let sigma = fmv as f64
        * (0.05 + 0.01 * overheat + difficulty_spread_extra(difficulty)).clamp(0.05, 0.07);

    let (lower, upper) = field_bounds(fmv, appraisal, lowest_bid, user_bid);
    let mean_in_bounds = mean.clamp(lower, upper);
    let mut floor_price = lower.ceil() as i64;
    let ceil_price = upper.floor() as i64;
    if ceil_price < floor_price {
        floor_price = ceil_price;
    }

    let mut rng = rand::thread_rng();
    let mut bids = Vec::with_capacity(n);
    for index in 0..n {
        let mut accepted = None;
        for _ in 0..MAX_SAMPLE_RETRIES {
            let candidate = mean + summed_uniform_z(&mut rng) * sigma;
            if candidate >= lower && candidate <= upper {
                accepted = Some(candidate);
                break;
            }
        }
        let raw = accepted.unwrap_or(mean_in_bounds);
        let jitter = if index % 2 == 0 { tick } else { -tick };
        let price = (round_to_tick(raw, tick) + jitter).clamp(floor_price, ceil_price);
        bids.push(price);
    }

    // Thin heated tail: lift a few of the highest samples toward the cap.
    bids.sort_unstable();
    let boosted = ((n as f64 * 0.3 * overheat).round() as usize).min(n / 3);
    if boosted > 0 {
        let lift = round_to_tick(0.5 * sigma, tick);
        for price in bids.iter_mut().rev().take(boosted) {
            *price = (*price + lift).min(ceil_price);
        }
    }

    // The user's own bid is never matched or exceeded.
    for price in bids.iter_mut() {
        if *price > user_bid - tick {
            *price = user_bid - tick;
        }
    }

    bids.sort_unstable();
    bids
}

#[cfg(test)]
mod tests {
    use super::*;

    const FMV: i64 = 280_000_000;
    const APPRAISAL: i64 = 310_000_000;
    const LOWEST: i64 = 200_000_000;
    const TICK: i64 = 100_000;

    #[test]
    fn five_bids_stay_bounded_and_sorted() {
        let user_bid = LOWEST * 3 / 2;
        let bids = generate_competitor_bids(
            5,
            FMV,
            APPRAISAL,
            LOWEST,
            user_bid,
            Difficulty::Normal,
            0.3,
            TICK,
        );
        assert_eq!(bids.len(), 5);
        let (lower, upper) = field_bounds(FMV, APPRAISAL, LOWEST, user_bid);
        for bid in &bids {
            assert!(*bid < user_bid);
            assert!(*bid >= lower.ceil() as i64);
            assert!(*bid <= upper.floor() as i64);
        }
        assert!(bids.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn bids_never_reach_the_user_bid_even_when_it_is_low() {
        let user_bid = (FMV as f64 * 0.90) as i64;
        let bids = generate_competitor_bids(
            8,
            FMV,
            APPRAISAL,
            LOWEST,
            user_bid,
            Difficulty::Hard,
            1.0,
            TICK,
        );
        for bid in bids {
            assert!(bid < user_bid);
        }
    }

    #[test]
    fn zero_count_or_degenerate_fmv_yields_empty() {
        assert!(generate_competitor_bids(
            0,
            FMV,
            APPRAISAL,
            LOWEST,
            300_000_000,
            Difficulty::Normal,
            0.0,
            TICK
        )
        .is_empty());
        assert!(generate_competitor_bids(
            5,
            0,
            APPRAISAL,
            LOWEST,
            300_000_000,
            Difficulty::Normal,
            0.0,
            TICK
        )
        .is_empty());
    }

    #[test]
    fn collapsed_bounds_fall_back_to_the_cap_side() {
        // User bid so low that the upper cap sits under the lower floor.
        let user_bid = (FMV as f64 * 0.80) as i64;
        let bids = generate_competitor_bids(
            4,
            FMV,
            APPRAISAL,
            LOWEST,
            user_bid,
            Difficulty::Easy,
            0.0,
            TICK,
        );
        assert_eq!(bids.len(), 4);
        for bid in bids {
            assert!(bid < user_bid);
        }
    }

    #[test]
    fn field_bounds_respect_all_three_caps() {
        let (lower, upper) = field_bounds(FMV, APPRAISAL, LOWEST, 290_000_000);
        assert!(lower >= FMV as f64 * 0.85);
        assert!(upper <= FMV as f64 * 1.05);
        assert!(upper <= APPRAISAL as f64 * 0.99);
        assert!(upper <= 290_000_000f64 * 0.985);
    }

    #[test]
    fn round_to_tick_snaps_to_nearest_multiple() {
        assert_eq!(round_to_tick(123_449_999.0, 100_000), 123_400_000);
        assert_eq!(round_to_tick(123_450_001.0, 100_000), 123_500_000);
        assert_eq!(round_to_tick(5.4, 0), 5);
    }
}
