//! Bid policy guard and overheat scorer.
//!
//! The guard computes the hard ceiling no recommended or simulated bid may
//! exceed. The scorer converts a candidate bid into a 0..=1 heat signal
//! relative to FMV and appraisal; the more conservative of the two ratios
//! wins.

/// Hard ceiling on any recommended or simulated bid price:
/// `min(floor(fmv x 0.95), ceil(lowest_bid x 1.05))`.
pub fn cap_bid_price(fmv: i64, lowest_bid: i64) -> i64 {
    let fmv_cap = (fmv as f64 * 0.95).floor() as i64;
    let raise_cap = (lowest_bid as f64 * 1.05).ceil() as i64;
    fmv_cap.min(raise_cap)
}

/// Heat of a candidate bid in [0, 1].
///
/// Excess over 95% of fmv scaled across a 10% window, and excess over 90% of
/// appraisal scaled across a 12% window; the larger ratio is clamped.
pub fn compute_overheat(bid_price: i64, fmv: i64, appraisal: i64) -> f64 {
    if fmv <= 0 || appraisal <= 0 {
        return 0.0;
    }
    let bid = bid_price as f64;
    let vs_fmv = (bid - fmv as f64 * 0.95) / (fmv as f64 * 0.10);
    let vs_appraisal = (bid - appraisal as f64 * 0.90) / (appraisal as f64 * 0.12);
    vs_fmv.max(vs_appraisal).clamp(0.0, 1.0)
}
