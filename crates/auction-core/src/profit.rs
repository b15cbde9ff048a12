//! Profitability evaluator.
//!
//! Safety margins against FMV and against an exit price, plus the break-even
//! resale price. Sale-side taxes and fees are ignored, so break-even equals
//! the total acquisition cost.

use contracts::ProfitResult;

fn margin_rate(margin: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    margin as f64 / denominator as f64
}

/// Evaluate margins for one acquisition total. `exit_price` defaults to fmv.
pub fn evaluate_profit(fmv: i64, total_acquisition: i64, exit_price: Option<i64>) -> ProfitResult {
    let exit = exit_price.unwrap_or(fmv);
    let margin_vs_fmv = fmv - total_acquisition;
    let margin_vs_exit = exit - total_acquisition;

    ProfitResult {
        margin_vs_fmv,
        margin_rate_vs_fmv: margin_rate(margin_vs_fmv, fmv),
        margin_vs_exit,
        margin_rate_vs_exit: margin_rate(margin_vs_exit, exit),
        break_even_price: total_acquisition,
    }
}
