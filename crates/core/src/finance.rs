//! Project financial rollup.
//!
//! The derived monetary fields on a project are never written directly by
//! handlers. Every mutation that affects an input (team lines, equipment
//! lines, profit margin) recomputes the full set via [`recompute_totals`]
//! inside the same transaction, so the invariants below hold at all times:
//!
//! - `total_cost == total_team_cost + total_equipment_cost`
//! - `total_client_price == total_cost * (1 + profit_margin / 100)`
//! - `total_profit == total_client_price - total_cost`

use serde::Serialize;

/// The full set of derived monetary fields on a project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub total_team_cost: f64,
    pub total_equipment_cost: f64,
    pub total_cost: f64,
    pub total_client_price: f64,
    pub total_profit: f64,
}

/// Recompute all derived totals from line-item sums and the margin percent.
pub fn recompute_totals(team_costs: &[f64], equipment_costs: &[f64], margin_percent: f64) -> Totals {
    let total_team_cost: f64 = team_costs.iter().sum();
    let total_equipment_cost: f64 = equipment_costs.iter().sum();
    let total_cost = total_team_cost + total_equipment_cost;
    let total_client_price = total_cost * (1.0 + margin_percent / 100.0);
    Totals {
        total_team_cost,
        total_equipment_cost,
        total_cost,
        total_client_price,
        total_profit: total_client_price - total_cost,
    }
}

/// Line amount for a staffing or equipment row: rate x quantity x days.
pub fn line_total(daily_rate: f64, quantity: i32, duration_days: i32) -> f64 {
    daily_rate * f64::from(quantity) * f64::from(duration_days)
}

/// Split an accepted quote's grand total across the quoted equipment lines.
///
/// When the supplier priced a daily rate, each line costs
/// `rate x quantity x days`. Otherwise the lump-sum price plus fees is
/// distributed proportionally by each line's `quantity x days` weight. Lines
/// with zero weight get an even share so no cost silently disappears.
pub fn allocate_quote_cost(
    total_price: f64,
    delivery_fee: f64,
    setup_fee: f64,
    daily_rate: Option<f64>,
    lines: &[(i32, i32)],
) -> Vec<f64> {
    if lines.is_empty() {
        return Vec::new();
    }
    if let Some(rate) = daily_rate {
        return lines
            .iter()
            .map(|&(quantity, days)| line_total(rate, quantity, days))
            .collect();
    }
    let grand_total = total_price + delivery_fee + setup_fee;
    let weights: Vec<f64> = lines
        .iter()
        .map(|&(quantity, days)| f64::from(quantity) * f64::from(days))
        .collect();
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        let share = grand_total / lines.len() as f64;
        return vec![share; lines.len()];
    }
    weights.iter().map(|w| grand_total * w / weight_sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 0.01;

    #[test]
    fn totals_invariants_hold() {
        let totals = recompute_totals(&[1200.0, 800.0], &[1500.0], 30.0);

        assert!((totals.total_team_cost - 2000.0).abs() < EPS);
        assert!((totals.total_equipment_cost - 1500.0).abs() < EPS);
        assert!((totals.total_cost - (totals.total_team_cost + totals.total_equipment_cost)).abs() < EPS);
        assert!((totals.total_client_price - totals.total_cost * 1.30).abs() < EPS);
        assert!((totals.total_profit - (totals.total_client_price - totals.total_cost)).abs() < EPS);
    }

    #[test]
    fn empty_project_is_all_zero() {
        let totals = recompute_totals(&[], &[], 20.0);
        assert_eq!(totals.total_cost, 0.0);
        assert_eq!(totals.total_client_price, 0.0);
        assert_eq!(totals.total_profit, 0.0);
    }

    #[test]
    fn zero_margin_yields_zero_profit() {
        let totals = recompute_totals(&[500.0], &[500.0], 0.0);
        assert!((totals.total_client_price - 1000.0).abs() < EPS);
        assert!(totals.total_profit.abs() < EPS);
    }

    #[test]
    fn line_total_multiplies_rate_quantity_days() {
        assert!((line_total(350.0, 2, 3) - 2100.0).abs() < EPS);
        assert_eq!(line_total(350.0, 0, 3), 0.0);
    }

    #[test]
    fn quote_allocation_uses_daily_rate_when_present() {
        let costs = allocate_quote_cost(9999.0, 100.0, 50.0, Some(200.0), &[(2, 3), (1, 1)]);
        assert!((costs[0] - 1200.0).abs() < EPS);
        assert!((costs[1] - 200.0).abs() < EPS);
    }

    #[test]
    fn quote_allocation_distributes_lump_sum_by_weight() {
        let costs = allocate_quote_cost(900.0, 60.0, 40.0, None, &[(2, 3), (1, 4)]);
        // Weights 6 and 4 split a 1000 grand total.
        assert!((costs[0] - 600.0).abs() < EPS);
        assert!((costs[1] - 400.0).abs() < EPS);
        assert!((costs.iter().sum::<f64>() - 1000.0).abs() < EPS);
    }

    #[test]
    fn quote_allocation_zero_weight_splits_evenly() {
        let costs = allocate_quote_cost(300.0, 0.0, 0.0, None, &[(0, 0), (0, 0), (0, 0)]);
        for cost in costs {
            assert!((cost - 100.0).abs() < EPS);
        }
    }

    #[test]
    fn fractional_margin() {
        let totals = recompute_totals(&[1000.0], &[], 12.5);
        assert!((totals.total_client_price - 1125.0).abs() < EPS);
        assert!((totals.total_profit - 125.0).abs() < EPS);
    }
}
