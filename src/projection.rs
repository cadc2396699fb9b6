use crate::model::ProposalRecord;

/// Fixed issue price used to scale dividend rates into currency returns.
pub const SHARE_PRICE: f64 = 8.0;

/// Derived financial figures. Recomputed for every generation call; a pure
/// function of the record with no shared state.
#[derive(Clone, Copy, Debug)]
pub struct ProjectionFigures {
    pub shares_issued: f64,
    /// Target-driven: `investment_amount * (1 + target_return / 100)`.
    pub target_value: f64,
    /// Fractional rate, e.g. 0.1983 for 19.83% per year.
    pub annualized_return: f64,
    pub year_returns: [f64; 3],
    /// Cumulative values; index 0 is the principal.
    pub year_values: [f64; 4],
    /// Percent growth of each year against the prior cumulative value.
    pub year_growth: [f64; 3],
}

impl ProjectionFigures {
    pub fn compute(record: &ProposalRecord) -> Self {
        let shares_issued = record.investment_amount / SHARE_PRICE;

        let dividends = [
            record.year1_dividend,
            record.year2_dividend,
            record.year3_dividend,
        ];
        let mut year_returns = [0.0; 3];
        let mut year_values = [record.investment_amount; 4];
        let mut year_growth = [0.0; 3];
        for (i, rate) in dividends.into_iter().enumerate() {
            let ret = shares_issued * rate;
            year_returns[i] = ret;
            year_values[i + 1] = year_values[i] + ret;
            year_growth[i] = ret / year_values[i] * 100.0;
        }

        let target_value = record.investment_amount * (1.0 + record.target_return / 100.0);
        let annualized_return =
            (target_value / record.investment_amount).powf(1.0 / record.time_horizon as f64) - 1.0;

        Self {
            shares_issued,
            target_value,
            annualized_return,
            year_returns,
            year_values,
            year_growth,
        }
    }
}
