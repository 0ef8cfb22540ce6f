use crate::domain::models::{AggregateMetrics, Client, ClientMetrics};

/// Derive a client's metrics from its monthly series.
///
/// An empty series, or a last record without a numeric portfolio value,
/// yields the zero record. "Last" means last in sequence order, not the
/// highest `month` field; the two may diverge for unsorted input.
pub fn compute_metrics(client: &Client) -> ClientMetrics {
    let Some(last) = client.monthly_data.last() else {
        return ClientMetrics::zero();
    };
    let Some(portfolio_value) = last.portfolio_value else {
        return ClientMetrics::zero();
    };

    let total_investment: f64 = client
        .monthly_data
        .iter()
        .map(|record| record.investment.unwrap_or(0.0))
        .sum();

    ClientMetrics {
        total_investment,
        portfolio_value,
        total_profit: last.profit.unwrap_or(0.0),
        latest_monthly_investment: last.investment.unwrap_or(0.0),
        management_fee: total_investment * 0.005,
        current_value: portfolio_value,
    }
}

/// Fold per-client metrics into portfolio-wide totals.
pub fn aggregate(clients: &[Client]) -> AggregateMetrics {
    clients.iter().fold(AggregateMetrics::zero(), |acc, client| {
        let metrics = compute_metrics(client);
        AggregateMetrics {
            total_value: acc.total_value + metrics.portfolio_value,
            total_investment: acc.total_investment + metrics.total_investment,
            total_profit: acc.total_profit + metrics.total_profit,
            total_clients: clients.len(),
        }
    })
}
