use crate::domain::models::MonthlyRecord;
use serde::Serialize;

/// Which direct-projection series the dashboard currently shows.
/// ROI is always shown and has no flag.
#[derive(Debug, Clone, Copy)]
pub struct SeriesVisibility {
    pub portfolio_value: bool,
    pub investment: bool,
    pub profit: bool,
}

impl Default for SeriesVisibility {
    fn default() -> Self {
        Self {
            portfolio_value: true,
            investment: true,
            profit: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedSeries {
    pub id: &'static str,
    pub color: &'static str,
    pub data: Vec<SeriesPoint>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn month_label(record: &MonthlyRecord) -> String {
    format!("Month {}", record.month)
}

fn project_field(
    records: &[MonthlyRecord],
    id: &'static str,
    color: &'static str,
    field: fn(&MonthlyRecord) -> Option<f64>,
) -> NamedSeries {
    let data = records
        .iter()
        .map(|record| SeriesPoint {
            x: month_label(record),
            y: round2(field(record).unwrap_or(0.0)),
        })
        .collect();
    NamedSeries { id, color, data }
}

/// Return on investment per record: profit over cost basis, as a percent.
/// A zero basis, missing fields, or a non-finite quotient drops the point.
fn roi_series(records: &[MonthlyRecord]) -> NamedSeries {
    let data = records
        .iter()
        .filter_map(|record| {
            let profit = record.profit?;
            let portfolio_value = record.portfolio_value?;
            let basis = portfolio_value - profit;
            if basis == 0.0 {
                return None;
            }
            let roi = profit / basis * 100.0;
            if !roi.is_finite() {
                return None;
            }
            Some(SeriesPoint {
                x: month_label(record),
                y: round2(roi),
            })
        })
        .collect();
    NamedSeries {
        id: "Return on Investment",
        color: "#2563EB",
        data,
    }
}

/// Project a monthly series into the dashboard's named chart series,
/// preserving input order. Direct series are gated by their visibility
/// flag; ROI is always included.
pub fn project_series(records: &[MonthlyRecord], visibility: &SeriesVisibility) -> Vec<NamedSeries> {
    let mut series = Vec::with_capacity(4);
    if visibility.portfolio_value {
        series.push(project_field(records, "Portfolio Value", "#8B5CF6", |r| {
            r.portfolio_value
        }));
    }
    if visibility.investment {
        series.push(project_field(records, "Monthly Investment", "#0EA5E9", |r| {
            r.investment
        }));
    }
    if visibility.profit {
        series.push(project_field(records, "Cumulative Profit", "#F97316", |r| {
            r.profit
        }));
    }
    series.push(roi_series(records));
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(month: i64, investment: f64, portfolio_value: f64, profit: f64) -> MonthlyRecord {
        MonthlyRecord {
            month,
            expenses: Some(0.0),
            investment: Some(investment),
            portfolio_value: Some(portfolio_value),
            profit: Some(profit),
        }
    }

    #[test]
    fn all_flags_on_yields_four_series_in_order() {
        let records = vec![make_record(1, 1000.0, 1050.0, 50.0)];
        let series = project_series(&records, &SeriesVisibility::default());
        let ids: Vec<_> = series.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "Portfolio Value",
                "Monthly Investment",
                "Cumulative Profit",
                "Return on Investment"
            ]
        );
    }

    #[test]
    fn roi_is_included_even_with_all_flags_off() {
        let records = vec![make_record(1, 1000.0, 1050.0, 50.0)];
        let visibility = SeriesVisibility {
            portfolio_value: false,
            investment: false,
            profit: false,
        };
        let series = project_series(&records, &visibility);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].id, "Return on Investment");
    }

    #[test]
    fn roi_matches_worked_example() {
        let records = vec![
            make_record(1, 1000.0, 1050.0, 50.0),
            make_record(2, 1000.0, 2150.0, 150.0),
        ];
        let series = project_series(&records, &SeriesVisibility::default());
        let roi = series.iter().find(|s| s.id == "Return on Investment").unwrap();
        assert_eq!(roi.data.len(), 2);
        assert_eq!(roi.data[1].x, "Month 2");
        assert_eq!(roi.data[1].y, 7.5);
    }

    #[test]
    fn roi_point_dropped_when_basis_is_zero() {
        // portfolio_value == profit, so the cost basis is zero
        let records = vec![
            make_record(1, 1000.0, 50.0, 50.0),
            make_record(2, 1000.0, 2150.0, 150.0),
        ];
        let series = project_series(&records, &SeriesVisibility::default());
        let roi = series.iter().find(|s| s.id == "Return on Investment").unwrap();
        assert_eq!(roi.data.len(), 1);
        assert_eq!(roi.data[0].x, "Month 2");
        assert!(roi.data.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn roi_point_dropped_when_fields_missing() {
        let mut record = make_record(1, 1000.0, 1050.0, 50.0);
        record.profit = None;
        let series = project_series(&[record], &SeriesVisibility::default());
        let roi = series.iter().find(|s| s.id == "Return on Investment").unwrap();
        assert!(roi.data.is_empty());
    }

    #[test]
    fn direct_series_round_to_two_decimals() {
        let mut record = make_record(1, 1000.444, 1050.009, 50.0);
        record.profit = None;
        let series = project_series(&[record], &SeriesVisibility::default());
        assert_eq!(series[0].data[0].y, 1050.01);
        assert_eq!(series[1].data[0].y, 1000.44);
        // missing profit projects as zero rather than failing
        assert_eq!(series[2].data[0].y, 0.0);
    }

    #[test]
    fn month_labels_preserve_input_order() {
        let records = vec![
            make_record(3, 1.0, 10.0, 1.0),
            make_record(1, 1.0, 10.0, 1.0),
        ];
        let series = project_series(&records, &SeriesVisibility::default());
        let labels: Vec<_> = series[0].data.iter().map(|p| p.x.clone()).collect();
        assert_eq!(labels, vec!["Month 3", "Month 1"]);
    }
}
