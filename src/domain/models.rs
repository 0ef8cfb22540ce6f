use serde::{Deserialize, Serialize};

/// One month of a client's financial series. Numeric fields are optional
/// because stored rows may be partial; derived metrics treat a missing
/// value as zero instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month: i64,
    #[serde(default)]
    pub expenses: Option<f64>,
    #[serde(default)]
    pub investment: Option<f64>,
    #[serde(default)]
    pub portfolio_value: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentTrack {
    #[serde(rename = "SPY500")]
    Spy500,
    #[serde(rename = "NASDAQ100")]
    Nasdaq100,
    #[serde(rename = "RUSSELL2000")]
    Russell2000,
    #[serde(rename = "VTSAX")]
    Vtsax,
    #[serde(rename = "VTI")]
    Vti,
    #[serde(rename = "SWTSX")]
    Swtsx,
    #[serde(rename = "IWV")]
    Iwv,
    #[serde(rename = "WFIVX")]
    Wfivx,
}

impl InvestmentTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentTrack::Spy500 => "SPY500",
            InvestmentTrack::Nasdaq100 => "NASDAQ100",
            InvestmentTrack::Russell2000 => "RUSSELL2000",
            InvestmentTrack::Vtsax => "VTSAX",
            InvestmentTrack::Vti => "VTI",
            InvestmentTrack::Swtsx => "SWTSX",
            InvestmentTrack::Iwv => "IWV",
            InvestmentTrack::Wfivx => "WFIVX",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SPY500" => Some(InvestmentTrack::Spy500),
            "NASDAQ100" => Some(InvestmentTrack::Nasdaq100),
            "RUSSELL2000" => Some(InvestmentTrack::Russell2000),
            "VTSAX" => Some(InvestmentTrack::Vtsax),
            "VTI" => Some(InvestmentTrack::Vti),
            "SWTSX" => Some(InvestmentTrack::Swtsx),
            "IWV" => Some(InvestmentTrack::Iwv),
            "WFIVX" => Some(InvestmentTrack::Wfivx),
            _ => None,
        }
    }
}

/// An advisory client with its monthly series, ordered by month ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub profession: String,
    #[serde(default)]
    pub custom_profession: Option<String>,
    pub investment_track: InvestmentTrack,
    #[serde(default)]
    pub monthly_expenses: f64,
    #[serde(default)]
    pub investment_percentage: String,
    #[serde(default)]
    pub monthly_data: Vec<MonthlyRecord>,
}

/// Client payload before the store has assigned an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub profession: String,
    #[serde(default)]
    pub custom_profession: Option<String>,
    pub investment_track: InvestmentTrack,
    #[serde(default)]
    pub monthly_expenses: f64,
    #[serde(default)]
    pub investment_percentage: String,
    #[serde(default)]
    pub monthly_data: Vec<MonthlyRecord>,
}

/// Derived per-client metrics, computed on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetrics {
    pub total_investment: f64,
    pub portfolio_value: f64,
    pub total_profit: f64,
    pub latest_monthly_investment: f64,
    pub management_fee: f64,
    pub current_value: f64,
}

impl ClientMetrics {
    pub fn zero() -> Self {
        Self {
            total_investment: 0.0,
            portfolio_value: 0.0,
            total_profit: 0.0,
            latest_monthly_investment: 0.0,
            management_fee: 0.0,
            current_value: 0.0,
        }
    }
}

/// Portfolio-wide totals over all clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub total_value: f64,
    pub total_investment: f64,
    pub total_profit: f64,
    pub total_clients: usize,
}

impl AggregateMetrics {
    pub fn zero() -> Self {
        Self {
            total_value: 0.0,
            total_investment: 0.0,
            total_profit: 0.0,
            total_clients: 0,
        }
    }
}
