//! SEC EDGAR API client for fetching company filings and financial facts
//!
//! SEC EDGAR is the Electronic Data Gathering, Analysis, and Retrieval
//! system used by the U.S. Securities and Exchange Commission.
//!
//! Rate limit: 10 requests per second (as per SEC fair access policy)
//! User-Agent requirement: Must include company name and contact email

use crate::error::{MarketError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEC_BASE_URL: &str = "https://data.sec.gov";
const SEC_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";
const SEC_COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// SEC filing metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecFiling {
    /// Accession number (unique filing identifier)
    pub accession_number: String,
    /// Filing type (10-K, 10-Q, 8-K, etc.)
    pub form_type: String,
    /// Filing date
    pub filing_date: String,
    /// Primary document filename
    pub primary_document: String,
}

/// SEC submissions response
#[derive(Debug, Clone, Deserialize)]
pub struct CompanySubmissions {
    pub cik: String,
    pub name: String,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

/// Key figures of the most recent annual report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnualFigures {
    /// Total revenue, USD
    pub revenue: Option<f64>,
    /// Net income, USD
    pub net_income: Option<f64>,
    /// Fiscal period end date
    pub period_ending: Option<String>,
}

/// SEC EDGAR API client
pub struct SecEdgarClient {
    client: Client,
    user_agent: String,
    rate_limiter: SharedRateLimiter,
}

impl SecEdgarClient {
    /// Create a new SEC EDGAR client
    ///
    /// # Arguments
    /// * `user_agent` - Identifier with contact email (required by SEC)
    /// * `timeout` - Per-request timeout
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Result<Self> {
        // SEC allows 10 requests per second
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
            rate_limiter,
        })
    }

    /// Resolve a stock ticker to its CIK number
    pub async fn get_cik(&self, ticker: &str) -> Result<String> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(SEC_COMPANY_TICKERS_URL)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| MarketError::Api(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse SEC response: {e}")))?;

        lookup_cik(&data, ticker).ok_or_else(|| MarketError::InvalidSymbol(ticker.to_string()))
    }

    /// Get company submissions (filing history)
    pub async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        self.rate_limiter.until_ready().await;

        let cik_padded = pad_cik(cik);
        let url = format!("{SEC_BASE_URL}/submissions/CIK{cik_padded}.json");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| MarketError::Api(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        let submissions: CompanySubmissions = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse SEC response: {e}")))?;

        Ok(submissions)
    }

    /// Latest filing of the given form type, if any
    pub async fn latest_filing(&self, cik: &str, form_type: &str) -> Result<Option<SecFiling>> {
        let submissions = self.get_company_submissions(cik).await?;
        Ok(latest_filing_of(&submissions.filings.recent, form_type))
    }

    /// Fetch the raw HTML of a filing's primary document
    pub async fn fetch_filing_document(
        &self,
        cik: &str,
        accession_number: &str,
        document: &str,
    ) -> Result<String> {
        self.rate_limiter.until_ready().await;

        let cik_trimmed = cik.trim_start_matches('0');
        let accession = accession_number.replace('-', "");
        let url = format!("{SEC_ARCHIVES_URL}/{cik_trimmed}/{accession}/{document}");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| MarketError::Api(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to read SEC document: {e}")))
    }

    /// Get company facts (XBRL financial data) as raw JSON
    pub async fn get_company_facts(&self, cik: &str) -> Result<serde_json::Value> {
        self.rate_limiter.until_ready().await;

        let cik_padded = pad_cik(cik);
        let url = format!("{SEC_BASE_URL}/api/xbrl/companyfacts/CIK{cik_padded}.json");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| MarketError::Api(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse SEC response: {e}")))
    }
}

/// Pad a CIK to the 10 digits EDGAR URLs expect
fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik.trim_start_matches('0'))
}

/// Find a ticker in the company_tickers.json payload
///
/// `cik_str` arrives as a number in the live feed; be liberal and accept a
/// string too.
fn lookup_cik(data: &serde_json::Value, ticker: &str) -> Option<String> {
    let ticker_upper = ticker.to_uppercase();
    let companies = data.as_object()?;

    for company in companies.values() {
        let Some(company_ticker) = company.get("ticker").and_then(|t| t.as_str()) else {
            continue;
        };
        if company_ticker.to_uppercase() == ticker_upper {
            let cik = company.get("cik_str")?;
            return match cik {
                serde_json::Value::Number(n) => n.as_u64().map(|v| v.to_string()),
                serde_json::Value::String(s) => Some(s.clone()),
                _ => None,
            };
        }
    }

    None
}

/// Walk the recent filings arrays for the newest entry of a form type
fn latest_filing_of(recent: &RecentFilings, form_type: &str) -> Option<SecFiling> {
    for (i, form) in recent.form.iter().enumerate() {
        if form == form_type {
            return Some(SecFiling {
                accession_number: recent.accession_number.get(i)?.clone(),
                form_type: form.clone(),
                filing_date: recent.filing_date.get(i)?.clone(),
                primary_document: recent.primary_document.get(i)?.clone(),
            });
        }
    }
    None
}

/// Extract the most recent annual revenue and net income from XBRL facts
///
/// Looks at 10-K entries under the common us-gaap revenue/income concepts
/// and picks the value with the latest period end.
pub fn latest_annual_figures(facts: &serde_json::Value) -> AnnualFigures {
    let us_gaap = facts.pointer("/facts/us-gaap");

    let Some(us_gaap) = us_gaap else {
        return AnnualFigures::default();
    };

    let revenue = latest_annual_value(
        us_gaap,
        &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "SalesRevenueNet",
        ],
    );
    let net_income = latest_annual_value(us_gaap, &["NetIncomeLoss"]);

    let period_ending = revenue
        .as_ref()
        .map(|(_, end)| end.clone())
        .or_else(|| net_income.as_ref().map(|(_, end)| end.clone()));

    AnnualFigures {
        revenue: revenue.map(|(v, _)| v),
        net_income: net_income.map(|(v, _)| v),
        period_ending,
    }
}

/// Latest (value, period end) among annual USD entries of the given concepts
fn latest_annual_value(us_gaap: &serde_json::Value, concepts: &[&str]) -> Option<(f64, String)> {
    let mut best: Option<(f64, String)> = None;

    for concept in concepts {
        let Some(entries) = us_gaap
            .pointer(&format!("/{concept}/units/USD"))
            .and_then(|u| u.as_array())
        else {
            continue;
        };

        for entry in entries {
            let form = entry.get("form").and_then(|f| f.as_str()).unwrap_or("");
            if form != "10-K" {
                continue;
            }
            // Annual entries carry fp == "FY"
            let fp = entry.get("fp").and_then(|f| f.as_str()).unwrap_or("");
            if fp != "FY" {
                continue;
            }
            let (Some(val), Some(end)) = (
                entry.get("val").and_then(|v| v.as_f64()),
                entry.get("end").and_then(|e| e.as_str()),
            ) else {
                continue;
            };

            match &best {
                Some((_, current_end)) if current_end.as_str() >= end => {}
                _ => best = Some((val, end.to_string())),
            }
        }
    }

    best
}
