use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;

use crate::data_source::{FactsSource, ProviderId, SourceError};
use crate::facts::{
    CompanyProfile, FinancialFacts, IncomeRecord, StatementTable, GROSS_PROFIT, NET_INCOME,
    TOTAL_REVENUE,
};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS};
use crate::{Symbol, UtcDateTime};

const REFERER: &str = "https://finance.yahoo.com/";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URLS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const SUMMARY_MODULES: &str =
    "price,defaultKeyStatistics,financialData,incomeStatementHistory,balanceSheetHistoryQuarterly";
const DEFAULT_LOOKBACK_YEARS: u32 = 10;

/// Timeseries type keys and the statement row each one fills.
const TIMESERIES_ROWS: [(&str, Period, &str); 4] = [
    ("quarterlyTotalRevenue", Period::Quarterly, TOTAL_REVENUE),
    ("quarterlyNetIncome", Period::Quarterly, NET_INCOME),
    ("annualTotalRevenue", Period::Annual, TOTAL_REVENUE),
    ("annualGrossProfit", Period::Annual, GROSS_PROFIT),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Quarterly,
    Annual,
}

// ============================================================================
// Yahoo Auth Manager - cookie/crumb handshake
// ============================================================================

/// Caches the crumb Yahoo requires on every data call.
///
/// The session cookie itself lives in the HTTP client's cookie jar (or in the
/// `YAHOO_COOKIE` override); the crumb is tied to it and expires with it.
#[derive(Debug)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<(String, Instant)>>,
    ttl: Duration,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            crumb: Mutex::new(None),
            ttl: Duration::from_secs(3600),
        }
    }
}

impl YahooAuthManager {
    fn cached(&self) -> Option<String> {
        let guard = self.crumb.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|(_, fetched_at)| fetched_at.elapsed() < self.ttl)
            .map(|(crumb, _)| crumb.clone())
    }

    /// Cached crumb, or a fresh one from Yahoo.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        auth: &HttpAuth,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached() {
            return Ok(crumb);
        }

        let crumb = fetch_crumb(http_client, auth, timeout_ms).await?;
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((crumb.clone(), Instant::now()));
        Ok(crumb)
    }

    /// Drop the cached crumb so the next call performs the handshake again.
    pub fn invalidate(&self) {
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

async fn fetch_crumb(
    http_client: &dyn HttpClient,
    auth: &HttpAuth,
    timeout_ms: u64,
) -> Result<String, SourceError> {
    // fc.yahoo.com answers 404 but sets the session cookie; only transport
    // failures matter here.
    let cookie_request = HttpRequest::get(COOKIE_URL)
        .with_header("referer", REFERER)
        .with_auth(auth)
        .with_timeout_ms(timeout_ms);
    http_client.execute(cookie_request).await.map_err(|e| {
        SourceError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message()))
    })?;

    for endpoint in CRUMB_URLS {
        let crumb_request = HttpRequest::get(endpoint)
            .with_header("referer", REFERER)
            .with_auth(auth)
            .with_timeout_ms(timeout_ms);

        match http_client.execute(crumb_request).await {
            Ok(response) if response.is_success() => {
                let body = response.body.trim();
                if body.contains("<html") || body.contains("<!DOCTYPE") {
                    continue;
                }
                if body.to_ascii_lowercase().contains("too many requests") {
                    return Err(SourceError::rate_limited(
                        "Yahoo rate limited while fetching crumb",
                    ));
                }
                if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                    tracing::debug!(endpoint, "obtained Yahoo crumb");
                    return Ok(body.to_owned());
                }
            }
            Ok(response) => {
                tracing::debug!(endpoint, status = response.status, "crumb endpoint refused");
            }
            Err(error) => {
                tracing::debug!(endpoint, error = %error, "crumb endpoint unreachable");
            }
        }
    }

    Err(SourceError::unavailable(
        "failed to fetch Yahoo crumb from all endpoints",
    ))
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance facts source.
///
/// One run issues two data calls: `quoteSummary` for the profile and the
/// income-statement history, and `fundamentals-timeseries` for the quarterly
/// and annual statement rows.
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    auth_manager: YahooAuthManager,
    timeout_ms: u64,
    lookback_years: u32,
}

impl YahooAdapter {
    /// Adapter over `http_client`, honouring a `YAHOO_COOKIE` override.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        let auth = std::env::var("YAHOO_COOKIE")
            .ok()
            .filter(|cookie| !cookie.trim().is_empty())
            .map(HttpAuth::Cookie)
            .unwrap_or(HttpAuth::None);

        Self {
            http_client,
            auth,
            auth_manager: YahooAuthManager::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            lookback_years: DEFAULT_LOOKBACK_YEARS,
        }
    }

    pub fn with_auth(mut self, auth: HttpAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// How far back the statement timeseries reaches.
    pub fn with_lookback_years(mut self, years: u32) -> Self {
        self.lookback_years = years.max(1);
        self
    }

    async fn send(&self, url: String) -> Result<HttpResponse, SourceError> {
        let request = HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", error.message()))
            }
        })
    }

    /// GET with the crumb appended, refreshing the crumb once on 401/429.
    async fn fetch_with_crumb<F>(&self, symbol: &Symbol, build_url: F) -> Result<String, SourceError>
    where
        F: Fn(&str) -> String + Send + Sync,
    {
        let crumb = self
            .auth_manager
            .crumb(self.http_client.as_ref(), &self.auth, self.timeout_ms)
            .await?;
        let mut response = self.send(build_url(&crumb)).await?;

        if response.status == 401 || response.status == 429 {
            tracing::warn!(status = response.status, "yahoo rejected crumb; refreshing auth");
            self.auth_manager.invalidate();
            let crumb = self
                .auth_manager
                .crumb(self.http_client.as_ref(), &self.auth, self.timeout_ms)
                .await?;
            response = self.send(build_url(&crumb)).await?;
        }

        match response.status {
            200..=299 => Ok(response.body),
            404 => Err(SourceError::not_found(symbol)),
            429 => Err(SourceError::rate_limited("yahoo returned status 429")),
            status => Err(SourceError::unavailable(format!(
                "yahoo returned status {status}"
            ))),
        }
    }

    fn summary_url(symbol: &Symbol, crumb: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            urlencoding::encode(symbol.as_str()),
            SUMMARY_MODULES,
            urlencoding::encode(crumb)
        )
    }

    fn timeseries_url(&self, symbol: &Symbol, crumb: &str) -> String {
        let now = UtcDateTime::now();
        let start = now.days_before(i64::from(self.lookback_years) * 366);
        let types = TIMESERIES_ROWS
            .iter()
            .map(|(key, _, _)| *key)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries/{symbol}?symbol={symbol}&type={types}&period1={}&period2={}&crumb={}",
            start.unix_timestamp(),
            now.unix_timestamp(),
            urlencoding::encode(crumb),
            symbol = urlencoding::encode(symbol.as_str()),
        )
    }
}

impl FactsSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn financial_facts<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<FinancialFacts, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let summary_body = self
                .fetch_with_crumb(symbol, |crumb| Self::summary_url(symbol, crumb))
                .await?;
            let (profile, income_history) = parse_summary(&summary_body, symbol)?;

            let timeseries_body = self
                .fetch_with_crumb(symbol, |crumb| self.timeseries_url(symbol, crumb))
                .await?;
            let (quarterly, annual) = parse_timeseries(&timeseries_body)?;

            tracing::debug!(
                %symbol,
                quarterly_rows = quarterly.labels().count(),
                annual_rows = annual.labels().count(),
                income_records = income_history.len(),
                "parsed yahoo facts"
            );

            Ok(FinancialFacts {
                profile,
                quarterly,
                annual,
                income_history,
            })
        })
    }
}

fn parse_summary(
    body: &str,
    symbol: &Symbol,
) -> Result<(CompanyProfile, Vec<IncomeRecord>), SourceError> {
    let response: YahooQuoteSummaryResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo quote summary: {e}")))?;

    if let Some(error) = response.quote_summary.error {
        return Err(SourceError::unavailable(format!(
            "yahoo quote summary error: {}",
            error.describe()
        )));
    }

    let result = response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::not_found(symbol))?;

    let price = result
        .price
        .as_ref()
        .and_then(|price| raw(&price.regular_market_price))
        .or_else(|| {
            result
                .financial_data
                .as_ref()
                .and_then(|data| raw(&data.current_price))
        });

    let key_statistics = result.default_key_statistics.as_ref();
    let profile = CompanyProfile {
        price,
        book_value_per_share: key_statistics.and_then(|stats| raw(&stats.book_value)),
        trailing_eps: key_statistics.and_then(|stats| raw(&stats.trailing_eps)),
        shares_outstanding: key_statistics.and_then(|stats| raw(&stats.shares_outstanding)),
        // quoteSummary carries a single ROE figure; it lands in return_on_equity.
        trailing_roe: None,
        // Yahoo reports a fraction; profiles carry percentage points.
        return_on_equity: result
            .financial_data
            .as_ref()
            .and_then(|data| raw(&data.return_on_equity))
            .map(|fraction| fraction * 100.0),
        total_stockholder_equity: result
            .balance_sheet_history_quarterly
            .as_ref()
            .and_then(|history| history.balance_sheet_statements.first())
            .and_then(|statement| raw(&statement.total_stockholder_equity)),
    };

    let income_history = result
        .income_statement_history
        .map(|history| history.income_statement_history)
        .unwrap_or_default()
        .into_iter()
        .map(|statement| IncomeRecord {
            net_income: raw(&statement.net_income),
        })
        .collect();

    Ok((profile, income_history))
}

fn parse_timeseries(body: &str) -> Result<(StatementTable, StatementTable), SourceError> {
    let response: YahooTimeseriesResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo timeseries: {e}")))?;

    if let Some(error) = response.timeseries.error {
        return Err(SourceError::unavailable(format!(
            "yahoo timeseries error: {}",
            error.describe()
        )));
    }

    let mut quarterly = StatementTable::new();
    let mut annual = StatementTable::new();

    for result in response.timeseries.result.unwrap_or_default() {
        for key in &result.meta.types {
            let Some((_, period, label)) = TIMESERIES_ROWS.iter().find(|(name, _, _)| name == key)
            else {
                continue;
            };
            let Some(points) = result.series.get(key.as_str()) else {
                continue;
            };

            let points: Vec<Option<YahooTimeseriesPoint>> = serde_json::from_value(points.clone())
                .map_err(|e| {
                    SourceError::internal(format!("failed to parse yahoo timeseries '{key}': {e}"))
                })?;

            let mut dated = points
                .into_iter()
                .flatten()
                .filter_map(|point| {
                    let value = point
                        .reported_value
                        .as_ref()
                        .and_then(YahooRawValue::to_option)?;
                    Some((point.as_of_date, value))
                })
                .collect::<Vec<_>>();
            // Most recent period first; ISO dates sort lexicographically.
            dated.sort_by(|left, right| right.0.cmp(&left.0));
            let values = dated.into_iter().map(|(_, value)| value).collect();

            match period {
                Period::Quarterly => quarterly.insert_row(*label, values),
                Period::Annual => annual.insert_row(*label, values),
            }
        }
    }

    Ok((quarterly, annual))
}

fn raw(value: &Option<YahooRawValue>) -> Option<f64> {
    value.as_ref().and_then(YahooRawValue::to_option)
}

// ============================================================================
// Yahoo API Response Structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(code), None) => code.clone(),
            (None, Some(description)) => description.clone(),
            (None, None) => String::from("unknown error"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResult {
    #[serde(default)]
    price: Option<YahooPriceData>,
    #[serde(rename = "defaultKeyStatistics", default)]
    default_key_statistics: Option<YahooKeyStatistics>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<YahooFinancialData>,
    #[serde(rename = "incomeStatementHistory", default)]
    income_statement_history: Option<YahooIncomeStatementHistory>,
    #[serde(rename = "balanceSheetHistoryQuarterly", default)]
    balance_sheet_history_quarterly: Option<YahooBalanceSheetHistory>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooPriceData {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooKeyStatistics {
    #[serde(rename = "bookValue", default)]
    book_value: Option<YahooRawValue>,
    #[serde(rename = "trailingEps", default)]
    trailing_eps: Option<YahooRawValue>,
    #[serde(rename = "sharesOutstanding", default)]
    shares_outstanding: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooFinancialData {
    #[serde(rename = "currentPrice", default)]
    current_price: Option<YahooRawValue>,
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooIncomeStatementHistory {
    #[serde(rename = "incomeStatementHistory", default)]
    income_statement_history: Vec<YahooIncomeStatement>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooIncomeStatement {
    #[serde(rename = "netIncome", default)]
    net_income: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooBalanceSheetHistory {
    #[serde(rename = "balanceSheetStatements", default)]
    balance_sheet_statements: Vec<YahooBalanceSheetStatement>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooBalanceSheetStatement {
    #[serde(rename = "totalStockholderEquity", default)]
    total_stockholder_equity: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooTimeseriesResponse {
    timeseries: YahooTimeseriesData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooTimeseriesData {
    #[serde(default)]
    result: Option<Vec<YahooTimeseriesResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

/// One requested type; its points sit under a key named after the type.
#[derive(Debug, Clone, Deserialize)]
struct YahooTimeseriesResult {
    meta: YahooTimeseriesMeta,
    #[serde(flatten)]
    series: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooTimeseriesMeta {
    #[serde(rename = "type", default)]
    types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooTimeseriesPoint {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "reportedValue", default)]
    reported_value: Option<YahooRawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; missing values come
/// back as `{}`.
#[derive(Debug, Clone, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl YahooRawValue {
    fn to_option(&self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }
}
