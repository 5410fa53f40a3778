//! Google Sheets HTTP client.
//!
//! Reads go through the visualization query endpoint, which evaluates a
//! query language statement against one sheet (addressed by gid) and
//! returns CSV. Writes go through the Sheets values API, addressed by sheet
//! name and A1 range.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SheetsConfig;
use crate::infrastructure::logging::scrub;

use super::auth::ServiceAccountAuth;

const SERVICE: &str = "sheets";

/// Authorized client for one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    auth: Arc<ServiceAccountAuth>,
    spreadsheet_id: String,
    query_base: String,
    api_base: String,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> DomainResult<Self> {
        let http = Client::new();
        let auth = ServiceAccountAuth::new(http.clone(), config)?;
        Ok(Self {
            http,
            auth: Arc::new(auth),
            spreadsheet_id: config.spreadsheet_id.clone(),
            query_base: config.query_base.trim_end_matches('/').to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// A handle on one sheet of the spreadsheet.
    pub fn sheet(&self, gid: &str, name: &str) -> Sheet {
        Sheet {
            client: self.clone(),
            gid: gid.to_string(),
            name: name.to_string(),
        }
    }

    async fn send(&self, req: RequestBuilder, op: &str) -> DomainResult<String> {
        let token = self.auth.bearer_token().await?;
        let resp = req.bearer_auth(token).send().await.map_err(|e| {
            DomainError::upstream(SERVICE, scrub(&format!("{op} request failed: {e}")))
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            DomainError::upstream(
                SERVICE,
                scrub(&format!("{op} returned {status} with unreadable body: {e}")),
            )
        })?;
        if !status.is_success() {
            return Err(DomainError::upstream(
                SERVICE,
                scrub(&format!("{op} returned {status}: {body}")),
            ));
        }
        Ok(body)
    }
}

/// One sheet: queried by gid, written by name.
#[derive(Debug, Clone)]
pub struct Sheet {
    client: SheetsClient,
    gid: String,
    name: String,
}

impl Sheet {
    /// Run a query and return its rows, header row excluded.
    pub async fn query(&self, statement: &str) -> DomainResult<Vec<Vec<String>>> {
        tracing::debug!(sheet = %self.name, statement, "sheet query");
        let url = format!(
            "{}/spreadsheets/d/{}/gviz/tq",
            self.client.query_base, self.client.spreadsheet_id
        );
        let req = self.client.http.get(url).query(&[
            ("gid", self.gid.as_str()),
            ("headers", "1"),
            ("tqx", "out:csv"),
            ("tq", statement),
        ]);
        let body = self.client.send(req, "query").await?;
        parse_csv(&body)
    }

    /// Append rows after the last row of `range`; formulas are evaluated.
    pub async fn append(&self, range: &str, values: Vec<Vec<Value>>) -> DomainResult<()> {
        let range = format!("{}!{range}", self.name);
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{range}:append",
            self.client.api_base, self.client.spreadsheet_id
        );
        let req = self
            .client
            .http
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "range": range, "values": values }));
        self.client.send(req, "append").await?;
        Ok(())
    }

    /// Overwrite `range` with raw values.
    pub async fn set_values(&self, range: &str, values: Vec<Vec<Value>>) -> DomainResult<()> {
        let range = format!("{}!{range}", self.name);
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{range}",
            self.client.api_base, self.client.spreadsheet_id
        );
        let req = self
            .client
            .http
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "range": range, "values": values }));
        self.client.send(req, "set_values").await?;
        Ok(())
    }

    /// Overwrite the single cell at `column` and `row`.
    pub async fn set_cell(&self, column: &str, row: u64, value: Value) -> DomainResult<()> {
        self.set_values(&format!("{column}{row}:{column}{row}"), vec![vec![value]])
            .await
    }
}

/// Parse a CSV query result, skipping the header row.
pub fn parse_csv(body: &str) -> DomainResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| DomainError::upstream(SERVICE, format!("malformed CSV result: {e}")))
        })
        .collect()
}

/// Quote a value for use inside a query string literal.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', ""))
}

/// Cell `index` of a result row, empty when the row is short.
pub fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// Parse an integer cell; the query endpoint may render whole numbers as `42.0`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .map(|n| n as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_skips_header() {
        let body = "\"A\",\"B\"\n\"2\",\"42\"\n\"3\",\"\"\n";
        assert_eq!(
            parse_csv(body).unwrap(),
            vec![
                vec!["2".to_string(), "42".to_string()],
                vec!["3".to_string(), String::new()]
            ]
        );
    }

    #[test]
    fn test_parse_csv_header_only_is_empty() {
        assert!(parse_csv("\"A\",\"B\"\n").unwrap().is_empty());
        assert!(parse_csv("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_csv_keeps_quoted_commas_and_newlines() {
        let body = "\"D\"\n\"Текст, с запятой\nи переносом\"\n";
        assert_eq!(
            parse_csv(body).unwrap(),
            vec![vec!["Текст, с запятой\nи переносом".to_string()]]
        );
    }

    #[test]
    fn test_quote_strips_double_quotes() {
        assert_eq!(quote("ivan"), "\"ivan\"");
        assert_eq!(quote("a\" or \"1\"=\"1"), "\"a or 1=1\"");
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int(" 42.0 "), Some(42));
        assert_eq!(parse_int("-1001"), Some(-1001));
        assert_eq!(parse_int("4.5"), None);
        assert_eq!(parse_int(""), None);
    }
}
