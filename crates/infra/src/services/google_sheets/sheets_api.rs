use super::{column_letter, fit_row, ITableStore};
use crate::services::rest::RestApi;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

// https://developers.google.com/sheets/api/reference/rest/v4/spreadsheets.values
const GOOGLE_API_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
/// Values are stored exactly as given, never parsed as formulas, numbers or
/// dates
const VALUE_INPUT_OPTION: &str = "RAW";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<&'a str>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ClearValuesRequest {}

pub struct GoogleSheetsTableStore {
    api: RestApi,
    spreadsheet_id: String,
}

impl GoogleSheetsTableStore {
    pub fn new(spreadsheet_id: String, access_token: String) -> Self {
        Self {
            api: RestApi::new("Google Sheets", GOOGLE_API_BASE_URL, access_token),
            spreadsheet_id,
        }
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait::async_trait]
impl ITableStore for GoogleSheetsTableStore {
    async fn clear_and_write_rows(
        &self,
        sheet: &str,
        header: &[&str],
        rows: &[Vec<String>],
    ) -> anyhow::Result<()> {
        let range = format!("{}!A1", sheet);
        let mut values = vec![header.to_vec()];
        values.extend(rows.iter().map(|row| row.iter().map(String::as_str).collect()));
        let body = ValueRange {
            range: &range,
            major_dimension: "ROWS",
            values,
        };
        let _: Value = self
            .api
            .put(
                &body,
                &[self.spreadsheet_id.as_str(), "values", range.as_str()],
                &[("valueInputOption", VALUE_INPUT_OPTION.to_string())],
            )
            .await
            .map_err(|e| {
                error!(
                    "Failed to write {} rows to sheet: {}. Error message: {:?}",
                    rows.len(),
                    sheet,
                    e
                );
                e
            })?;

        // Everything below the rows just written is left over from a
        // previous, longer, table
        let last_column = column_letter(header.len().max(1) - 1);
        let stale = format!("{}!A{}:{}", sheet, rows.len() + 2, last_column);
        let _: Value = self
            .api
            .post(
                &ClearValuesRequest {},
                &[self.spreadsheet_id.as_str(), "values", format!("{}:clear", stale).as_str()],
            )
            .await
            .map_err(|e| {
                error!("Failed to clear stale range: {}. Error message: {:?}", stale, e);
                e
            })?;
        Ok(())
    }

    async fn read_rows(
        &self,
        sheet: &str,
        column_count: usize,
    ) -> anyhow::Result<Vec<Vec<String>>> {
        let range = format!("{}!A2:{}", sheet, column_letter(column_count.max(1) - 1));
        let res: ValueRangeResponse = self
            .api
            .get(&[self.spreadsheet_id.as_str(), "values", range.as_str()], &[])
            .await
            .map_err(|e| {
                error!("Failed to read sheet: {}. Error message: {:?}", sheet, e);
                e
            })?;
        Ok(res
            .values
            .into_iter()
            .map(|row| fit_row(row.into_iter().map(cell_to_string).collect(), column_count))
            .collect())
    }
}
