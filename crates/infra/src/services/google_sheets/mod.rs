mod inmemory;
mod sheets_api;

pub use inmemory::InMemoryTableStore;
pub use sheets_api::GoogleSheetsTableStore;

/// Row oriented storage of the named tables (sheets) of a spreadsheet
#[async_trait::async_trait]
pub trait ITableStore: Send + Sync {
    /// Replaces the content of `sheet` with the `header` row followed by `rows`
    async fn clear_and_write_rows(
        &self,
        sheet: &str,
        header: &[&str],
        rows: &[Vec<String>],
    ) -> anyhow::Result<()>;

    /// All rows of `sheet` except the header, each padded with empty cells
    /// or truncated to `column_count`
    async fn read_rows(&self, sheet: &str, column_count: usize)
        -> anyhow::Result<Vec<Vec<String>>>;
}

/// Spreadsheet column name of the zero based `index`, e.g. `A`, `L` or `AB`
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

pub(crate) fn fit_row(mut row: Vec<String>, column_count: usize) -> Vec<String> {
    row.resize(column_count, String::new());
    row
}
