use super::{fit_row, ITableStore};
use anyhow::anyhow;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Table store keeping the sheets in memory, used when testing
#[derive(Default)]
pub struct InMemoryTableStore {
    sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
    failing_writes: Mutex<HashSet<String>>,
    failing_reads: Mutex<HashSet<String>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows below the header of `sheet`
    pub fn set_rows(&self, sheet: &str, rows: Vec<Vec<String>>) {
        self.sheets.lock().unwrap().insert(sheet.to_string(), rows);
    }

    /// Rows below the header of `sheet` exactly as stored
    pub fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        let sheets = self.sheets.lock().unwrap();
        sheets.get(sheet).cloned().unwrap_or_default()
    }

    /// Every following write to `sheet` fails
    pub fn fail_writes(&self, sheet: &str) {
        self.failing_writes.lock().unwrap().insert(sheet.to_string());
    }

    /// Every following read of `sheet` fails
    pub fn fail_reads(&self, sheet: &str) {
        self.failing_reads.lock().unwrap().insert(sheet.to_string());
    }

    /// Clears the injected failures of `sheet`
    pub fn recover(&self, sheet: &str) {
        self.failing_writes.lock().unwrap().remove(sheet);
        self.failing_reads.lock().unwrap().remove(sheet);
    }
}

#[async_trait::async_trait]
impl ITableStore for InMemoryTableStore {
    async fn clear_and_write_rows(
        &self,
        sheet: &str,
        _header: &[&str],
        rows: &[Vec<String>],
    ) -> anyhow::Result<()> {
        if self.failing_writes.lock().unwrap().contains(sheet) {
            return Err(anyhow!("Sheet: {} is read only", sheet));
        }
        self.set_rows(sheet, rows.to_vec());
        Ok(())
    }

    async fn read_rows(
        &self,
        sheet: &str,
        column_count: usize,
    ) -> anyhow::Result<Vec<Vec<String>>> {
        if self.failing_reads.lock().unwrap().contains(sheet) {
            return Err(anyhow!("Sheet: {} was not found", sheet));
        }
        Ok(self
            .rows(sheet)
            .into_iter()
            .map(|row| fit_row(row, column_count))
            .collect())
    }
}
