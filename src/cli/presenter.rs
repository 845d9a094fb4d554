//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::ledger::{ExpenseRecord, LedgerSummary};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Format one ledger record as a list row
    pub fn format_record(&self, record: &ExpenseRecord) -> String {
        format!(
            "ID:{} | {} | {} | {} | {} | {}",
            record.id,
            record.date_time,
            record.item_name,
            record.amount,
            record.currency,
            record.category
        )
    }

    /// Print one ledger record
    pub fn record(&self, record: &ExpenseRecord) {
        self.output(&self.format_record(record));
    }

    /// Print the aggregation summary
    pub fn summary(&self, summary: &LedgerSummary) {
        self.output(&format!("Total: {}", summary.grand_total));
        for category in &summary.categories {
            let name = if category.category.is_empty() {
                "(uncategorized)"
            } else {
                category.category.as_str()
            };
            self.output(&format!(
                "  {}: {} ({:.2}%)",
                name, category.total, category.percent
            ));
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::CategoryTotal;

    #[test]
    fn format_record_matches_list_row_shape() {
        let presenter = Presenter::new();
        let record = ExpenseRecord {
            id: 3,
            date_time: "2024-01-01 12:00:00".to_string(),
            item_name: "lunch".to_string(),
            amount: 1200.0,
            currency: "JPY".to_string(),
            category: "food".to_string(),
        };

        let row = presenter.format_record(&record);
        assert_eq!(row, "ID:3 | 2024-01-01 12:00:00 | lunch | 1200 | JPY | food");
    }

    #[test]
    fn format_record_with_empty_fields() {
        let presenter = Presenter::new();
        let record = ExpenseRecord {
            id: 1,
            date_time: String::new(),
            item_name: String::new(),
            amount: 0.0,
            currency: String::new(),
            category: String::new(),
        };

        let row = presenter.format_record(&record);
        assert_eq!(row, "ID:1 |  |  | 0 |  | ");
    }

    #[test]
    fn summary_does_not_panic_on_empty() {
        let presenter = Presenter::new();
        presenter.summary(&LedgerSummary::default());
        presenter.summary(&LedgerSummary {
            grand_total: 100.0,
            categories: vec![CategoryTotal {
                category: String::new(),
                total: 100.0,
                percent: 100.0,
            }],
        });
    }
}
