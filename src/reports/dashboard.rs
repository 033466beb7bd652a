//! Dashboard Report
//!
//! Summarises costs, task progress and billing state across the ledger.

use crate::error::BackofficeResult;
use crate::models::{Money, PaymentStatus, Task, TaskStatus};
use crate::services::consolidate_unbilled;
use crate::storage::Storage;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One row of the recent-task list
#[derive(Debug, Clone)]
pub struct RecentTask {
    pub task: Task,
    pub overdue: bool,
}

/// Dashboard Report
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Reference date for overdue checks
    pub today: NaiveDate,
    /// Labor + materials marked Paid
    pub paid_total: Money,
    /// Labor + materials still Unpaid
    pub unpaid_total: Money,
    pub labor_total: Money,
    pub materials_total: Money,
    /// Task counts in status order, zero counts omitted
    pub task_status_counts: Vec<(TaskStatus, usize)>,
    /// Labor + materials totals by `YYYY-MM`, oldest first
    pub monthly_totals: Vec<(String, Money)>,
    /// Latest tasks by date
    pub recent_tasks: Vec<RecentTask>,
    pub labor_count: usize,
    pub material_count: usize,
    pub unbilled_count: usize,
    pub invoice_count: usize,
}

impl DashboardReport {
    /// Generate the dashboard as of `today`
    pub fn generate(storage: &Storage, today: NaiveDate, recent_count: usize) -> BackofficeResult<Self> {
        let labor = storage.labor.get_all()?;
        let materials = storage.materials.get_all()?;
        let tasks = storage.tasks.get_all()?;
        let invoice_count = storage.invoices.count()?;

        let costs = labor
            .iter()
            .map(|l| (l.date, l.total, l.status))
            .chain(materials.iter().map(|m| (m.date, m.total, m.status)));

        let mut paid_total = Money::zero();
        let mut unpaid_total = Money::zero();
        let mut months: BTreeMap<String, Money> = BTreeMap::new();
        for (date, total, status) in costs {
            match status {
                PaymentStatus::Paid => paid_total += total,
                PaymentStatus::Unpaid => unpaid_total += total,
            }
            *months.entry(date.format("%Y-%m").to_string()).or_default() += total;
        }

        let task_status_counts = TaskStatus::ALL
            .iter()
            .map(|status| (*status, tasks.iter().filter(|t| t.status == *status).count()))
            .filter(|(_, count)| *count > 0)
            .collect();

        let mut recent = tasks;
        // Stable, so equal dates keep insertion order
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        let recent_tasks = recent
            .into_iter()
            .take(recent_count)
            .map(|task| RecentTask {
                overdue: task.is_overdue(today),
                task,
            })
            .collect();

        Ok(Self {
            today,
            paid_total,
            unpaid_total,
            labor_total: labor.iter().map(|l| l.total).sum(),
            materials_total: materials.iter().map(|m| m.total).sum(),
            task_status_counts,
            monthly_totals: months.into_iter().collect(),
            recent_tasks,
            labor_count: labor.len(),
            material_count: materials.len(),
            unbilled_count: consolidate_unbilled(&labor, &materials).len(),
            invoice_count,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency_symbol);
        let mut output = String::new();

        output.push_str(&format!("Dashboard as of {}\n", self.today));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str("\nCost Breakdown by Status\n");
        output.push_str(&format!("  {:<20} {:>14}\n", "Paid", money(self.paid_total)));
        output.push_str(&format!("  {:<20} {:>14}\n", "Unpaid", money(self.unpaid_total)));

        output.push_str("\nLabor vs. Materials\n");
        output.push_str(&format!("  {:<20} {:>14}\n", "Labor", money(self.labor_total)));
        output.push_str(&format!("  {:<20} {:>14}\n", "Materials", money(self.materials_total)));

        output.push_str("\nTask Status\n");
        if self.task_status_counts.is_empty() {
            output.push_str("  No tasks.\n");
        }
        for (status, count) in &self.task_status_counts {
            output.push_str(&format!("  {:<20} {:>14}\n", status.label(), count));
        }

        output.push_str("\nMonthly Costs\n");
        if self.monthly_totals.is_empty() {
            output.push_str("  No costs recorded.\n");
        }
        for (month, total) in &self.monthly_totals {
            output.push_str(&format!("  {:<20} {:>14}\n", month, money(*total)));
        }

        output.push_str("\nRecent Tasks\n");
        if self.recent_tasks.is_empty() {
            output.push_str("  No tasks.\n");
        }
        for recent in &self.recent_tasks {
            let due = recent
                .task
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into());
            output.push_str(&format!(
                "  {:<28} {:<12} {:<12} due {}{}\n",
                recent.task.title,
                recent.task.date,
                recent.task.status.label(),
                due,
                if recent.overdue { "  OVERDUE" } else { "" }
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Labor: {}  Materials: {}  Unbilled items: {}  Invoices: {}\n",
            self.labor_count, self.material_count, self.unbilled_count, self.invoice_count
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BackofficePaths;
    use crate::models::{LaborItem, MaterialItem};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_totals_and_months() {
        let (_temp_dir, storage) = create_test_storage();

        let mut paid = LaborItem::new("Leo", date(2, 3), 2.0, Money::from_cents(1000));
        paid.set_status(PaymentStatus::Paid);
        storage
            .labor
            .append(vec![
                paid,
                LaborItem::new("Leo", date(1, 10), 1.0, Money::from_cents(1000)),
                LaborItem::new("Mia", date(1, 11), 1.0, Money::from_cents(500)),
            ])
            .unwrap();
        storage
            .materials
            .upsert(MaterialItem::new("Cement", date(2, 20), 3.0, Money::from_cents(100)))
            .unwrap();

        let report = DashboardReport::generate(&storage, date(3, 1), 5).unwrap();

        assert_eq!(report.paid_total, Money::from_cents(2000));
        assert_eq!(report.unpaid_total, Money::from_cents(1800));
        assert_eq!(report.labor_total, Money::from_cents(3500));
        assert_eq!(report.materials_total, Money::from_cents(300));
        assert_eq!(
            report.monthly_totals,
            vec![
                ("2024-01".to_string(), Money::from_cents(1500)),
                ("2024-02".to_string(), Money::from_cents(2300)),
            ]
        );
        // Leo and Mia consolidate separately, plus the material
        assert_eq!(report.unbilled_count, 3);
        assert_eq!(report.labor_count, 3);
        assert_eq!(report.invoice_count, 0);
    }

    #[test]
    fn test_task_counts_and_recent_tasks() {
        let (_temp_dir, storage) = create_test_storage();

        let mut late = Task::new("Late", date(1, 5));
        late.due_date = Some(date(1, 20));
        let mut done = Task::new("Done", date(1, 6));
        done.due_date = Some(date(1, 10));
        done.set_status(TaskStatus::Completed);
        let newest = Task::new("Newest", date(2, 1));
        let oldest = Task::new("Oldest", date(1, 1));
        storage.tasks.append(vec![late, done, newest, oldest]).unwrap();

        let report = DashboardReport::generate(&storage, date(2, 15), 3).unwrap();

        assert_eq!(
            report.task_status_counts,
            vec![(TaskStatus::InProgress, 3), (TaskStatus::Completed, 1)]
        );

        let titles: Vec<_> = report.recent_tasks.iter().map(|r| r.task.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Done", "Late"]);
        assert!(!report.recent_tasks[1].overdue);
        assert!(report.recent_tasks[2].overdue);
    }

    #[test]
    fn test_empty_dashboard_formats() {
        let (_temp_dir, storage) = create_test_storage();
        let report = DashboardReport::generate(&storage, date(1, 1), 5).unwrap();

        assert!(report.task_status_counts.is_empty());
        let text = report.format_terminal("$");
        assert!(text.contains("No tasks."));
        assert!(text.contains("Unbilled items: 0"));
    }

    #[test]
    fn test_oversized_totals_do_not_overflow() {
        let (_temp_dir, storage) = create_test_storage();
        let huge = LaborItem::new("Leo", date(1, 10), 1e300, Money::from_cents(100));
        storage.labor.append(vec![huge.clone(), huge]).unwrap();

        let report = DashboardReport::generate(&storage, date(3, 1), 5).unwrap();
        assert_eq!(report.unpaid_total.cents(), i64::MAX);
        assert_eq!(report.labor_total.cents(), i64::MAX);
        assert_eq!(report.monthly_totals[0].1.cents(), i64::MAX);
    }
}
