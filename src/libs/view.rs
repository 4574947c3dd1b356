use super::stats::CompletionStats;
use super::task::Task;
use anyhow::Result;
use prettytable::{row, Table};

/// One line of the day list: the task plus what the day and history say about it.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub task: Task,
    pub done: bool,
    pub total: usize,
}

pub struct View {}

impl View {
    pub fn tasks(rows: &[TaskRow]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "ORDER", "TITLE", "DESCRIPTION", "DONE", "TOTAL"]);
        for row in rows {
            table.add_row(row![
                row.task.id.short(),
                row.task.order,
                row.task.display_title(),
                row.task.description,
                if row.done { "✔" } else { "" },
                row.total
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn stats(stats: &CompletionStats) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TOTAL", "THIS YEAR", "THIS MONTH"]);
        table.add_row(row![stats.total, stats.this_year, stats.this_month]);
        table.printstd();

        Ok(())
    }
}
