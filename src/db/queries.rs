use super::completions::Completions;
use super::tasks::Tasks;
use crate::libs::completion::CompletionMark;
use crate::libs::day::Day;
use crate::libs::error::Result;
use crate::libs::live::{Change, Query};
use crate::libs::task::{Task, TaskId};
use rusqlite::Connection;

/// Every task in list order.
#[derive(Debug, Clone, Copy)]
pub struct AllTasks;

impl Query for AllTasks {
    type Output = Vec<Task>;

    fn run(&self, conn: &Connection) -> Result<Self::Output> {
        Tasks::new(conn).list()
    }

    fn affected_by(&self, change: &Change) -> bool {
        matches!(change, Change::Task(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaskById(pub TaskId);

impl Query for TaskById {
    type Output = Option<Task>;

    fn run(&self, conn: &Connection) -> Result<Self::Output> {
        Tasks::new(conn).get_by_id(self.0)
    }

    fn affected_by(&self, change: &Change) -> bool {
        matches!(change, Change::Task(id) if *id == self.0)
    }
}

/// All marks of one task, for statistics.
#[derive(Debug, Clone, Copy)]
pub struct CompletionsForTask(pub TaskId);

impl Query for CompletionsForTask {
    type Output = Vec<CompletionMark>;

    fn run(&self, conn: &Connection) -> Result<Self::Output> {
        Completions::new(conn).list_by_task(self.0)
    }

    fn affected_by(&self, change: &Change) -> bool {
        matches!(change, Change::Completions(id) if *id == self.0)
    }
}

/// The mark of one task on one day, if the task was done that day.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOn {
    pub date: Day,
    pub task_id: TaskId,
}

impl Query for CompletionOn {
    type Output = Option<CompletionMark>;

    fn run(&self, conn: &Connection) -> Result<Self::Output> {
        Completions::new(conn).get_by_date_and_task(self.date, self.task_id)
    }

    fn affected_by(&self, change: &Change) -> bool {
        matches!(change, Change::Completions(id) if *id == self.task_id)
    }
}

/// Every mark recorded on a day, used to render a whole day's list.
#[derive(Debug, Clone, Copy)]
pub struct CompletionsOnDay(pub Day);

impl Query for CompletionsOnDay {
    type Output = Vec<CompletionMark>;

    fn run(&self, conn: &Connection) -> Result<Self::Output> {
        Completions::new(conn).list_by_date(self.0)
    }

    fn affected_by(&self, change: &Change) -> bool {
        matches!(change, Change::Completions(_))
    }
}
