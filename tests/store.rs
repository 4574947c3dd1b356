#[cfg(test)]
mod tests {
    use doneday::db::store::Store;
    use doneday::libs::completion::Toggle;
    use doneday::libs::day::Day;
    use doneday::libs::error::{Error, RecordKind};
    use doneday::libs::task::TaskId;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StoreTestContext {
        _temp_dir: TempDir,
        store: Store,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = Store::open(temp_dir.path().join("doneday.db")).unwrap();
            StoreTestContext { _temp_dir: temp_dir, store }
        }
    }

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd(y, m, d).unwrap()
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_create_task_defaults(ctx: &mut StoreTestContext) {
        let task = ctx.store.create_task("Buy milk", "").unwrap();

        assert_eq!(task.order, 0);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");

        let stored = ctx.store.get_task(task.id).unwrap().unwrap();
        assert_eq!(stored, task);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_empty_title_is_accepted(ctx: &mut StoreTestContext) {
        let task = ctx.store.create_task("", "").unwrap();

        assert_eq!(task.title, "");
        assert_eq!(task.display_title(), "Untitled");
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_list_sorted_by_order_then_insertion(ctx: &mut StoreTestContext) {
        let first = ctx.store.create_task("first", "").unwrap();
        let second = ctx.store.create_task("second", "").unwrap();
        let third = ctx.store.create_task("third", "").unwrap();

        ctx.store.set_task_order(first.id, 5).unwrap();
        ctx.store.set_task_order(third.id, -1).unwrap();

        let titles: Vec<String> = ctx.store.list_tasks().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);

        // Equal keys keep insertion order
        ctx.store.set_task_order(second.id, 5).unwrap();
        let titles: Vec<String> = ctx.store.list_tasks().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_update_task(ctx: &mut StoreTestContext) {
        let task = ctx.store.create_task("Original", "old").unwrap();

        let updated = ctx.store.update_task(task.id, "Updated", "new").unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.description, "new");

        let stored = ctx.store.get_task(task.id).unwrap().unwrap();
        assert_eq!(stored.title, "Updated");
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_missing_task_is_not_found(ctx: &mut StoreTestContext) {
        let missing = TaskId::new();

        let err = ctx.store.update_task(missing, "x", "y").unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: RecordKind::Task, .. }));

        assert!(ctx.store.set_task_order(missing, 3).unwrap_err().is_not_found());
        assert!(ctx.store.toggle_completion(Day::today(), missing).unwrap_err().is_not_found());
        assert!(ctx.store.delete_task_cascade(missing).unwrap_err().is_not_found());
        assert!(ctx.store.get_task(missing).unwrap().is_none());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_toggle_twice_restores_state(ctx: &mut StoreTestContext) {
        let task = ctx.store.create_task("Buy milk", "").unwrap();
        let today = Day::today();

        let on = ctx.store.toggle_completion(today, task.id).unwrap();
        assert!(on.is_done());
        assert!(ctx.store.completion_on(today, task.id).unwrap().is_some());

        let off = ctx.store.toggle_completion(today, task.id).unwrap();
        assert!(matches!(off, Toggle::Unmarked(_)));
        assert_eq!(off.mark().id, on.mark().id);
        assert!(ctx.store.completion_on(today, task.id).unwrap().is_none());

        assert!(ctx.store.toggle_completion(today, task.id).unwrap().is_done());
        assert_eq!(ctx.store.list_completions(task.id).unwrap().len(), 1);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_toggle_is_per_day(ctx: &mut StoreTestContext) {
        let task = ctx.store.create_task("Run", "").unwrap();

        ctx.store.toggle_completion(day(2024, 1, 5), task.id).unwrap();
        ctx.store.toggle_completion(day(2024, 1, 6), task.id).unwrap();

        assert_eq!(ctx.store.list_completions(task.id).unwrap().len(), 2);
        assert!(ctx.store.completion_on(day(2024, 1, 7), task.id).unwrap().is_none());
        assert_eq!(ctx.store.completions_on_day(day(2024, 1, 5)).unwrap().len(), 1);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_concurrent_toggles_keep_one_mark(ctx: &mut StoreTestContext) {
        let task = ctx.store.create_task("Contended", "").unwrap();
        let today = Day::today();
        let threads = 9;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let store = ctx.store.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    store.toggle_completion(today, task.id).unwrap()
                })
            })
            .collect();

        let marked = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Toggle::is_done)
            .count();

        // Serialized toggles alternate: 5 on, 4 off, ending on
        assert_eq!(marked, 5);
        assert_eq!(ctx.store.list_completions(task.id).unwrap().len(), 1);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_cascade_delete_removes_marks(ctx: &mut StoreTestContext) {
        let doomed = ctx.store.create_task("Doomed", "").unwrap();
        let kept = ctx.store.create_task("Kept", "").unwrap();
        for d in [5, 6, 7] {
            ctx.store.toggle_completion(day(2024, 1, d), doomed.id).unwrap();
        }
        ctx.store.toggle_completion(day(2024, 1, 5), kept.id).unwrap();

        let report = ctx.store.delete_task_cascade(doomed.id).unwrap();
        assert_eq!(report.task_id, doomed.id);
        assert_eq!(report.marks_removed, 3);

        assert!(ctx.store.get_task(doomed.id).unwrap().is_none());
        assert!(ctx.store.list_completions(doomed.id).unwrap().is_empty());

        assert!(ctx.store.get_task(kept.id).unwrap().is_some());
        assert_eq!(ctx.store.list_completions(kept.id).unwrap().len(), 1);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_failed_cascade_rolls_back(ctx: &mut StoreTestContext) {
        use doneday::db::queries::{AllTasks, CompletionsForTask};

        let task = ctx.store.create_task("Guarded", "").unwrap();
        for d in [5, 6] {
            ctx.store.toggle_completion(day(2024, 1, d), task.id).unwrap();
        }
        ctx.store
            .read(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER block_task_delete BEFORE DELETE ON tasks
                     BEGIN SELECT RAISE(ABORT, 'task delete blocked'); END;",
                )?;
                Ok(())
            })
            .unwrap();

        let tasks = ctx.store.subscribe(AllTasks).unwrap();
        let marks = ctx.store.subscribe(CompletionsForTask(task.id)).unwrap();

        // Marks go first, so the abort on the task row lands mid-cascade
        let err = ctx.store.delete_task_cascade(task.id).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        assert!(ctx.store.get_task(task.id).unwrap().is_some());
        assert_eq!(ctx.store.list_completions(task.id).unwrap().len(), 2);
        assert!(!tasks.has_changed());
        assert!(!marks.has_changed());
        assert_eq!(marks.snapshot().len(), 2);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_data_survives_reopen(ctx: &mut StoreTestContext) {
        let task = ctx.store.create_task("Persistent", "kept on disk").unwrap();
        ctx.store.toggle_completion(day(2024, 2, 1), task.id).unwrap();

        let path = ctx._temp_dir.path().join("doneday.db");
        let reopened = Store::open(path).unwrap();

        assert_eq!(reopened.get_task(task.id).unwrap().unwrap().description, "kept on disk");
        let marks = reopened.list_completions(task.id).unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].date, day(2024, 2, 1));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_statistics_example(ctx: &mut StoreTestContext) {
        use doneday::libs::stats::CompletionStats;

        let task = ctx.store.create_task("T", "").unwrap();
        for d in [day(2024, 1, 5), day(2024, 1, 20), day(2024, 2, 1), day(2023, 1, 5)] {
            ctx.store.toggle_completion(d, task.id).unwrap();
        }

        let marks = ctx.store.list_completions(task.id).unwrap();
        assert_eq!(marks.len(), 4);

        let stats = CompletionStats::from_marks(&marks, day(2024, 1, 15));
        assert_eq!(stats.total, 4);
        assert_eq!(stats.this_year, 3);
        assert_eq!(stats.this_month, 2);
    }
}
