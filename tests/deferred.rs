#[cfg(test)]
mod tests {
    use doneday::db::store::Store;
    use doneday::libs::day::Day;
    use doneday::libs::deferred::{DeferredDeletes, DeleteState};
    use doneday::libs::error::{Error, RecordKind};
    use doneday::libs::task::{Task, TaskId};
    use std::time::Duration;
    use tokio::time::timeout;

    const SHORT: Duration = Duration::from_millis(50);
    const LONG: Duration = Duration::from_secs(60);
    const LIMIT: Duration = Duration::from_secs(5);

    fn setup(window: Duration) -> (Store, DeferredDeletes, Task) {
        let store = Store::in_memory().unwrap();
        let task = store.create_task("Doomed", "").unwrap();
        store.toggle_completion(Day::today(), task.id).unwrap();
        store.toggle_completion(Day::today().pred(), task.id).unwrap();
        let deletes = DeferredDeletes::new(store.clone(), window);
        (store, deletes, task)
    }

    #[tokio::test]
    async fn test_window_elapses_and_cascade_runs() {
        let (store, deletes, task) = setup(SHORT);

        let mut pending = deletes.request(task.id).await.unwrap();
        assert_eq!(pending.state(), DeleteState::Requested);
        assert!(deletes.is_pending(task.id));

        let state = timeout(LIMIT, pending.settled()).await.unwrap();
        assert_eq!(state, DeleteState::ConfirmedByTimeout);

        assert!(store.get_task(task.id).unwrap().is_none());
        assert!(store.list_completions(task.id).unwrap().is_empty());
        assert!(!deletes.is_pending(task.id));
        assert!(deletes.hidden().is_empty());
    }

    #[tokio::test]
    async fn test_pending_task_is_hidden_but_stored() {
        let (store, deletes, task) = setup(LONG);
        let other = store.create_task("Other", "").unwrap();

        deletes.request(task.id).await.unwrap();

        assert!(deletes.hidden().contains(&task.id));
        let mut tasks = store.list_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        deletes.retain_visible(&mut tasks);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, other.id);

        deletes.cancel(task.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_confirm_applies_immediately() {
        let (store, deletes, task) = setup(LONG);
        let pending = deletes.request(task.id).await.unwrap();

        let state = timeout(LIMIT, deletes.confirm(task.id)).await.unwrap().unwrap();
        assert_eq!(state, DeleteState::ConfirmedByUser);
        assert_eq!(pending.state(), DeleteState::ConfirmedByUser);
        assert!(store.get_task(task.id).unwrap().is_none());
        assert!(store.list_completions(task.id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_restores_task() {
        let (store, deletes, task) = setup(LONG);
        deletes.request(task.id).await.unwrap();

        let state = deletes.cancel(task.id).await.unwrap();
        assert_eq!(state, DeleteState::Cancelled);

        assert!(store.get_task(task.id).unwrap().is_some());
        assert_eq!(store.list_completions(task.id).unwrap().len(), 2);
        assert!(deletes.hidden().is_empty());
        assert_eq!(deletes.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_decisions_on_unknown_ids_are_not_found() {
        let (_store, deletes, task) = setup(LONG);

        let err = deletes.cancel(task.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: RecordKind::PendingDelete, .. }));

        deletes.request(task.id).await.unwrap();
        deletes.confirm(task.id).await.unwrap();
        assert!(deletes.confirm(task.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_request_for_missing_task_fails() {
        let (_store, deletes, _task) = setup(LONG);

        let err = deletes.request(TaskId::new()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: RecordKind::Task, .. }));
        assert_eq!(deletes.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_request_keeps_one_entry() {
        let (_store, deletes, task) = setup(LONG);

        let first = deletes.request(task.id).await.unwrap();
        let second = deletes.request(task.id).await.unwrap();
        assert_eq!(first.task_id(), second.task_id());
        assert_eq!(deletes.pending_count(), 1);

        deletes.cancel(task.id).await.unwrap();
        assert_eq!(first.state(), DeleteState::Cancelled);
        assert_eq!(second.state(), DeleteState::Cancelled);
    }

    #[tokio::test]
    async fn test_request_again_after_cancel() {
        let (store, deletes, task) = setup(LONG);

        deletes.request(task.id).await.unwrap();
        deletes.cancel(task.id).await.unwrap();

        deletes.request(task.id).await.unwrap();
        assert!(deletes.is_pending(task.id));
        assert_eq!(deletes.confirm(task.id).await.unwrap(), DeleteState::ConfirmedByUser);
        assert!(store.get_task(task.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flush_applies_everything_pending() {
        let (store, deletes, task) = setup(LONG);
        let second = store.create_task("Also doomed", "").unwrap();
        let survivor = store.create_task("Survivor", "").unwrap();

        deletes.request(task.id).await.unwrap();
        deletes.request(second.id).await.unwrap();

        let mut flushed = timeout(LIMIT, deletes.flush()).await.unwrap();
        flushed.sort_by_key(|(id, _)| *id);
        let mut expected = vec![(task.id, DeleteState::Flushed), (second.id, DeleteState::Flushed)];
        expected.sort_by_key(|(id, _)| *id);
        assert_eq!(flushed, expected);

        let remaining: Vec<TaskId> = store.list_tasks().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![survivor.id]);
        assert_eq!(deletes.pending_count(), 0);

        assert!(deletes.flush().await.is_empty());
    }

    #[tokio::test]
    async fn test_hidden_set_is_observable() {
        let (_store, deletes, task) = setup(LONG);
        let mut hidden = deletes.watch_hidden();

        assert!(hidden.snapshot().is_empty());

        deletes.request(task.id).await.unwrap();
        let now_hidden = timeout(LIMIT, hidden.changed()).await.unwrap().unwrap();
        assert!(now_hidden.contains(&task.id));

        deletes.cancel(task.id).await.unwrap();
        let now_hidden = timeout(LIMIT, hidden.changed()).await.unwrap().unwrap();
        assert!(now_hidden.is_empty());
        assert!(hidden.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_snapshot_held_across_delete_decisions() {
        let (store, deletes, task) = setup(LONG);
        let hidden = deletes.watch_hidden();

        deletes.request(task.id).await.unwrap();
        let held = hidden.snapshot();
        assert!(held.contains(&task.id));

        // Keeping the snapshot must not hold up publishing the next hidden set
        let state = timeout(LIMIT, deletes.confirm(task.id)).await.unwrap().unwrap();
        assert_eq!(state, DeleteState::ConfirmedByUser);
        assert!(held.contains(&task.id));
        assert!(hidden.snapshot().is_empty());
        assert!(store.get_task(task.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_task_deleted_elsewhere_still_settles() {
        let (store, deletes, task) = setup(LONG);
        deletes.request(task.id).await.unwrap();

        store.delete_task_cascade(task.id).unwrap();

        assert_eq!(deletes.confirm(task.id).await.unwrap(), DeleteState::ConfirmedByUser);
    }
}
