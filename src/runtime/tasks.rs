//! Arena of live effect tasks, indexed by handle id.

use futures::stream::{BoxStream, StreamExt};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One tokio task per started handle.
///
/// A task forwards every item of its stream into the inbox and ends when the
/// stream ends or the inbox closes. Aborting is cooperative: the task stops
/// at its next await point, so an item already pushed into the inbox is still
/// delivered. Dropping the arena aborts every task.
pub(crate) struct TaskArena {
    tasks: HashMap<u64, JoinHandle<()>>,
}

impl TaskArena {
    pub(crate) fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub(crate) fn spawn<M>(&mut self, id: u64, mut messages: BoxStream<'static, M>, inbox: mpsc::Sender<M>)
    where
        M: Send + 'static,
    {
        let task = tokio::spawn(async move {
            while let Some(message) = messages.next().await {
                if inbox.send(message).await.is_err() {
                    break;
                }
            }
        });

        if let Some(stale) = self.tasks.insert(id, task) {
            stale.abort();
        }
    }

    /// Abort the task bound to `id`. Unknown ids are ignored.
    pub(crate) fn abort(&mut self, id: u64) -> bool {
        match self.tasks.remove(&id) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub(crate) fn abort_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskArena {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tokio::sync::oneshot;

    /// Signals through a oneshot when dropped.
    struct DropSignal(Option<oneshot::Sender<()>>);

    impl Drop for DropSignal {
        fn drop(&mut self) {
            if let Some(tx) = self.0.take() {
                let _ = tx.send(());
            }
        }
    }

    fn endless(guard: DropSignal) -> BoxStream<'static, u32> {
        stream::unfold(guard, |guard| async move {
            futures::future::pending::<()>().await;
            Some((0, guard))
        })
        .boxed()
    }

    #[tokio::test]
    async fn spawned_task_forwards_items() {
        let mut arena = TaskArena::new();
        let (tx, mut rx) = mpsc::channel(8);

        arena.spawn(0, stream::iter(vec![1, 2, 3]).boxed(), tx);

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(rx.recv().await, Some(3));
        assert_eq!(rx.recv().await, None);
        assert_eq!(arena.len(), 1);
    }

    #[tokio::test]
    async fn abort_drops_the_stream() {
        let mut arena = TaskArena::new();
        let (tx, _rx) = mpsc::channel(8);
        let (dropped_tx, dropped_rx) = oneshot::channel();

        arena.spawn(5, endless(DropSignal(Some(dropped_tx))), tx);
        assert!(arena.abort(5));
        assert!(!arena.abort(5));

        dropped_rx.await.unwrap();
        assert_eq!(arena.len(), 0);
    }

    #[tokio::test]
    async fn dropping_arena_aborts_everything() {
        let mut arena = TaskArena::new();
        let (tx, _rx) = mpsc::channel(8);
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        arena.spawn(0, endless(DropSignal(Some(first_tx))), tx.clone());
        arena.spawn(1, endless(DropSignal(Some(second_tx))), tx);
        drop(arena);

        first_rx.await.unwrap();
        second_rx.await.unwrap();
    }
}
