//! Marshaling work onto the thread that owns the grid.
//!
//! Work posted from any thread is queued and runs when the owner drains the
//! queue with [`OwnerQueue::run_pending`].

use std::thread::{self, ThreadId};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::DispatchError;

type Job<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Single-consumer queue bound to the thread that created it.
pub struct OwnerQueue<T> {
    owner: ThreadId,
    sender: Sender<Job<T>>,
    receiver: Receiver<Job<T>>,
}

impl<T> OwnerQueue<T> {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            owner: thread::current().id(),
            sender,
            receiver,
        }
    }

    pub fn handle(&self) -> OwnerHandle<T> {
        OwnerHandle {
            owner: self.owner,
            sender: self.sender.clone(),
        }
    }

    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Runs queued work in arrival order and returns how many jobs ran.
    pub fn run_pending(&self, target: &mut T) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job(target);
            ran += 1;
        }
        ran
    }
}

impl<T> Default for OwnerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for OwnerQueue<T> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
        }
    }
}

/// Sending side of an [`OwnerQueue`], safe to move to other threads.
pub struct OwnerHandle<T> {
    owner: ThreadId,
    sender: Sender<Job<T>>,
}

impl<T> Clone for OwnerHandle<T> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            sender: self.sender.clone(),
        }
    }
}

impl<T> OwnerHandle<T> {
    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Queues `job` without waiting for it.
    pub fn post(&self, job: impl FnOnce(&mut T) + Send + 'static) -> Result<(), DispatchError> {
        self.sender
            .send(Box::new(job))
            .map_err(|_| DispatchError::Disconnected)
    }

    /// Queues `job` and blocks until the owner has run it.
    ///
    /// Called on the owning thread this would wait on itself forever, so it
    /// fails with [`DispatchError::OwnerThread`]; the owner runs the work directly.
    pub fn invoke<R: Send + 'static>(
        &self,
        job: impl FnOnce(&mut T) -> R + Send + 'static,
    ) -> Result<R, DispatchError> {
        if self.is_owner_thread() {
            return Err(DispatchError::OwnerThread);
        }
        let (reply, answer) = crossbeam_channel::bounded(1);
        self.post(move |target| {
            let _ = reply.send(job(target));
        })?;
        answer.recv().map_err(|_| DispatchError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_work_runs_on_drain() {
        let queue = OwnerQueue::<Vec<u32>>::new();
        let handle = queue.handle();
        thread::spawn(move || {
            handle.post(|v| v.push(1)).unwrap();
            handle.post(|v| v.push(2)).unwrap();
        })
        .join()
        .unwrap();

        let mut target = Vec::new();
        assert_eq!(queue.pending(), 2);
        assert_eq!(queue.run_pending(&mut target), 2);
        assert_eq!(target, vec![1, 2]);
    }

    #[test]
    fn invoke_from_owner_is_refused() {
        let queue = OwnerQueue::<u32>::new();
        assert!(queue.is_owner_thread());
        assert_eq!(queue.handle().invoke(|n| *n), Err(DispatchError::OwnerThread));
    }

    #[test]
    fn invoke_waits_for_owner() {
        let queue = OwnerQueue::<u32>::new();
        let handle = queue.handle();
        let worker = thread::spawn(move || handle.invoke(|n| *n * 2));

        let mut value = 21;
        while queue.pending() == 0 {
            thread::yield_now();
        }
        queue.run_pending(&mut value);
        assert_eq!(worker.join().unwrap(), Ok(42));
    }

    #[test]
    fn dropped_queue_disconnects() {
        let queue = OwnerQueue::<u32>::new();
        let handle = queue.handle();
        drop(queue);
        assert_eq!(handle.post(|_| {}), Err(DispatchError::Disconnected));
    }
}
