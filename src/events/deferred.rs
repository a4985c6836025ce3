use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{Level, event, instrument};

use super::observer::MidiObserver;
use crate::decoder::SetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ControlChange {
    pub channel: u8,
    pub controller: u8,
    pub value: u8,
}

/// Hands generic control change events to a tokio task, off the decoding path.
///
/// Enqueueing never blocks: when the bounded queue is full the event is dropped.
#[derive(Debug)]
pub(crate) struct DeferredDelivery {
    sender: Sender<ControlChange>,
    worker: JoinHandle<()>,
}

impl DeferredDelivery {
    pub fn spawn<O>(observer: Arc<O>, capacity: usize) -> Result<Self, SetupError>
    where
        O: MidiObserver + ?Sized + 'static,
    {
        if capacity == 0 {
            return Err(SetupError::ZeroCapacity);
        }
        let handle = Handle::try_current()?;
        let (sender, receiver) = mpsc::channel(capacity);
        let worker = handle.spawn(Self::deliver(observer, receiver));
        event!(Level::DEBUG, capacity, "Deferred control change delivery started");
        Ok(DeferredDelivery { sender, worker })
    }

    #[instrument(name = "deferred", skip_all)]
    async fn deliver<O>(observer: Arc<O>, mut receiver: Receiver<ControlChange>)
    where
        O: MidiObserver + ?Sized,
    {
        while let Some(change) = receiver.recv().await {
            event!(Level::TRACE, ?change, "Delivering deferred control change");
            observer.control_change(change.channel, change.controller, change.value);
        }
        event!(Level::DEBUG, "Deferred control change queue closed");
    }

    /// Queues a control change, returning `false` when it had to be dropped.
    pub fn enqueue(&self, change: ControlChange) -> bool {
        match self.sender.try_send(change) {
            Ok(()) => true,
            Err(TrySendError::Full(change)) => {
                event!(Level::WARN, ?change, "Deferred control change queue is full, dropping event");
                false
            }
            Err(TrySendError::Closed(change)) => {
                event!(Level::ERROR, ?change, "Deferred control change worker has stopped, dropping event");
                false
            }
        }
    }

    /// Closes the queue and waits until every queued event has been delivered.
    pub async fn close(self) {
        drop(self.sender);
        if let Err(e) = self.worker.await {
            event!(Level::ERROR, "Deferred control change worker failed: {}", e);
        }
    }
}
