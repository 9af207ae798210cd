//! Cooperative shutdown signal shared by every stage across every crate
//! that consumes a [`crate::MessageBus`]: a `broadcast::channel(1)` stop
//! signal -> each stage finishes its in-flight message -> closes its
//! consumer.

use tokio::sync::broadcast;

#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    pub fn trigger(&self) {
        let _ = self.sender.send(());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
