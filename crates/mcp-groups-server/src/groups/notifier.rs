//! Fire-and-forget `notifications/groups/list_changed` delivery.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::types::{groups_list_changed, JsonRpcNotification};

/// Pending change signals kept per subscriber. Bursts beyond this coalesce.
const CHANNEL_CAPACITY: usize = 16;

/// Fans "group set changed" signals out to every subscribed session.
///
/// `notify` never blocks and never fails from the caller's point of view;
/// delivery to each peer happens on that session's forwarding task.
#[derive(Debug, Clone)]
pub struct ListChangedNotifier {
    tx: broadcast::Sender<()>,
}

impl ListChangedNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Signal that the group set changed.
    pub fn notify(&self) {
        match self.tx.send(()) {
            Ok(receivers) => tracing::debug!("Groups changed, signalled {receivers} session(s)"),
            Err(_) => tracing::trace!("Groups changed, no sessions subscribed"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ListChangedNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward change signals to one peer's outbound channel as notifications.
///
/// Ends when the server side is dropped or the peer's channel closes. Failed
/// deliveries are logged, never reported back to whoever mutated the registry.
pub fn spawn_forwarder(
    mut signals: broadcast::Receiver<()>,
    outbound: mpsc::Sender<JsonRpcNotification>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match signals.recv().await {
                // Lagging only means several changes collapsed into one.
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    if let Err(e) = outbound.send(groups_list_changed()).await {
                        tracing::warn!("Failed to deliver groups list_changed notification: {e}");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
