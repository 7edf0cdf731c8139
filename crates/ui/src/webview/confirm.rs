use async_trait::async_trait;
use dioxus::prelude::*;
use services::sessions::ports::Confirmer;
use tokio::sync::oneshot;

/// A question waiting for the user's answer in the in-app dialog.
pub struct PendingConfirm {
    message: String,
    reply: oneshot::Sender<bool>,
}

impl PendingConfirm {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn answer(self, accepted: bool) {
        // The waiting side may already be gone when the view was torn down.
        let _ = self.reply.send(accepted);
    }
}

/// `Confirmer` that shows a modal and resolves when it is answered.
///
/// A dialog dropped without an answer counts as declined.
pub struct DialogConfirmer {
    pending: Signal<Option<PendingConfirm>>,
}

impl DialogConfirmer {
    #[must_use]
    pub fn new(pending: Signal<Option<PendingConfirm>>) -> Self {
        Self { pending }
    }
}

#[async_trait(?Send)]
impl Confirmer for DialogConfirmer {
    async fn confirm(&self, message: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let mut pending = self.pending;
        if let Some(previous) = pending.write().replace(PendingConfirm {
            message: message.to_owned(),
            reply,
        }) {
            previous.answer(false);
        }
        answer.await.unwrap_or(false)
    }
}

/// Answer the open dialog, if any.
pub fn answer_pending(mut pending: Signal<Option<PendingConfirm>>, accepted: bool) {
    let open = pending.write().take();
    if let Some(open) = open {
        open.answer(accepted);
    }
}
