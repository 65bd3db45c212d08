use async_trait::async_trait;

use super::Event;

/// Receives dispatched events.
///
/// Handlers run on the dispatching thread, one at a time. Returning `Err`
/// logs the failure and delivery continues with the next handler; call
/// [`Event::mark_handled`] to stop delivery instead.
#[async_trait(?Send)]
pub trait EventHandler {
    async fn handle(&self, event: &mut Event) -> anyhow::Result<()>;
}
