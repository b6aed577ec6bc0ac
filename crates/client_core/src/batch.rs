//! Best-effort fan-out of per-event ticket lookups.

use futures::future::join_all;
use shared::{
    domain::{EventId, TicketId},
    protocol::TicketInfo,
};
use tracing::warn;

use crate::{ClientError, ClientResult, TicketApi};

/// Settled lookups, each list in the order the event ids were given.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub tickets: Vec<(EventId, TicketInfo)>,
    pub failed: Vec<(EventId, ClientError)>,
}

/// Issues one lookup per event concurrently and waits for all of them.
pub async fn resolve_tickets<A>(api: &A, event_ids: &[EventId]) -> BatchOutcome
where
    A: TicketApi + ?Sized,
{
    let settled = join_all(
        event_ids
            .iter()
            .map(|&event_id| async move { (event_id, api.my_ticket(event_id).await) }),
    )
    .await;

    let mut outcome = BatchOutcome::default();
    for (event_id, result) in settled {
        match result {
            Ok(ticket) => outcome.tickets.push((event_id, ticket)),
            Err(err) => outcome.failed.push((event_id, err)),
        }
    }
    outcome
}

/// Ticket ids held by the current user across every listed event. Lookups
/// that fail (usually "no ticket for this event") are logged and left out.
pub async fn my_ticket_list<A>(api: &A) -> ClientResult<Vec<TicketId>>
where
    A: TicketApi + ?Sized,
{
    let events = api.list_events().await?;
    let event_ids: Vec<EventId> = events.iter().map(|event| event.id).collect();
    let outcome = resolve_tickets(api, &event_ids).await;

    for (event_id, err) in &outcome.failed {
        warn!(event_id = event_id.0, error = %err, "dropping failed ticket lookup");
    }

    Ok(outcome
        .tickets
        .into_iter()
        .map(|(_, ticket)| ticket.id)
        .collect())
}
