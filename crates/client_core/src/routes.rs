//! Festival API paths, relative to the configured base URL.

use shared::domain::EventId;

pub const DKU_VERIFY: &str = "/user/dku/verify";
pub const DKU_REVERIFY: &str = "/user/dku/refresh";
pub const TICKET_EVENTS: &str = "/ticket/event";
/// Takes a `festivalDate` query parameter.
pub const LINEUP: &str = "/line-up";

pub fn my_ticket(event_id: EventId) -> String {
    format!("/ticket/event/{}", event_id.0)
}
