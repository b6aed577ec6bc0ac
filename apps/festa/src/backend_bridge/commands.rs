//! Backend commands queued from the controller to the backend worker.

use shared::protocol::DkuVerificationRequest;

use crate::controller::flow::VerificationTicket;

#[derive(Debug)]
pub enum BackendCommand {
    Verify {
        ticket: VerificationTicket,
        request: DkuVerificationRequest,
    },
    Reverify {
        ticket: VerificationTicket,
        request: DkuVerificationRequest,
    },
    ResolveTickets,
    FetchLineup,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Verify { .. } => "verify",
            Self::Reverify { .. } => "reverify",
            Self::ResolveTickets => "resolve_tickets",
            Self::FetchLineup => "fetch_lineup",
        }
    }

    pub fn ticket(&self) -> Option<VerificationTicket> {
        match self {
            Self::Verify { ticket, .. } | Self::Reverify { ticket, .. } => Some(*ticket),
            Self::ResolveTickets | Self::FetchLineup => None,
        }
    }
}
