//! Runtime bridge between the controller command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{full_lineup, my_ticket_list, LineupApi, TicketApi, VerificationApi};
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

/// Everything the backend worker needs from the festival API.
pub trait FestaApi: VerificationApi + TicketApi + LineupApi {}

impl<T> FestaApi for T where T: VerificationApi + TicketApi + LineupApi {}

/// Spawns the backend worker. Commands run concurrently on a tokio runtime
/// and each answers with exactly one [`UiEvent`].
pub fn launch<A>(
    api: Arc<A>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()>
where
    A: FestaApi + 'static,
{
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let _ = ui_tx.send(UiEvent::Info("Backend worker ready".to_string()));
        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let name = cmd.name();
                    let event = execute(api.as_ref(), cmd).await;
                    if ui_tx.send(event).is_err() {
                        tracing::debug!(command = name, "ui went away before result arrived");
                    }
                });
            }
            tracing::debug!("command queue closed, backend worker stopping");
        });
    })
}

pub async fn execute<A>(api: &A, cmd: BackendCommand) -> UiEvent
where
    A: FestaApi + ?Sized,
{
    match cmd {
        BackendCommand::Verify { ticket, request } => UiEvent::Verified {
            ticket,
            result: api
                .verify(&request)
                .await
                .map_err(|err| UiError::from_client(UiErrorContext::Verification, &err)),
        },
        BackendCommand::Reverify { ticket, request } => UiEvent::Reverified {
            ticket,
            result: api
                .reverify(&request)
                .await
                .map_err(|err| UiError::from_client(UiErrorContext::Reverification, &err)),
        },
        BackendCommand::ResolveTickets => UiEvent::TicketsResolved(
            my_ticket_list(api)
                .await
                .map_err(|err| UiError::from_client(UiErrorContext::Tickets, &err)),
        ),
        BackendCommand::FetchLineup => UiEvent::LineupLoaded(
            full_lineup(api)
                .await
                .map_err(|err| UiError::from_client(UiErrorContext::Lineup, &err)),
        ),
    }
}
