mod backend_bridge;
mod config;
mod controller;
mod ui;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use client_core::FestaClient;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;
use ui_kit::GesturePolicy;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::{
    events::UiEvent,
    flow::{FlowStatus, Mode, VerificationFlow, VerifyStep},
};
use crate::ui::{await_event, ConsoleNavigator, ConsoleNotifier, HeadlessApp, Input};

#[derive(Parser, Debug)]
#[command(name = "festa", about = "Campus festival client")]
struct Args {
    /// Settings file; defaults to ./festa.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    locale: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk the student verification flow.
    Verify {
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        password: String,
        /// Refresh an earlier verification instead of signing up.
        #[arg(long)]
        reverify: bool,
        /// Accept the terms once verified; otherwise the consent sheet is dismissed.
        #[arg(long)]
        accept_terms: bool,
    },
    /// List ticket ids across all ticketing events.
    Tickets,
    /// Print the lineup for every festival day.
    Lineup,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(locale) = args.locale {
        settings.locale = locale;
    }
    tracing::debug!(?settings, "settings loaded");

    let request_timeout = Duration::from_secs(settings.request_timeout_secs);
    let api = Arc::new(
        FestaClient::with_timeout(settings.api_url.clone(), request_timeout)
            .context("failed to build http client")?,
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    let worker = runtime::launch(api, cmd_rx, ui_tx);
    let answer_timeout = request_timeout + Duration::from_secs(5);

    let outcome = match args.command {
        Command::Verify {
            student_id,
            password,
            reverify,
            accept_terms,
        } => {
            let mode = if reverify { Mode::Reverify } else { Mode::Verify };
            let flow = VerificationFlow::new(
                mode,
                settings.locale.clone(),
                GesturePolicy::with_threshold(settings.drag_threshold),
                ConsoleNavigator::default(),
                ConsoleNotifier::default(),
            )?;
            let app = HeadlessApp::new(flow, cmd_tx.clone(), ui_rx.clone(), answer_timeout);
            run_verification(app, student_id, password, accept_terms)
        }
        Command::Tickets => {
            match await_event(&cmd_tx, &ui_rx, BackendCommand::ResolveTickets, answer_timeout)? {
                UiEvent::TicketsResolved(Ok(ids)) => {
                    println!("{} ticket(s)", ids.len());
                    for id in ids {
                        println!("  ticket {}", id.0);
                    }
                    Ok(())
                }
                UiEvent::TicketsResolved(Err(err)) => Err(anyhow::anyhow!("{}", err.message())),
                other => Err(anyhow::anyhow!("unexpected backend event: {other:?}")),
            }
        }
        Command::Lineup => {
            match await_event(&cmd_tx, &ui_rx, BackendCommand::FetchLineup, answer_timeout)? {
                UiEvent::LineupLoaded(Ok(lineup)) => {
                    for slot in lineup {
                        let time = slot
                            .performance_time
                            .map(|at| at.format("%H:%M").to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "{:<10} {:<6} {}",
                            slot.festival_date.as_str(),
                            time,
                            slot.singer
                        );
                    }
                    Ok(())
                }
                UiEvent::LineupLoaded(Err(err)) => Err(anyhow::anyhow!("{}", err.message())),
                other => Err(anyhow::anyhow!("unexpected backend event: {other:?}")),
            }
        }
    };

    drop(cmd_tx);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    outcome
}

fn run_verification(
    mut app: HeadlessApp<ConsoleNavigator, ConsoleNotifier>,
    student_id: String,
    password: String,
    accept_terms: bool,
) -> anyhow::Result<()> {
    app.handle(Input::StudentId(student_id))?;
    app.handle(Input::Password(password))?;
    app.handle(Input::Submit)?;

    if app.flow().current_step() == Some(VerifyStep::Terms) {
        if accept_terms {
            app.handle(Input::AcceptTerms)?;
        } else {
            println!("terms not accepted; closing the consent sheet");
            app.handle(Input::DragSheet(40.0))?;
        }
    }

    let status = app.flow().status();
    let step = app.flow().current_step();
    let failure = app.flow().notifier().errors().last().cloned();
    if let Some(target) = app.flow().navigator().visited().last() {
        tracing::info!(%target, "verification finished");
    }
    if !app.status().is_empty() {
        tracing::warn!(status = app.status(), "backend status");
    }
    app.close();

    match status {
        FlowStatus::Completed | FlowStatus::Rerouted => Ok(()),
        _ => match failure {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => {
                println!("verification stopped at {step:?}");
                Ok(())
            }
        },
    }
}

#[cfg(test)]
#[path = "tests/flow_tests.rs"]
mod flow_tests;

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod schema_tests;

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod events_tests;

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod bridge_tests;
