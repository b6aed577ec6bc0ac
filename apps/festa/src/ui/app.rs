use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use shared::domain::SignupToken;
use tracing::{debug, info, warn};
use ui_kit::DragSample;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    flow::{Mode, SheetInput, VerificationFlow},
    orchestration::dispatch_backend_command,
    shell::{navigation_target, Navigator, Notifier},
};

/// One user gesture on the verification page.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    StudentId(String),
    Password(String),
    Submit,
    Back,
    /// Press, drag by the offset, release.
    DragSheet(f64),
    OverlayClick,
    AcceptTerms,
}

#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    visited: Vec<String>,
}

impl ConsoleNavigator {
    pub fn visited(&self) -> &[String] {
        &self.visited
    }
}

impl Navigator for ConsoleNavigator {
    fn push(&mut self, path: &str, token: Option<&SignupToken>) {
        let target = navigation_target(path, token);
        info!(%path, "navigating");
        println!("navigate -> {target}");
        self.visited.push(target);
    }
}

#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    errors: Vec<String>,
}

impl ConsoleNotifier {
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Notifier for ConsoleNotifier {
    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
        self.errors.push(message.to_string());
    }

    fn success(&mut self, message: &str) {
        println!("{message}");
    }
}

pub struct HeadlessApp<N, T> {
    flow: VerificationFlow<N, T>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    response_timeout: Duration,
}

impl<N: Navigator, T: Notifier> HeadlessApp<N, T> {
    pub fn new(
        flow: VerificationFlow<N, T>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        response_timeout: Duration,
    ) -> Self {
        Self {
            flow,
            cmd_tx,
            ui_rx,
            status: String::new(),
            response_timeout,
        }
    }

    pub fn flow(&self) -> &VerificationFlow<N, T> {
        &self.flow
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn handle(&mut self, input: Input) -> anyhow::Result<()> {
        debug!(?input, "ui input");
        match input {
            Input::StudentId(value) => self.flow.change_student_id(&value),
            Input::Password(value) => self.flow.change_password(&value),
            Input::Submit => {
                if let Some(cmd) = self.flow.submit() {
                    self.dispatch(cmd);
                    self.await_backend()?;
                }
            }
            Input::Back => {
                self.flow.back();
            }
            Input::DragSheet(offset_y) => {
                self.flow.handle_sheet(SheetInput::PointerDown);
                self.flow
                    .handle_sheet(SheetInput::DragMove(DragSample::new(offset_y / 2.0)));
                self.flow
                    .handle_sheet(SheetInput::Release(DragSample::new(offset_y)));
            }
            Input::OverlayClick => self.flow.handle_sheet(SheetInput::OverlayClick),
            Input::AcceptTerms => {
                self.flow.accept_terms();
            }
        }
        self.paint();
        Ok(())
    }

    /// Leaves the page. A flow that has not finished is abandoned.
    pub fn close(mut self) -> VerificationFlow<N, T> {
        self.flow.abandon();
        self.flow
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        let ticket = cmd.ticket();
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            return;
        }
        warn!(status = %self.status, "backend command not queued");
        // Unblock the form so the user can retry.
        if let Some(ticket) = ticket {
            let err = UiError::from_message(UiErrorContext::BackendStartup, self.status.clone());
            let event = match ticket.mode() {
                Mode::Verify => UiEvent::Verified {
                    ticket,
                    result: Err(err),
                },
                Mode::Reverify => UiEvent::Reverified {
                    ticket,
                    result: Err(err),
                },
            };
            self.route(event);
        }
    }

    fn await_backend(&mut self) -> anyhow::Result<()> {
        while self.flow.is_loading() {
            let event = match self.ui_rx.recv_timeout(self.response_timeout) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => {
                    self.flow.abandon();
                    anyhow::bail!("backend did not answer within {:?}", self.response_timeout);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.flow.abandon();
                    anyhow::bail!("backend worker stopped");
                }
            };
            self.route(event);
        }
        Ok(())
    }

    fn route(&mut self, event: UiEvent) {
        match self.flow.apply(event) {
            None => {}
            Some(UiEvent::Info(message)) => debug!("{message}"),
            Some(UiEvent::Error(err)) => {
                warn!(context = ?err.context(), "{}", err.message());
                self.status = err.message().to_string();
            }
            Some(other) => debug!(?other, "event not meant for the verification page"),
        }
    }

    /// One paint frame. Sheet animations finish instantly without a screen.
    fn paint(&mut self) {
        self.flow.run_frame();
        self.flow.handle_sheet(SheetInput::EnterComplete);
        self.flow.handle_sheet(SheetInput::ExitComplete);

        let view = self.flow.render();
        debug!(
            step = ?view.step,
            field = ?view.field.as_ref().map(|field| field.field),
            loading = view.loading,
            sheet = ?view.sheet.as_ref().map(|sheet| sheet.presence),
            "frame"
        );
    }
}

/// Queues `cmd` and waits for the first answer that is not a status line.
pub fn await_event(
    cmd_tx: &Sender<BackendCommand>,
    ui_rx: &Receiver<UiEvent>,
    cmd: BackendCommand,
    timeout: Duration,
) -> anyhow::Result<UiEvent> {
    let mut status = String::new();
    if !dispatch_backend_command(cmd_tx, cmd, &mut status) {
        anyhow::bail!(status);
    }
    loop {
        let event = ui_rx
            .recv_timeout(timeout)
            .context("backend did not answer")?;
        match event {
            UiEvent::Info(message) => debug!("{message}"),
            UiEvent::Error(err) => anyhow::bail!("{}", err.message()),
            other => return Ok(other),
        }
    }
}
