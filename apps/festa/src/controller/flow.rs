//! Student verification funnel: credential entry, remote check, consent
//! sheet, then hand-off to phone signup.
//!
//! `VerificationFlow` is the only writer of the funnel and of the consent
//! sheet. The sheet's open state is derived from the funnel after every
//! transition, and remote results re-enter through [`VerificationFlow::apply`]
//! carrying the [`VerificationTicket`] they were issued with.

use shared::{domain::SignupToken, protocol::DkuVerificationResponse};
use tracing::{debug, info, warn};
use ui_kit::{
    BottomSheet, DismissRequest, DragSample, FrameHandle, FrameScheduler, FunnelError,
    GesturePolicy, HeightTier, SheetConfig, SheetFrame, StepFunnel, StepSlots,
};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiError, UiEvent},
        schema::{
            is_student_id, validate_password, validate_student_id, Field, PartialCredentials,
            ValidationError,
        },
        shell::{phone_signup_path, Navigator, Notifier, HOME_PATH},
        terms::TermsSheet,
    },
};

pub const REVERIFIED_MESSAGE: &str = "Re-verification complete.";
const SHEET_HEADER: &str = "Terms of use";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyStep {
    StudentId,
    Password,
    Terms,
}

impl VerifyStep {
    /// Order the funnel advances in.
    pub const FLOW: [Self; 3] = [Self::StudentId, Self::Password, Self::Terms];
    /// Order the credential fields are laid out on screen.
    pub const DISPLAY: [Self; 2] = [Self::Password, Self::StudentId];

    /// The credential field shown on this step, if any.
    pub fn field(self) -> Option<Field> {
        match self {
            Self::StudentId => Some(Field::StudentId),
            Self::Password => Some(Field::Password),
            Self::Terms => None,
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::StudentId => "Enter your student id.",
            Self::Password => "Enter your portal password.",
            Self::Terms => "Please accept the terms.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Verify,
    /// Refreshes an earlier verification. Terms were accepted the first time,
    /// so success routes home instead of opening the consent sheet.
    Reverify,
}

impl Mode {
    pub fn from_query_flag(reverify: Option<&str>) -> Self {
        match reverify {
            Some("true") => Self::Reverify,
            _ => Self::Verify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    Active,
    Completed,
    Rerouted,
    Abandoned,
}

/// Issued with every remote call. A result whose generation no longer
/// matches the flow's is a late answer to a question nobody is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationTicket {
    generation: u64,
    from: VerifyStep,
    mode: Mode,
}

impl VerificationTicket {
    pub fn from_step(&self) -> VerifyStep {
        self.from
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[derive(Debug, Default)]
struct VerificationSession {
    credentials: PartialCredentials,
    signup_token: Option<SignupToken>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetInput {
    PointerDown,
    DragMove(DragSample),
    Release(DragSample),
    TouchStart,
    TouchEnd,
    OverlayClick,
    EnterComplete,
    ExitComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: &'a str,
    pub error: Option<&'a ValidationError>,
    pub focused: bool,
}

#[derive(Debug)]
pub struct FlowView<'a> {
    pub step: Option<VerifyStep>,
    pub subtitle: Option<&'static str>,
    pub field: Option<FieldView<'a>>,
    pub loading: bool,
    pub sheet: Option<SheetFrame<'a, TermsSheet>>,
}

#[derive(Debug)]
pub struct VerificationFlow<N, T> {
    mode: Mode,
    locale: String,
    status: FlowStatus,
    funnel: StepFunnel<VerifyStep>,
    sheet: BottomSheet<TermsSheet>,
    session: VerificationSession,
    student_id_error: Option<ValidationError>,
    password_error: Option<ValidationError>,
    loading: bool,
    generation: u64,
    in_flight: Option<VerificationTicket>,
    frames: FrameScheduler<Field>,
    pending_focus: Option<FrameHandle>,
    focused: Option<Field>,
    navigator: N,
    notifier: T,
}

impl<N: Navigator, T: Notifier> VerificationFlow<N, T> {
    pub fn new(
        mode: Mode,
        locale: impl Into<String>,
        policy: GesturePolicy,
        navigator: N,
        notifier: T,
    ) -> Result<Self, FunnelError> {
        let funnel = StepFunnel::new(VerifyStep::FLOW, VerifyStep::StudentId)?;
        let sheet = BottomSheet::new(
            SheetConfig::new(HeightTier::Auto).policy(policy),
            TermsSheet::default(),
        )
        .with_header(SHEET_HEADER);

        let mut flow = Self {
            mode,
            locale: locale.into(),
            status: FlowStatus::Active,
            funnel,
            sheet,
            session: VerificationSession::default(),
            student_id_error: None,
            password_error: None,
            loading: false,
            generation: 0,
            in_flight: None,
            frames: FrameScheduler::new(),
            pending_focus: None,
            focused: None,
            navigator,
            notifier,
        };
        flow.sync_view();
        Ok(flow)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> FlowStatus {
        self.status
    }

    pub fn current_step(&self) -> Option<VerifyStep> {
        self.funnel.current()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn signup_token(&self) -> Option<&SignupToken> {
        self.session.signup_token.as_ref()
    }

    pub fn credentials(&self) -> &PartialCredentials {
        &self.session.credentials
    }

    pub fn field_error(&self, field: Field) -> Option<&ValidationError> {
        match field {
            Field::StudentId => self.student_id_error.as_ref(),
            Field::Password => self.password_error.as_ref(),
        }
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.focused
    }

    pub fn has_pending_focus(&self) -> bool {
        self.pending_focus
            .is_some_and(|handle| self.frames.is_pending(handle))
    }

    pub fn sheet(&self) -> &BottomSheet<TermsSheet> {
        &self.sheet
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn notifier(&self) -> &T {
        &self.notifier
    }

    /// The consent sheet is open exactly while the funnel sits on the terms step.
    pub fn sheet_should_be_open(&self) -> bool {
        self.funnel.is_at(VerifyStep::Terms)
    }

    pub fn change_student_id(&mut self, value: &str) {
        if !self.is_active() {
            return;
        }
        self.edit(Field::StudentId, value);

        // An in-flight submission and an explicit back both outrank the
        // shortcut; only a fresh edit on the identifier step advances.
        if is_student_id(value)
            && self.in_flight.is_none()
            && self.funnel.next(VerifyStep::StudentId)
        {
            debug!("student id complete, advancing without submit");
            self.after_transition();
        }
    }

    pub fn change_password(&mut self, value: &str) {
        if !self.is_active() {
            return;
        }
        self.edit(Field::Password, value);
    }

    /// The form's single submit action. On a credential step this validates
    /// and returns the remote call to dispatch; on the terms step it accepts.
    pub fn submit(&mut self) -> Option<BackendCommand> {
        if !self.is_active() {
            return None;
        }
        match self.funnel.current()? {
            VerifyStep::Terms => {
                self.accept_terms();
                None
            }
            step => self.begin_verification(step),
        }
    }

    pub fn apply(&mut self, event: UiEvent) -> Option<UiEvent> {
        match event {
            UiEvent::Verified { ticket, result } => {
                self.complete_verification(ticket, result);
                None
            }
            UiEvent::Reverified { ticket, result } => {
                self.complete_reverification(ticket, result);
                None
            }
            other => Some(other),
        }
    }

    pub fn complete_verification(
        &mut self,
        ticket: VerificationTicket,
        result: Result<DkuVerificationResponse, UiError>,
    ) {
        if ticket.mode != Mode::Verify || !self.settle(ticket) {
            return;
        }
        match result {
            Err(err) => {
                warn!(category = ?err.category(), "dku verification failed: {}", err.message());
                self.notifier.error(err.message());
            }
            Ok(response) => {
                if self.is_stale(ticket) {
                    return;
                }
                if self.session.signup_token.is_none() {
                    self.session.signup_token = Some(response.signup_token);
                }
                info!(student_id = %response.student.student_id, "student verified");
                self.advance_to_terms(ticket.from);
            }
        }
    }

    pub fn complete_reverification(
        &mut self,
        ticket: VerificationTicket,
        result: Result<(), UiError>,
    ) {
        if ticket.mode != Mode::Reverify || !self.settle(ticket) {
            return;
        }
        match result {
            Err(err) => {
                warn!(category = ?err.category(), "dku reverification failed: {}", err.message());
                self.notifier.error(err.message());
            }
            Ok(()) => {
                if self.is_stale(ticket) {
                    return;
                }
                self.status = FlowStatus::Rerouted;
                self.cancel_focus();
                self.session = VerificationSession::default();
                info!("student reverified, routing home");
                self.notifier.success(REVERIFIED_MESSAGE);
                self.navigator.push(HOME_PATH, None);
            }
        }
    }

    /// The sheet's dismiss request. Honoured by stepping back to the
    /// password step; the sheet closes because the funnel moved.
    pub fn on_dismiss(&mut self, request: DismissRequest) -> bool {
        debug!(source = ?request.source, "consent sheet dismiss requested");
        self.leave_terms()
    }

    /// Explicit back navigation, one step at a time.
    pub fn back(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.funnel.current() {
            Some(VerifyStep::Terms) => self.leave_terms(),
            Some(step) if self.funnel.back(step) => {
                self.after_transition();
                true
            }
            _ => false,
        }
    }

    pub fn handle_sheet(&mut self, input: SheetInput) {
        let motion = self.sheet.motion_mut();
        let request = match input {
            SheetInput::PointerDown => {
                motion.pointer_down();
                None
            }
            SheetInput::DragMove(sample) => {
                motion.drag_move(sample);
                None
            }
            SheetInput::Release(sample) => motion.release(sample),
            SheetInput::TouchStart => {
                motion.touch_start();
                None
            }
            SheetInput::TouchEnd => {
                motion.touch_end();
                None
            }
            SheetInput::OverlayClick => motion.overlay_click(),
            SheetInput::EnterComplete => {
                motion.enter_complete();
                None
            }
            SheetInput::ExitComplete => {
                motion.exit_complete();
                None
            }
        };
        if let Some(request) = request {
            self.on_dismiss(request);
        }
    }

    pub fn accept_terms(&mut self) -> bool {
        if !self.is_active() || !self.funnel.is_at(VerifyStep::Terms) {
            return false;
        }
        let Some(token) = self.session.signup_token.take() else {
            warn!("terms accepted without a signup token");
            return false;
        };
        self.funnel.finish(VerifyStep::Terms);
        self.status = FlowStatus::Completed;
        self.after_transition();
        self.session = VerificationSession::default();

        let path = phone_signup_path(&self.locale);
        info!(%path, "terms accepted, handing off to phone signup");
        self.navigator.push(&path, Some(&token));
        true
    }

    /// The page went away mid-flow. Drops the session and any pending focus.
    pub fn abandon(&mut self) {
        if !self.is_active() {
            return;
        }
        self.status = FlowStatus::Abandoned;
        self.session = VerificationSession::default();
        self.in_flight = None;
        self.set_loading(false);
        self.sheet.motion_mut().close();
        self.cancel_focus();
        debug!("verification flow abandoned");
    }

    /// Runs deferred work for one paint frame and reports the focused field.
    pub fn run_frame(&mut self) -> Option<Field> {
        for (handle, field) in self.frames.run_frame() {
            if self.pending_focus != Some(handle) {
                continue;
            }
            self.pending_focus = None;
            if self.field_visible(field) {
                debug!(%field, "focusing field");
                self.focused = Some(field);
            }
        }
        self.focused
    }

    pub fn render(&self) -> FlowView<'_> {
        let step = self.funnel.current();
        FlowView {
            step,
            subtitle: step.map(VerifyStep::subtitle),
            field: self.credential_slots().render(&self.funnel),
            loading: self.loading,
            sheet: self.sheet.frame(),
        }
    }

    pub(crate) fn credential_slots(&self) -> StepSlots<'_, VerifyStep, FieldView<'_>> {
        VerifyStep::DISPLAY
            .into_iter()
            .filter_map(|step| step.field().map(|field| (step, field)))
            .fold(StepSlots::new(), |slots, (step, field)| {
                slots.step(step, move || self.field_view(field))
            })
    }

    fn field_view(&self, field: Field) -> FieldView<'_> {
        let (label, placeholder) = match field {
            Field::StudentId => ("Student portal id", "8 digits"),
            Field::Password => ("Student portal password", "8+ characters"),
        };
        FieldView {
            field,
            label,
            placeholder,
            value: self.session.credentials.get(field),
            error: self.field_error(field),
            focused: self.focused == Some(field),
        }
    }

    fn is_active(&self) -> bool {
        self.status == FlowStatus::Active
    }

    fn edit(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::StudentId => &mut self.session.credentials.student_id,
            Field::Password => &mut self.session.credentials.password,
        };
        if slot.as_str() == value {
            return;
        }
        *slot = value.to_string();

        // A token belongs to the credentials that earned it, and so does
        // any answer still in flight.
        self.generation += 1;
        if self.session.signup_token.take().is_some() {
            info!(%field, "credentials changed, discarding earlier verification");
        }

        let (result, error) = match field {
            Field::StudentId => (validate_student_id(value), &mut self.student_id_error),
            Field::Password => (validate_password(value), &mut self.password_error),
        };
        *error = result.err();
    }

    fn begin_verification(&mut self, from: VerifyStep) -> Option<BackendCommand> {
        if self.loading {
            debug!("verification already in flight, ignoring submit");
            return None;
        }
        let request = match self.session.credentials.validate() {
            Ok(request) => request,
            Err(errors) => {
                debug!(count = errors.len(), "credential form rejected locally");
                for err in errors {
                    match err.field() {
                        Field::StudentId => self.student_id_error = Some(err),
                        Field::Password => self.password_error = Some(err),
                    }
                }
                return None;
            }
        };
        self.student_id_error = None;
        self.password_error = None;

        if self.mode == Mode::Verify && self.session.signup_token.is_some() {
            debug!("credentials already verified in this session");
            self.advance_to_terms(from);
            return None;
        }

        let ticket = VerificationTicket {
            generation: self.generation,
            from,
            mode: self.mode,
        };
        self.in_flight = Some(ticket);
        self.set_loading(true);
        info!(?from, mode = ?self.mode, "submitting student verification");
        Some(match self.mode {
            Mode::Verify => BackendCommand::Verify { ticket, request },
            Mode::Reverify => BackendCommand::Reverify { ticket, request },
        })
    }

    /// Clears the in-flight marker. `false` for results the flow never
    /// asked for or no longer cares about.
    fn settle(&mut self, ticket: VerificationTicket) -> bool {
        if self.in_flight != Some(ticket) {
            debug!(?ticket, "ignoring result for unknown verification");
            return false;
        }
        self.in_flight = None;
        self.set_loading(false);
        self.is_active()
    }

    fn is_stale(&self, ticket: VerificationTicket) -> bool {
        let stale = ticket.generation != self.generation || !self.funnel.is_at(ticket.from);
        if stale {
            debug!(
                ?ticket,
                generation = self.generation,
                current = ?self.funnel.current(),
                "dropping stale verification result"
            );
        }
        stale
    }

    fn advance_to_terms(&mut self, from: VerifyStep) {
        let mut moved = false;
        if from == VerifyStep::StudentId {
            moved |= self.funnel.next(VerifyStep::StudentId);
        }
        moved |= self.funnel.next(VerifyStep::Password);
        if moved {
            self.after_transition();
        }
    }

    fn leave_terms(&mut self) -> bool {
        if !self.is_active() || !self.funnel.is_at(VerifyStep::Terms) {
            return false;
        }
        if let Err(err) = self.funnel.go_to(VerifyStep::Password) {
            warn!("cannot roll back from terms: {err}");
            return false;
        }
        self.after_transition();
        true
    }

    fn after_transition(&mut self) {
        self.generation += 1;
        self.sync_view();
    }

    fn sync_view(&mut self) {
        let open = self.sheet_should_be_open();
        self.sheet.motion_mut().set_open(open);
        self.cancel_focus();
        if self.funnel.is_at(VerifyStep::Password) {
            self.pending_focus = Some(self.frames.request(Field::Password));
        }
    }

    fn cancel_focus(&mut self) {
        if let Some(handle) = self.pending_focus.take() {
            self.frames.cancel(handle);
        }
        self.focused = None;
    }

    fn field_visible(&self, field: Field) -> bool {
        self.funnel.current().and_then(VerifyStep::field) == Some(field)
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.sheet.content_mut().confirm_loading = loading;
    }
}
