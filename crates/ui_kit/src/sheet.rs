//! Bottom sheet motion state and its drawable frame.
//!
//! The sheet never decides on its own whether it is open. Its owner sets
//! `is_open`; drag-down and overlay clicks only produce a [`DismissRequest`]
//! that the owner may honour or ignore.

use tracing::debug;

use crate::gesture::{DragSample, GesturePolicy, Intent};

/// Fraction of the upward overshoot that follows the pointer.
const DRAG_ELASTIC: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightTier {
    #[default]
    Auto,
    Third,
    TwoThirds,
}

impl HeightTier {
    /// Share of the small viewport height, `None` for content-sized.
    pub fn viewport_fraction(self) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Third => Some(0.33),
            Self::TwoThirds => Some(0.66),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetConfig {
    pub base: HeightTier,
    pub expand_to: Option<HeightTier>,
    pub policy: GesturePolicy,
}

impl SheetConfig {
    pub fn new(base: HeightTier) -> Self {
        Self {
            base,
            expand_to: None,
            policy: GesturePolicy::default(),
        }
    }

    pub fn expand_to(mut self, tier: HeightTier) -> Self {
        self.expand_to = Some(tier);
        self
    }

    pub fn policy(mut self, policy: GesturePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Expansion needs a fixed base tier and somewhere taller to go.
    pub fn can_expand(&self) -> bool {
        self.base != HeightTier::Auto && self.expand_to.is_some()
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new(HeightTier::Auto)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetState {
    pub is_open: bool,
    pub current_height: HeightTier,
    pub dragging: bool,
    pub touching: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Unmounted,
    Entering,
    Visible,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissSource {
    Drag,
    Overlay,
}

#[must_use = "the owner decides whether the sheet actually closes"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissRequest {
    pub source: DismissSource,
}

#[derive(Debug, Clone)]
pub struct SheetMotionController {
    config: SheetConfig,
    state: SheetState,
    presence: Presence,
    live_offset: f64,
}

impl SheetMotionController {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            config,
            state: SheetState {
                is_open: false,
                current_height: config.base,
                dragging: false,
                touching: false,
            },
            presence: Presence::Unmounted,
            live_offset: 0.0,
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Offset the sheet is currently drawn at while a drag is in progress.
    pub fn live_offset(&self) -> f64 {
        self.live_offset
    }

    /// Syncs the owner's `is_open`. Idempotent; only edges change state.
    pub fn set_open(&mut self, open: bool) {
        match (self.state.is_open, open) {
            (false, true) => self.open(),
            (true, false) => self.close(),
            _ => {}
        }
    }

    pub fn open(&mut self) {
        if self.state.is_open {
            return;
        }
        self.state.is_open = true;
        self.state.current_height = self.config.base;
        self.presence = Presence::Entering;
        debug!(height = ?self.config.base, "sheet opened");
    }

    /// Starts the exit phase. The caller is not blocked on the animation.
    pub fn close(&mut self) {
        if !self.state.is_open {
            return;
        }
        self.state.is_open = false;
        self.state.dragging = false;
        self.state.touching = false;
        self.live_offset = 0.0;
        self.presence = Presence::Exiting;
        debug!("sheet closing");
    }

    pub fn expand(&mut self) -> bool {
        if !self.state.is_open || !self.config.can_expand() {
            return false;
        }
        match self.config.expand_to {
            Some(tier) => {
                self.state.current_height = tier;
                debug!(height = ?tier, "sheet expanded");
                true
            }
            None => false,
        }
    }

    pub fn enter_complete(&mut self) {
        if self.presence == Presence::Entering {
            self.presence = Presence::Visible;
        }
    }

    pub fn exit_complete(&mut self) {
        if self.presence == Presence::Exiting {
            self.presence = Presence::Unmounted;
        }
    }

    pub fn pointer_down(&mut self) {
        if !self.state.is_open {
            return;
        }
        self.state.dragging = true;
        self.live_offset = 0.0;
    }

    pub fn drag_move(&mut self, sample: DragSample) {
        if !self.state.dragging {
            return;
        }
        self.live_offset = if sample.offset_y < 0.0 {
            sample.offset_y * DRAG_ELASTIC
        } else {
            sample.offset_y
        };
    }

    pub fn touch_start(&mut self) {
        if self.state.is_open {
            self.state.touching = true;
        }
    }

    pub fn touch_end(&mut self) {
        self.state.touching = false;
    }

    pub fn release(&mut self, sample: DragSample) -> Option<DismissRequest> {
        if !self.state.dragging {
            return None;
        }
        self.state.dragging = false;
        self.live_offset = 0.0;

        let intent = self.config.policy.decide(sample);
        debug!(offset_y = sample.offset_y, ?intent, "sheet drag released");
        match intent {
            Intent::Dismiss => Some(DismissRequest {
                source: DismissSource::Drag,
            }),
            Intent::Expand => {
                self.expand();
                None
            }
            Intent::None => None,
        }
    }

    pub fn overlay_click(&mut self) -> Option<DismissRequest> {
        self.state.is_open.then_some(DismissRequest {
            source: DismissSource::Overlay,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetVariant {
    Visible,
    /// Compressed look while a finger rests on the handle.
    Smaller,
}

#[derive(Debug)]
pub struct SheetFrame<'a, C> {
    pub presence: Presence,
    pub variant: SheetVariant,
    pub height: HeightTier,
    pub offset_y: f64,
    pub scrollable: bool,
    pub overlay_darker: bool,
    pub header: Option<&'a str>,
    pub content: &'a C,
}

/// The interactive surface: motion state plus whatever content it carries.
#[derive(Debug, Clone)]
pub struct BottomSheet<C> {
    motion: SheetMotionController,
    header: Option<String>,
    content: C,
}

impl<C> BottomSheet<C> {
    pub fn new(config: SheetConfig, content: C) -> Self {
        Self {
            motion: SheetMotionController::new(config),
            header: None,
            content,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn motion(&self) -> &SheetMotionController {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut SheetMotionController {
        &mut self.motion
    }

    pub fn is_open(&self) -> bool {
        self.motion.state().is_open
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// What to draw this frame; `None` once the exit animation has finished.
    pub fn frame(&self) -> Option<SheetFrame<'_, C>> {
        let presence = self.motion.presence();
        if presence == Presence::Unmounted {
            return None;
        }
        let state = self.motion.state();
        Some(SheetFrame {
            presence,
            variant: if state.touching {
                SheetVariant::Smaller
            } else {
                SheetVariant::Visible
            },
            height: state.current_height,
            offset_y: self.motion.live_offset(),
            scrollable: self.motion.config().can_expand(),
            overlay_darker: state.dragging,
            header: self.header.as_deref(),
            content: &self.content,
        })
    }
}
