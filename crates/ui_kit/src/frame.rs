//! One-frame deferred callbacks with explicit cancellation.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Queue of payloads to deliver on the next paint frame.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    next_handle: u64,
    pending: Vec<(FrameHandle, T)>,
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            pending: Vec::new(),
        }
    }

    pub fn request(&mut self, payload: T) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push((handle, payload));
        handle
    }

    /// Returns `false` if the request already ran or was cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| *pending != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == handle)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drains everything requested before this frame, in request order.
    pub fn run_frame(&mut self) -> Vec<(FrameHandle, T)> {
        std::mem::take(&mut self.pending)
    }
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
