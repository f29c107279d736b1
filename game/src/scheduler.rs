//! Two-stage tick scheduling: a delay sets the step cadence, then a display frame carries the
//! step and its paint.
//!
//! The scheduler owns no clock and no callbacks. The host loop asks for [`FrameScheduler::deadline`]
//! to know when to wake, calls [`FrameScheduler::poll`] when it does, requests an animation frame
//! if that returns true, and hands the frame back through
//! [`FrameScheduler::on_animation_frame`].

use std::time::{Duration, Instant};

/// Token for one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Delay { due: Instant },
    AwaitingFrame,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    issued: u64,
    pending: Option<(ScheduleHandle, Stage)>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a tick `delay` after `now`, cancelling whatever was pending.
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> ScheduleHandle {
        self.cancel();
        self.issued += 1;
        let handle = ScheduleHandle(self.issued);
        self.pending = Some((handle, Stage::Delay { due: now + delay }));
        handle
    }

    pub fn cancel(&mut self) -> Option<ScheduleHandle> {
        self.pending.take().map(|(handle, _)| handle)
    }

    pub fn active(&self) -> Option<ScheduleHandle> {
        self.pending.map(|(handle, _)| handle)
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// How many handles have ever been issued.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// When the host should next call [`poll`](Self::poll). `None` while idle or while waiting
    /// for a frame.
    pub fn deadline(&self) -> Option<Instant> {
        match self.pending {
            Some((_, Stage::Delay { due })) => Some(due),
            _ => None,
        }
    }

    /// Expires the delay stage. Returns true exactly once per tick, when the host must request
    /// an animation frame.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some((_, stage)) = &mut self.pending else {
            return false;
        };
        match *stage {
            Stage::Delay { due } if now >= due => {
                *stage = Stage::AwaitingFrame;
                true
            }
            _ => false,
        }
    }

    /// Consumes the pending tick if it is waiting for a frame. Frames that arrive at any other
    /// time, including after a cancel, yield `None`.
    pub fn on_animation_frame(&mut self) -> Option<ScheduleHandle> {
        match self.pending {
            Some((handle, Stage::AwaitingFrame)) => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }
}
