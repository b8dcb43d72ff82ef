//! Physical arrival feedback boundary.
//!
//! The core never talks to hardware.  It hands arrival cues to a
//! [`FeedbackDispatcher`] supplied by the host application and treats every
//! call as fire-and-forget: errors are logged and dropped, and never change
//! what the state machine does next.

use crate::FeedbackError;

/// Alternating vibrate/pause durations in milliseconds, starting with a
/// vibrate segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VibrationPattern(pub Vec<u32>);

impl VibrationPattern {
    /// Two short pulses.
    pub fn arrival() -> Self {
        VibrationPattern(vec![200, 100, 200])
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    pub fn total_ms(&self) -> u32 {
        self.0.iter().sum()
    }
}

impl Default for VibrationPattern {
    fn default() -> Self {
        Self::arrival()
    }
}

/// Device-side arrival cues.
///
/// Both methods default to [`FeedbackError::Unsupported`], so a device that
/// can only beep overrides `play_arrival_sound` and nothing else.
///
/// # Example
///
/// ```rust,ignore
/// struct Buzzer { pin: OutputPin }
///
/// impl FeedbackDispatcher for Buzzer {
///     fn play_arrival_sound(&mut self) -> Result<(), FeedbackError> {
///         self.pin.pulse(Duration::from_millis(300));
///         Ok(())
///     }
/// }
/// ```
pub trait FeedbackDispatcher {
    fn vibrate(&mut self, _pattern: &VibrationPattern) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unsupported("vibration"))
    }

    fn play_arrival_sound(&mut self) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unsupported("audio"))
    }
}

impl<F: FeedbackDispatcher + ?Sized> FeedbackDispatcher for &mut F {
    fn vibrate(&mut self, pattern: &VibrationPattern) -> Result<(), FeedbackError> {
        (**self).vibrate(pattern)
    }

    fn play_arrival_sound(&mut self) -> Result<(), FeedbackError> {
        (**self).play_arrival_sound()
    }
}

impl<F: FeedbackDispatcher + ?Sized> FeedbackDispatcher for Box<F> {
    fn vibrate(&mut self, pattern: &VibrationPattern) -> Result<(), FeedbackError> {
        (**self).vibrate(pattern)
    }

    fn play_arrival_sound(&mut self) -> Result<(), FeedbackError> {
        (**self).play_arrival_sound()
    }
}

/// A dispatcher that accepts every cue and does nothing.  Use for headless
/// replays and server-side tracking.
pub struct NoopFeedback;

impl FeedbackDispatcher for NoopFeedback {
    fn vibrate(&mut self, _pattern: &VibrationPattern) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn play_arrival_sound(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Fire both arrival cues, swallowing failures.
pub(crate) fn fire_arrival<F: FeedbackDispatcher + ?Sized>(
    dispatcher: &mut F,
    pattern:    &VibrationPattern,
) {
    if let Err(e) = dispatcher.vibrate(pattern) {
        tracing::warn!(error = %e, "arrival vibration failed");
    }
    if let Err(e) = dispatcher.play_arrival_sound() {
        tracing::warn!(error = %e, "arrival sound failed");
    }
}
