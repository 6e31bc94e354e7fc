//! Front → side → review capture wizard.

use crate::photo::CapturedImage;
use std::fmt;
use thiserror::Error;

/// Wizard step. `Review` waits for submit or a retake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Front,
    Side,
    Review,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Front => "front view",
            Step::Side => "side profile",
            Step::Review => "review",
        })
    }
}

/// Which of the two photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Front,
    Side,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    #[error("a countdown is already running")]
    CountdownInProgress,
    #[error("no countdown is running")]
    NoCountdown,
    #[error("both photos are taken; retake one or submit")]
    AlreadyComplete,
    #[error("retake is only available in review (currently at {0})")]
    NotInReview(Step),
}

/// The front/side pair handed to the analysis request.
#[derive(Debug, Clone)]
pub struct CapturePair {
    pub front: CapturedImage,
    pub side: CapturedImage,
}

/// Transient capture session: at most two photos and the current step.
///
/// Consumed by [`submit`](Self::submit) or [`cancel`](Self::cancel); the
/// photos never outlive the session.
#[derive(Debug)]
pub struct CaptureWizard {
    step: Step,
    front: Option<CapturedImage>,
    side: Option<CapturedImage>,
    counting_down: bool,
}

impl CaptureWizard {
    pub fn new() -> Self {
        Self {
            step: Step::Front,
            front: None,
            side: None,
            counting_down: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn front(&self) -> Option<&CapturedImage> {
        self.front.as_ref()
    }

    pub fn side(&self) -> Option<&CapturedImage> {
        self.side.as_ref()
    }

    /// Whether `submit` would succeed.
    pub fn is_ready(&self) -> bool {
        self.step == Step::Review && self.front.is_some() && self.side.is_some()
    }

    /// Arm the shutter. Rejected while another countdown runs.
    pub fn begin_countdown(&mut self) -> Result<(), WizardError> {
        if self.step == Step::Review {
            return Err(WizardError::AlreadyComplete);
        }
        if self.counting_down {
            return Err(WizardError::CountdownInProgress);
        }
        self.counting_down = true;
        tracing::debug!(step = %self.step, "countdown started");
        Ok(())
    }

    /// Countdown ended without a picture (camera failure, user abort).
    pub fn abort_countdown(&mut self) {
        if self.counting_down {
            tracing::debug!(step = %self.step, "countdown aborted");
        }
        self.counting_down = false;
    }

    /// Store the shutter image taken at the end of a countdown.
    pub fn finish_countdown(&mut self, image: CapturedImage) -> Result<Step, WizardError> {
        if !self.counting_down {
            return Err(WizardError::NoCountdown);
        }
        self.counting_down = false;
        self.store(image)
    }

    /// Store a selected image file for the current step.
    pub fn select_file(&mut self, image: CapturedImage) -> Result<Step, WizardError> {
        if self.counting_down {
            return Err(WizardError::CountdownInProgress);
        }
        self.store(image)
    }

    fn store(&mut self, image: CapturedImage) -> Result<Step, WizardError> {
        match self.step {
            Step::Front => {
                self.front = Some(image);
                self.step = Step::Side;
            }
            Step::Side => {
                self.side = Some(image);
                self.step = Step::Review;
            }
            Step::Review => return Err(WizardError::AlreadyComplete),
        }
        tracing::debug!(step = %self.step, "photo stored");
        Ok(self.step)
    }

    /// Go back from review.
    ///
    /// Retaking the front discards both photos so the side profile is
    /// redone after it; retaking the side keeps the front.
    pub fn retake(&mut self, view: View) -> Result<Step, WizardError> {
        if self.step != Step::Review {
            return Err(WizardError::NotInReview(self.step));
        }
        match view {
            View::Front => {
                self.front = None;
                self.side = None;
                self.step = Step::Front;
            }
            View::Side => {
                self.side = None;
                self.step = Step::Side;
            }
        }
        tracing::debug!(?view, "retake");
        Ok(self.step)
    }

    /// Hand over both photos, ending the session.
    ///
    /// Returns the wizard unchanged when not in review with both photos.
    pub fn submit(self) -> Result<CapturePair, Self> {
        if !self.is_ready() {
            return Err(self);
        }
        match (self.front, self.side) {
            (Some(front), Some(side)) => Ok(CapturePair { front, side }),
            (front, side) => Err(Self {
                step: self.step,
                front,
                side,
                counting_down: self.counting_down,
            }),
        }
    }

    /// Abort the session, discarding any photos taken.
    pub fn cancel(self) {
        tracing::debug!(
            step = %self.step,
            had_front = self.front.is_some(),
            had_side = self.side.is_some(),
            "capture cancelled"
        );
    }
}

impl Default for CaptureWizard {
    fn default() -> Self {
        Self::new()
    }
}
