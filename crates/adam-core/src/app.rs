//! Application state machine: home → capture → waiting → results.
//!
//! Each capture session carries a token. A request submitted from that
//! session is answered through a [`Ticket`] bound to the token, so a response
//! that arrives after the user reset or restarted is recognised as stale and
//! dropped instead of overwriting the newer session.

use crate::mock;
use crate::types::{AnalysisResult, CompareResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("unknown theme: {0} (expected dark or light)")]
    UnknownTheme(String),
}

/// What the captured photos will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Single analysis with the configured model.
    Analyze,
    /// One request fanned out to every backend model.
    Compare,
}

/// Where a displayed result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Returned by the scoring service.
    Live,
    /// Canned data substituted after a failed request.
    Fallback,
    /// Canned data requested explicitly.
    Demo,
}

/// Colour scheme used by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(AppError::UnknownTheme(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        })
    }
}

/// A finished request, ready to be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Analysis {
        result: AnalysisResult,
        source: ResultSource,
    },
    Comparison {
        result: CompareResult,
        source: ResultSource,
    },
}

impl Outcome {
    pub fn source(&self) -> ResultSource {
        match self {
            Outcome::Analysis { source, .. } | Outcome::Comparison { source, .. } => *source,
        }
    }

    fn mode(&self) -> CaptureMode {
        match self {
            Outcome::Analysis { .. } => CaptureMode::Analyze,
            Outcome::Comparison { .. } => CaptureMode::Compare,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Home,
    Capturing(CaptureMode),
    Analyzing,
    Comparing,
    Results {
        result: AnalysisResult,
        source: ResultSource,
    },
    CompareResults {
        result: CompareResult,
        source: ResultSource,
    },
}

impl AppState {
    pub fn name(&self) -> &'static str {
        match self {
            AppState::Home => "home",
            AppState::Capturing(CaptureMode::Analyze) => "capturing",
            AppState::Capturing(CaptureMode::Compare) => "capturing for comparison",
            AppState::Analyzing => "analyzing",
            AppState::Comparing => "comparing",
            AppState::Results { .. } => "showing results",
            AppState::CompareResults { .. } => "showing comparison",
        }
    }

    fn waiting_for(&self) -> Option<CaptureMode> {
        match self {
            AppState::Analyzing => Some(CaptureMode::Analyze),
            AppState::Comparing => Some(CaptureMode::Compare),
            _ => None,
        }
    }
}

/// Claim on the response to one submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    token: Uuid,
    mode: CaptureMode,
}

impl Ticket {
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }
}

/// Top-level client state.
#[derive(Debug)]
pub struct App {
    state: AppState,
    token: Uuid,
    theme: Theme,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            state: AppState::Home,
            token: Uuid::new_v4(),
            theme,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The only way the theme changes.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            tracing::debug!(from = %self.theme, to = %theme, "theme changed");
        }
        self.theme = theme;
    }

    fn invalid(&self, action: &'static str) -> AppError {
        AppError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Enter the capture flow from the home screen.
    pub fn begin_capture(&mut self, mode: CaptureMode) -> Result<(), AppError> {
        if self.state != AppState::Home {
            return Err(self.invalid("begin capture"));
        }
        self.token = Uuid::new_v4();
        self.state = AppState::Capturing(mode);
        tracing::debug!(?mode, session = %self.token, "capture started");
        Ok(())
    }

    /// Abort the capture flow, back to home.
    pub fn cancel_capture(&mut self) -> Result<(), AppError> {
        if !matches!(self.state, AppState::Capturing(_)) {
            return Err(self.invalid("cancel capture"));
        }
        self.reset();
        Ok(())
    }

    /// Hand the captured photos off; the app waits for the matching response.
    pub fn submit(&mut self) -> Result<Ticket, AppError> {
        let AppState::Capturing(mode) = self.state else {
            return Err(self.invalid("submit"));
        };
        self.state = match mode {
            CaptureMode::Analyze => AppState::Analyzing,
            CaptureMode::Compare => AppState::Comparing,
        };
        tracing::debug!(?mode, session = %self.token, "request submitted");
        Ok(Ticket {
            token: self.token,
            mode,
        })
    }

    /// Apply a response. Returns `false` when it was stale and discarded.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Outcome) -> bool {
        if ticket.token != self.token {
            tracing::debug!(stale = %ticket.token, current = %self.token, "discarding stale response");
            return false;
        }
        if self.state.waiting_for() != Some(ticket.mode) || outcome.mode() != ticket.mode {
            tracing::warn!(
                state = self.state.name(),
                ticket = ?ticket.mode,
                outcome = ?outcome.mode(),
                "response does not match pending request; discarding"
            );
            return false;
        }
        self.state = match outcome {
            Outcome::Analysis { result, source } => AppState::Results { result, source },
            Outcome::Comparison { result, source } => AppState::CompareResults { result, source },
        };
        true
    }

    /// Show the canned payload for `mode` without capturing anything.
    pub fn show_demo(&mut self, mode: CaptureMode) -> Result<(), AppError> {
        if self.state != AppState::Home {
            return Err(self.invalid("start demo"));
        }
        self.state = match mode {
            CaptureMode::Analyze => AppState::Results {
                result: mock::mock_analysis(),
                source: ResultSource::Demo,
            },
            CaptureMode::Compare => AppState::CompareResults {
                result: mock::mock_comparison(),
                source: ResultSource::Demo,
            },
        };
        Ok(())
    }

    /// Drop everything and return home. Pending tickets become stale.
    pub fn reset(&mut self) {
        self.token = Uuid::new_v4();
        self.state = AppState::Home;
        tracing::debug!(session = %self.token, "session reset");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
