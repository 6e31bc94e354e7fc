//! Interactive front/side capture driven by line commands.
//!
//! Prompts go to stderr so stdout carries only results.

use crate::engine::EngineHandle;
use adam_capture::{CapturePair, CaptureWizard, CapturedImage, Countdown, Step, View};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, Lines};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Count down and take a camera shot.
    Shutter,
    /// Use an image file for the current step.
    File(PathBuf),
    Retake(View),
    Submit,
    Quit,
    Help,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));
    match (word.to_ascii_lowercase().as_str(), rest) {
        ("" | "c" | "capture", _) => Command::Shutter,
        ("f" | "file", path) if !path.is_empty() => Command::File(PathBuf::from(path)),
        ("r" | "retake", "front" | "f") => Command::Retake(View::Front),
        ("r" | "retake", "side" | "s") => Command::Retake(View::Side),
        ("s" | "submit", "") => Command::Submit,
        ("q" | "quit" | "x" | "cancel", "") => Command::Quit,
        ("h" | "help" | "?", "") => Command::Help,
        _ => Command::Unknown(line.to_string()),
    }
}

/// How a capture session ended.
#[derive(Debug)]
pub enum SessionEnd {
    Submitted(CapturePair),
    Cancelled,
}

/// Walks the wizard from an input stream.
pub struct CaptureSession<'a, R> {
    wizard: CaptureWizard,
    input: &'a mut Lines<R>,
    camera: Option<EngineHandle>,
    countdown: Countdown,
}

impl<'a, R: AsyncBufRead + Unpin> CaptureSession<'a, R> {
    pub fn new(input: &'a mut Lines<R>, camera: Option<EngineHandle>, countdown: Countdown) -> Self {
        Self {
            wizard: CaptureWizard::new(),
            input,
            camera,
            countdown,
        }
    }

    /// Run until the user submits both photos or gives up. End of input
    /// counts as giving up.
    pub async fn run(mut self) -> std::io::Result<SessionEnd> {
        self.prompt();
        loop {
            let Some(line) = self.input.next_line().await? else {
                self.wizard.cancel();
                return Ok(SessionEnd::Cancelled);
            };
            match parse_command(&line) {
                Command::Shutter => self.shoot().await?,
                Command::File(path) => self.select_file(path),
                Command::Retake(view) => {
                    if let Err(e) = self.wizard.retake(view) {
                        eprintln!("{e}");
                    }
                }
                Command::Submit => match self.wizard.submit() {
                    Ok(pair) => return Ok(SessionEnd::Submitted(pair)),
                    Err(wizard) => {
                        eprintln!("Both photos are needed before submitting.");
                        self.wizard = wizard;
                    }
                },
                Command::Quit => {
                    self.wizard.cancel();
                    return Ok(SessionEnd::Cancelled);
                }
                Command::Help => print_help(),
                Command::Unknown(text) => eprintln!("Unknown command: {text:?} (h for help)"),
            }
            self.prompt();
        }
    }

    fn prompt(&self) {
        match self.wizard.step() {
            Step::Front => eprintln!("[1/2] Front view: look straight at the camera. Enter to shoot, `f <path>` for a file."),
            Step::Side => eprintln!("[2/2] Side profile: turn 90°. Enter to shoot, `f <path>` for a file."),
            Step::Review => {
                for (view, image) in [("front", self.wizard.front()), ("side", self.wizard.side())] {
                    if let Some(image) = image {
                        eprintln!("  {view:<5} {} ({} KiB)", image.mime(), image.byte_len().div_ceil(1024));
                    }
                }
                eprintln!("Review: `s` to submit, `r front` / `r side` to retake, `q` to cancel.")
            }
        }
    }

    fn select_file(&mut self, path: PathBuf) {
        let image = match CapturedImage::from_path(&path) {
            Ok(image) => image,
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        };
        if let Err(e) = self.wizard.select_file(image) {
            eprintln!("{e}");
        }
    }

    /// Count down, then take the picture. Input during the countdown can
    /// only abort it; further capture commands are refused.
    async fn shoot(&mut self) -> std::io::Result<()> {
        let Some(camera) = self.camera.clone() else {
            eprintln!("No camera available; use `f <path>` to choose an image file.");
            return Ok(());
        };
        if let Err(e) = self.wizard.begin_countdown() {
            eprintln!("{e}");
            return Ok(());
        }

        let countdown = self.countdown;
        let ticking = countdown.run(|n| eprintln!("  {n}…"));
        tokio::pin!(ticking);
        loop {
            tokio::select! {
                biased;
                _ = &mut ticking => break,
                line = self.input.next_line() => {
                    match line?.map(|l| parse_command(&l)) {
                        None | Some(Command::Quit) => {
                            self.wizard.abort_countdown();
                            eprintln!("Countdown aborted.");
                            return Ok(());
                        }
                        Some(Command::Shutter) => {
                            if let Err(e) = self.wizard.begin_countdown() {
                                eprintln!("{e}");
                            }
                        }
                        Some(Command::File(_)) => eprintln!("{}", adam_capture::WizardError::CountdownInProgress),
                        Some(_) => eprintln!("Wait for the shutter or `q` to abort."),
                    }
                }
            }
        }

        match camera.shoot().await {
            Ok(image) => match self.wizard.finish_countdown(image) {
                Ok(step) => tracing::info!(%step, "photo taken"),
                Err(e) => eprintln!("{e}"),
            },
            Err(e) => {
                self.wizard.abort_countdown();
                tracing::warn!(error = %e, "camera shot failed");
                eprintln!("Capture failed: {e}");
            }
        }
        Ok(())
    }
}

fn print_help() {
    eprintln!(
        "Commands:\n  \
         <Enter> | c        count down and shoot\n  \
         f <path>           use an image file\n  \
         r front | r side   retake (in review)\n  \
         s                  submit both photos\n  \
         q                  cancel"
    );
}
