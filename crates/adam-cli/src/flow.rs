//! Ties capture, requests and rendering to the application state machine.

use crate::engine::EngineHandle;
use crate::render::{self, Palette};
use crate::session::{parse_command, CaptureSession, Command, SessionEnd};
use adam_capture::{CapturePair, Countdown};
use adam_client::{analyze_or_mock, compare_or_mock, ScoringService};
use adam_core::{App, CaptureMode, Outcome, Ticket};
use anyhow::Result;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Json,
    Styled { color: bool },
}

pub fn show(out: &mut impl Write, app: &App, output: Output) -> std::io::Result<()> {
    match output {
        Output::Json => render::state_json(out, app.state()),
        Output::Styled { color } => render::state(out, app.state(), &Palette::new(app.theme(), color)),
    }
}

/// Submit one request outside the interactive loop and apply its answer.
pub async fn run_once<F>(app: &mut App, mode: CaptureMode, request: F) -> Result<()>
where
    F: Future<Output = Outcome>,
{
    app.begin_capture(mode)?;
    let ticket = app.submit()?;
    let outcome = request.await;
    app.resolve(ticket, outcome);
    Ok(())
}

/// Interactive capture → request → results loop.
pub struct Interactive {
    app: App,
    service: Arc<dyn ScoringService>,
    camera: Option<EngineHandle>,
    model: String,
    countdown: Countdown,
    output: Output,
    results_tx: mpsc::Sender<(Ticket, Outcome)>,
    results_rx: mpsc::Receiver<(Ticket, Outcome)>,
}

enum AfterResults {
    Again,
    Quit,
}

impl Interactive {
    pub fn new(
        app: App,
        service: Arc<dyn ScoringService>,
        camera: Option<EngineHandle>,
        model: String,
        countdown: Countdown,
        output: Output,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::channel(4);
        Self {
            app,
            service,
            camera,
            model,
            countdown,
            output,
            results_tx,
            results_rx,
        }
    }

    #[cfg(test)]
    pub fn app(&self) -> &App {
        &self.app
    }

    pub async fn run<R: AsyncBufRead + Unpin>(
        &mut self,
        mode: CaptureMode,
        input: &mut Lines<R>,
        out: &mut impl Write,
    ) -> Result<()> {
        let mut input_open = true;
        loop {
            self.app.begin_capture(mode)?;
            let end = if input_open {
                CaptureSession::new(input, self.camera.clone(), self.countdown)
                    .run()
                    .await?
            } else {
                SessionEnd::Cancelled
            };
            let pair = match end {
                SessionEnd::Submitted(pair) => pair,
                SessionEnd::Cancelled => {
                    self.app.cancel_capture()?;
                    return Ok(());
                }
            };

            let ticket = self.app.submit()?;
            self.dispatch(ticket, pair);
            eprintln!("Analyzing… (`x` to abandon)");

            if !self.await_result(input, &mut input_open).await? {
                eprintln!("Abandoned; starting over.");
                continue;
            }
            show(out, &self.app, self.output)?;

            match self.after_results(input, out, &mut input_open).await? {
                AfterResults::Again => self.app.reset(),
                AfterResults::Quit => return Ok(()),
            }
        }
    }

    /// Fire the request on its own task. It runs to completion even if the
    /// user moves on; its answer then arrives with a stale ticket.
    fn dispatch(&self, ticket: Ticket, pair: CapturePair) {
        let service = Arc::clone(&self.service);
        let tx = self.results_tx.clone();
        let model = self.model.clone();
        tokio::spawn(async move {
            let outcome = match ticket.mode() {
                CaptureMode::Analyze => {
                    analyze_or_mock(service.as_ref(), &pair.front, &pair.side, &model).await
                }
                CaptureMode::Compare => {
                    compare_or_mock(service.as_ref(), &pair.front, Some(&pair.side)).await
                }
            };
            let _ = tx.send((ticket, outcome)).await;
        });
    }

    /// Wait for the pending answer. Returns `false` if the user abandoned it.
    async fn await_result<R: AsyncBufRead + Unpin>(
        &mut self,
        input: &mut Lines<R>,
        input_open: &mut bool,
    ) -> Result<bool> {
        loop {
            tokio::select! {
                Some((ticket, outcome)) = self.results_rx.recv() => {
                    if self.app.resolve(ticket, outcome) {
                        return Ok(true);
                    }
                }
                line = input.next_line(), if *input_open => {
                    match line?.as_deref().map(parse_command) {
                        None => *input_open = false,
                        Some(Command::Quit) => {
                            self.app.reset();
                            return Ok(false);
                        }
                        Some(_) => eprintln!("Still analyzing… (`x` to abandon)"),
                    }
                }
            }
        }
    }

    async fn after_results<R: AsyncBufRead + Unpin>(
        &mut self,
        input: &mut Lines<R>,
        out: &mut impl Write,
        input_open: &mut bool,
    ) -> Result<AfterResults> {
        loop {
            if !*input_open {
                return Ok(AfterResults::Quit);
            }
            eprintln!("Enter for a new capture, `t` to switch theme, `q` to quit.");
            let Some(line) = input.next_line().await? else {
                *input_open = false;
                continue;
            };
            match line.trim() {
                "" => return Ok(AfterResults::Again),
                "t" | "theme" => {
                    self.app.set_theme(self.app.theme().toggled());
                    show(out, &self.app, self.output)?;
                }
                "q" | "quit" => return Ok(AfterResults::Quit),
                other => eprintln!("Unknown command: {other:?}"),
            }
        }
    }
}
