//! Terminal output: result card, comparison table, catalog and health.

use adam_capture::camera::DeviceInfo;
use adam_client::HealthStatus;
use adam_core::catalog::{self, ModelInfo};
use adam_core::display::{self, measurement_rows, GlossaryEntry};
use adam_core::{AnalysisResult, AppState, CompareResult, Measurements, ResultSource, Theme, Tier};
use crossterm::style::{style, Color, Stylize};
use serde_json::json;
use std::io::{self, Write};

const BAR_WIDTH: usize = 20;
/// Characters of each model's analysis shown in the comparison details.
const EXCERPT_CHARS: usize = 300;
/// Strengths and weaknesses listed per model in the comparison details.
const TOP_POINTS: usize = 3;

/// Colours for one theme. With `color` off every helper returns plain text.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    accent: Color,
    heading: Color,
    good: Color,
    bad: Color,
    muted: Color,
    color: bool,
}

impl Palette {
    pub fn new(theme: Theme, color: bool) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::Cyan,
                heading: Color::White,
                good: Color::Green,
                bad: Color::Red,
                muted: Color::DarkGrey,
                color,
            },
            Theme::Light => Self {
                accent: Color::DarkBlue,
                heading: Color::Black,
                good: Color::DarkGreen,
                bad: Color::DarkRed,
                muted: Color::Grey,
                color,
            },
        }
    }

    /// Colour only when stdout is a terminal.
    pub fn for_stdout(theme: Theme) -> Self {
        use std::io::IsTerminal;
        Self::new(theme, io::stdout().is_terminal())
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            style(text).with(self.heading).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn accent(&self, text: &str) -> String {
        self.paint(text, self.accent)
    }

    fn good(&self, text: &str) -> String {
        self.paint(text, self.good)
    }

    fn bad(&self, text: &str) -> String {
        self.paint(text, self.bad)
    }

    fn muted(&self, text: &str) -> String {
        self.paint(text, self.muted)
    }
}

fn banner(out: &mut impl Write, source: ResultSource, p: &Palette) -> io::Result<()> {
    match source {
        ResultSource::Live => Ok(()),
        ResultSource::Fallback => writeln!(
            out,
            "{}\n",
            p.bad("! Scoring service unavailable; showing demo data")
        ),
        ResultSource::Demo => writeln!(out, "{}\n", p.muted("Demo data")),
    }
}

/// Render whatever the app is showing. Non-result states print nothing.
pub fn state(out: &mut impl Write, state: &AppState, p: &Palette) -> io::Result<()> {
    match state {
        AppState::Results { result, source } => analysis(out, result, *source, p),
        AppState::CompareResults { result, source } => comparison(out, result, *source, p),
        _ => Ok(()),
    }
}

/// JSON form of a result state, for `--json`.
pub fn state_json(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    let value = match state {
        AppState::Results { result, source } => json!({ "source": source, "analysis": result }),
        AppState::CompareResults { result, source } => json!({
            "source": source,
            "comparison": result,
            "ranking": result.ranked().iter().map(|r| r.id).collect::<Vec<_>>(),
            "score_spread": result.score_spread(),
        }),
        other => json!({ "state": other.name() }),
    };
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)
}

pub fn analysis(
    out: &mut impl Write,
    result: &AnalysisResult,
    source: ResultSource,
    p: &Palette,
) -> io::Result<()> {
    banner(out, source, p)?;

    writeln!(out, "{}", p.heading("Overview"))?;
    writeln!(
        out,
        "  Score  {}/10  {}",
        p.accent(&display::format_score(result.score)),
        p.muted(&display::score_bar(result.score, BAR_WIDTH))
    )?;
    writeln!(out, "  Tier   {} · {}", p.accent(result.tier.label()), tier_description(result))?;

    writeln!(out, "\n{}", p.heading("Analysis"))?;
    writeln!(out, "  {}", result.analysis)?;

    writeln!(out, "\n{}", p.heading("Strengths"))?;
    for s in &result.strengths {
        writeln!(out, "  {} {s}", p.good("+"))?;
    }
    writeln!(out, "\n{}", p.heading("Weaknesses"))?;
    for w in &result.weaknesses {
        writeln!(out, "  {} {w}", p.bad("-"))?;
    }

    writeln!(out, "\n{}", p.heading("Advice"))?;
    writeln!(out, "  {}", result.advice)?;

    writeln!(out, "\n{}", p.heading("Radar"))?;
    for (axis, score) in result.radar_data.axes() {
        writeln!(
            out,
            "  {axis:<9} {} {}",
            p.accent(&display::score_bar(score, BAR_WIDTH)),
            display::format_score(score)
        )?;
    }

    writeln!(out, "\n{}", p.heading("Measurements"))?;
    measurements(out, &result.measurements, p)?;

    let terms = display::terms_in(result);
    if !terms.is_empty() {
        writeln!(out, "\n{}", p.heading("Terms"))?;
        for entry in terms {
            glossary_entry(out, entry, p)?;
        }
    }
    Ok(())
}

fn measurements(out: &mut impl Write, m: &Measurements, p: &Palette) -> io::Result<()> {
    for row in measurement_rows(m) {
        let mark = if row.in_range { p.good("✓") } else { p.bad("✗") };
        writeln!(
            out,
            "  {mark} {:<24} {:>8}   {}",
            row.label,
            row.value,
            p.muted(&format!("ideal {}", row.ideal))
        )?;
    }
    let thirds: Vec<String> = display::facial_thirds(m)
        .iter()
        .map(|(name, pct)| format!("{name} {pct}"))
        .collect();
    writeln!(out, "  Facial thirds: {}", thirds.join(" · "))
}

fn glossary_entry(out: &mut impl Write, entry: &GlossaryEntry, p: &Palette) -> io::Result<()> {
    let name = if entry.name == entry.term {
        p.accent(entry.term)
    } else {
        format!("{} ({})", p.accent(entry.term), entry.name)
    };
    writeln!(out, "  {name}: {}", entry.explanation)
}

/// The whole glossary, or one entry.
pub fn glossary(out: &mut impl Write, entries: &[&GlossaryEntry], p: &Palette) -> io::Result<()> {
    for entry in entries {
        glossary_entry(out, entry, p)?;
    }
    Ok(())
}

/// The tier the service named, or the band the score falls in when the
/// label was not recognised.
fn tier_description(result: &AnalysisResult) -> &'static str {
    match result.tier {
        Tier::Unrated => Tier::from_score(result.score).description(),
        tier => tier.description(),
    }
}

pub fn comparison(
    out: &mut impl Write,
    result: &CompareResult,
    source: ResultSource,
    p: &Palette,
) -> io::Result<()> {
    banner(out, source, p)?;
    writeln!(
        out,
        "{}  {}",
        p.heading("Model comparison"),
        p.muted(&format!(
            "{}/{} succeeded",
            result.success_count(),
            result.model_results.len()
        ))
    )?;

    let ranked = result.ranked();
    for entry in &ranked {
        let name = catalog::display_name(entry.id);
        let time = entry
            .result
            .time_seconds
            .map(|t| format!("{t:.1}s"))
            .unwrap_or_default();
        match (entry.result.score(), &entry.result.data) {
            (Some(score), Some(data)) => {
                let best = if entry.is_best() { p.good("★ Best") } else { String::new() };
                // Pad before painting so escape codes do not eat column width.
                writeln!(
                    out,
                    "  {}. {name:<30} {}  {} {}  {} {best}",
                    entry.rank + 1,
                    p.accent(&format!("{:>4}", display::format_score(score))),
                    p.accent(&format!("{:<9}", data.tier.label())),
                    p.accent(&display::score_bar(score, BAR_WIDTH)),
                    p.muted(&format!("{time:>6}")),
                )?;
            }
            _ => {
                let reason = entry.result.error.as_deref().unwrap_or("no result");
                writeln!(
                    out,
                    "  {}. {name:<30} {}  {}",
                    entry.rank + 1,
                    p.bad("Failed"),
                    p.muted(reason)
                )?;
            }
        }
    }

    let spread = result
        .score_spread()
        .map(display::format_score)
        .unwrap_or_else(|| "n/a".to_string());
    writeln!(out, "\n  Score spread: {spread}")?;

    writeln!(out, "\n{}", p.heading("Measurements (shared by all models)"))?;
    measurements(out, &result.measurements, p)?;

    for entry in &ranked {
        let Some(data) = entry.result.data.as_ref().filter(|_| entry.result.is_success()) else {
            continue;
        };
        writeln!(
            out,
            "\n{}  {}",
            p.heading(catalog::display_name(entry.id)),
            p.muted(&format!("{}/10 · {}", display::format_score(data.score), data.tier.label()))
        )?;
        writeln!(out, "  {}", display::excerpt(&data.analysis, EXCERPT_CHARS))?;
        for s in data.strengths.iter().take(TOP_POINTS) {
            writeln!(out, "  {} {s}", p.good("+"))?;
        }
        for w in data.weaknesses.iter().take(TOP_POINTS) {
            writeln!(out, "  {} {w}", p.bad("-"))?;
        }
    }
    Ok(())
}

pub fn models(
    out: &mut impl Write,
    models: &[ModelInfo],
    source: ResultSource,
    default_model: &str,
    p: &Palette,
) -> io::Result<()> {
    if source == ResultSource::Fallback {
        writeln!(out, "{}", p.muted("(service unreachable; built-in catalog)"))?;
    }
    for m in models {
        let marker = if m.id == default_model { p.good("*") } else { " ".to_string() };
        writeln!(
            out,
            "{marker} {:<20} {:<30} {:<4} {}",
            m.id,
            m.name,
            m.speed,
            m.quality
        )?;
        if !m.description.is_empty() {
            writeln!(out, "  {}", p.muted(&m.description))?;
        }
    }
    Ok(())
}

pub fn health(out: &mut impl Write, base_url: &str, status: &HealthStatus, p: &Palette) -> io::Result<()> {
    let state = if status.is_healthy() {
        p.good(&status.status)
    } else {
        p.bad(&status.status)
    };
    writeln!(out, "{base_url}: {state} (version {})", status.version)?;
    for (name, svc) in &status.services {
        writeln!(out, "  {name:<12} {svc}")?;
    }
    Ok(())
}

pub fn devices(out: &mut impl Write, devices: &[DeviceInfo]) -> io::Result<()> {
    if devices.is_empty() {
        return writeln!(out, "No V4L2 capture devices found");
    }
    for d in devices {
        writeln!(out, "{:<14} {} ({}, {})", d.path, d.name, d.driver, d.bus)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adam_core::mock;
    use adam_core::ModelResult;

    fn plain() -> Palette {
        Palette::new(Theme::Dark, false)
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_analysis_card_sections() {
        let text = render(|out| analysis(out, &mock::mock_analysis(), ResultSource::Live, &plain()));
        for section in ["Overview", "Analysis", "Strengths", "Weaknesses", "Advice", "Radar", "Measurements"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("Score  7.5/10"));
        assert!(text.contains("Chadlite · Attractive, mostly positive features"));
        assert!(text.contains("✓ Canthal Tilt"));
        assert!(text.contains("✗ Midface Ratio"));
        assert!(text.contains("Upper 32.0%"));
        assert!(text.contains("\nTerms\n"));
        assert!(text.contains("  Mewing: Resting the tongue"));
        assert!(!text.contains("Softmaxxing"));
        assert!(!text.contains("demo data"));
        assert!(!text.contains('\u{1b}'), "no escape codes without colour");
    }

    #[test]
    fn test_live_score_shown_to_one_decimal() {
        let result = AnalysisResult {
            score: 8.26,
            ..mock::mock_analysis()
        };
        let text = render(|out| analysis(out, &result, ResultSource::Live, &plain()));
        assert!(text.contains("8.3/10"));
    }

    #[test]
    fn test_fallback_banner() {
        let text = render(|out| analysis(out, &mock::mock_analysis(), ResultSource::Fallback, &plain()));
        assert!(text.starts_with("! Scoring service unavailable; showing demo data"));
    }

    #[test]
    fn test_colour_emits_escape_codes() {
        let p = Palette::new(Theme::Light, true);
        let text = render(|out| analysis(out, &mock::mock_analysis(), ResultSource::Live, &p));
        assert!(text.contains('\u{1b}'));
    }

    #[test]
    fn test_comparison_table_ranks_and_marks_failures() {
        let mut result = mock::mock_comparison();
        result.model_results.insert(
            "gemini-x".into(),
            ModelResult {
                success: false,
                data: None,
                time_seconds: None,
                error: Some("timeout".into()),
                raw_response: None,
            },
        );
        let text = render(|out| comparison(out, &result, ResultSource::Live, &plain()));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("4/5 succeeded"));
        assert!(lines[1].contains("1. Gemini 2.0 Pro") && lines[1].contains("7.6") && lines[1].contains("★ Best"));
        assert!(lines[1].contains(" Chadlite "));
        assert!(lines[4].contains("4. Gemini 2.0 Flash"));
        assert!(lines[5].contains("5. gemini-x") && lines[5].contains("Failed") && lines[5].contains("timeout"));
        assert!(text.contains("Score spread: 0.3"));

        // Shared measurements once, below the table.
        assert_eq!(text.matches("Measurements (shared by all models)").count(), 1);
        assert_eq!(text.matches("✗ Midface Ratio").count(), 1);

        // One detail block per successful model, in ranked order.
        let pro = text.find("\nGemini 2.0 Pro  7.6/10 · Chadlite\n").expect("pro details");
        let flash = text.find("\nGemini 2.0 Flash  7.3/10 · Chadlite\n").expect("flash details");
        assert!(pro < flash);
        assert!(!text.contains("\ngemini-x  "));

        let details = &text[pro..];
        let excerpt = details.lines().nth(2).unwrap();
        assert!(excerpt.ends_with('…'));
        assert!(excerpt.trim_start().chars().count() <= EXCERPT_CHARS + 1);
        // Only the first three strengths of each model.
        assert_eq!(text.matches("+ Good facial symmetry (92%)").count(), 4);
        assert!(!text.contains("Balanced jaw-to-cheekbone ratio"));
        assert_eq!(text.matches("- Nasofrontal angle slightly above ideal range").count(), 4);
    }

    /// Strip `ESC [ ... m` sequences.
    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_colour_does_not_shift_columns() {
        let result = mock::mock_comparison();
        let plain_text = render(|out| comparison(out, &result, ResultSource::Live, &plain()));
        let coloured = render(|out| comparison(out, &result, ResultSource::Live, &Palette::new(Theme::Dark, true)));
        assert!(coloured.contains('\u{1b}'));
        assert_eq!(strip_ansi(&coloured), plain_text);
    }

    #[test]
    fn test_glossary_lists_full_names() {
        let entries: Vec<_> = display::GLOSSARY.iter().collect();
        let text = render(|out| glossary(out, &entries, &plain()));
        assert_eq!(text.lines().count(), display::GLOSSARY.len());
        assert!(text.contains("  IPD (Inter-Pupillary Distance): Distance between the pupils"));
        assert!(text.contains("  Halo: A standout positive feature"));
    }

    #[test]
    fn test_comparison_all_failed() {
        let mut result = mock::mock_comparison();
        for r in result.model_results.values_mut() {
            r.success = false;
        }
        let text = render(|out| comparison(out, &result, ResultSource::Live, &plain()));
        assert!(!text.contains("Best"));
        assert!(text.contains("Score spread: n/a"));
    }

    #[test]
    fn test_state_json() {
        let state = AppState::CompareResults {
            result: mock::mock_comparison(),
            source: ResultSource::Demo,
        };
        let text = render(|out| state_json(out, &state));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["source"], "demo");
        assert_eq!(value["ranking"][0], "gemini-2.0-pro-exp");
        assert!((value["score_spread"].as_f64().unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_models_marks_default() {
        let text = render(|out| {
            models(out, &catalog::builtin_models(), ResultSource::Fallback, "gemini-1.5-pro", &plain())
        });
        assert!(text.starts_with("(service unreachable"));
        assert!(text.contains("* gemini-1.5-pro"));
        assert!(text.contains("  gemini-2.0-flash"));
    }

    #[test]
    fn test_devices_empty() {
        assert_eq!(render(|out| devices(out, &[])), "No V4L2 capture devices found\n");
    }
}
