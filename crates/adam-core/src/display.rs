//! Display formatting for scores and measurements.

use crate::types::{AnalysisResult, Measurements};

/// How a measurement is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementKind {
    /// Degrees, one decimal, `°` suffix.
    Angle,
    /// Fraction shown as a percentage with one decimal.
    Ratio,
}

/// Label, ideal range and accessor for one measurement.
pub struct MeasurementSpec {
    pub label: &'static str,
    pub ideal: &'static str,
    pub kind: MeasurementKind,
    ideal_min: Option<f64>,
    ideal_max: Option<f64>,
    value: fn(&Measurements) -> Option<f64>,
}

impl MeasurementSpec {
    /// Whether `value` lies inside the ideal range (inclusive).
    pub fn in_ideal_range(&self, value: f64) -> bool {
        self.ideal_min.map_or(true, |lo| value >= lo) && self.ideal_max.map_or(true, |hi| value <= hi)
    }

    pub fn format(&self, value: f64) -> String {
        match self.kind {
            MeasurementKind::Angle => format!("{value:.1}°"),
            MeasurementKind::Ratio => format_percent(value),
        }
    }
}

pub const MEASUREMENT_SPECS: [MeasurementSpec; 7] = [
    MeasurementSpec {
        label: "Canthal Tilt",
        ideal: "+4° to +8°",
        kind: MeasurementKind::Angle,
        ideal_min: Some(4.0),
        ideal_max: Some(8.0),
        value: |m| Some(m.canthal_tilt),
    },
    MeasurementSpec {
        label: "Jaw/Cheekbone Ratio",
        ideal: "75-80%",
        kind: MeasurementKind::Ratio,
        ideal_min: Some(0.75),
        ideal_max: Some(0.80),
        value: |m| Some(m.bigonial_bizygomatic_ratio),
    },
    MeasurementSpec {
        label: "Midface Ratio",
        ideal: "43-44%",
        kind: MeasurementKind::Ratio,
        ideal_min: Some(0.43),
        ideal_max: Some(0.44),
        value: |m| Some(m.midface_ratio),
    },
    MeasurementSpec {
        label: "Gonial Angle",
        ideal: "125-130°",
        kind: MeasurementKind::Angle,
        ideal_min: Some(125.0),
        ideal_max: Some(130.0),
        value: |m| Some(m.gonial_angle),
    },
    MeasurementSpec {
        label: "Nasofrontal Angle",
        ideal: "130-135°",
        kind: MeasurementKind::Angle,
        ideal_min: Some(130.0),
        ideal_max: Some(135.0),
        value: |m| Some(m.nasofrontal_angle),
    },
    MeasurementSpec {
        label: "Symmetry",
        ideal: ">95%",
        kind: MeasurementKind::Ratio,
        ideal_min: Some(0.95),
        ideal_max: None,
        value: |m| Some(m.symmetry_score),
    },
    MeasurementSpec {
        label: "Eye Spacing (IPD/Face)",
        ideal: "42-46%",
        kind: MeasurementKind::Ratio,
        ideal_min: Some(0.42),
        ideal_max: Some(0.46),
        value: |m| m.ipd_face_ratio,
    },
];

/// One rendered line of the measurements table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub label: &'static str,
    pub ideal: &'static str,
    pub value: String,
    pub in_range: bool,
}

/// Rows for every measurement present in `m`, in display order.
pub fn measurement_rows(m: &Measurements) -> Vec<MeasurementRow> {
    MEASUREMENT_SPECS
        .iter()
        .filter_map(|spec| {
            let value = (spec.value)(m)?;
            Some(MeasurementRow {
                label: spec.label,
                ideal: spec.ideal,
                value: spec.format(value),
                in_range: spec.in_ideal_range(value),
            })
        })
        .collect()
}

/// Score to one decimal place.
pub fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Facial thirds labelled upper/middle/lower.
pub fn facial_thirds(m: &Measurements) -> [(&'static str, String); 3] {
    let [upper, middle, lower] = m.facial_thirds;
    [
        ("Upper", format_percent(upper)),
        ("Middle", format_percent(middle)),
        ("Lower", format_percent(lower)),
    ]
}

/// Fixed-width bar for a 0–10 value, e.g. `███████▌  `.
pub fn score_bar(score: f64, width: usize) -> String {
    let clamped = score.clamp(0.0, 10.0);
    let cells = clamped / 10.0 * width as f64;
    let full = cells.floor() as usize;
    let half = cells - full as f64 >= 0.5;
    let mut bar = "█".repeat(full);
    if half && full < width {
        bar.push('▌');
    }
    let used = full + usize::from(half && full < width);
    bar.push_str(&" ".repeat(width - used));
    bar
}

/// An aesthetics term with a short explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlossaryEntry {
    /// The term as it appears in analysis text.
    pub term: &'static str,
    /// Full name when `term` is an abbreviation.
    pub name: &'static str,
    pub explanation: &'static str,
}

const fn entry(term: &'static str, name: &'static str, explanation: &'static str) -> GlossaryEntry {
    GlossaryEntry { term, name, explanation }
}

pub static GLOSSARY: [GlossaryEntry; 14] = [
    entry(
        "Canthal Tilt",
        "Canthal Tilt",
        "Angle from the inner to the outer corner of the eye. A positive tilt gives \
         the \"hunter eyes\" look. Ideal: +4° to +8°.",
    ),
    entry(
        "Gonial Angle",
        "Gonial Angle",
        "Angle of the lower jaw at its corner. Smaller angles (125-130°) read as a \
         squarer, stronger jaw.",
    ),
    entry(
        "Bigonial",
        "Bigonial Width",
        "Distance between the two jaw angles. Around 75-80% of cheekbone width looks balanced.",
    ),
    entry(
        "Bizygomatic",
        "Bizygomatic Width",
        "Distance between the cheekbones. High, wide cheekbones mark an attractive face.",
    ),
    entry(
        "Midface Ratio",
        "Midface Ratio",
        "Height from the eyes to the lips over total face height. Ideal: 43-44%.",
    ),
    entry(
        "Nasofrontal Angle",
        "Nasofrontal Angle",
        "Angle between forehead and nasal bridge at the nasion. Ideal: 130-135°.",
    ),
    entry(
        "Facial Thirds",
        "Facial Thirds",
        "Forehead, midface and lower face heights. Ideally each is a third (33.3%).",
    ),
    entry(
        "IPD",
        "Inter-Pupillary Distance",
        "Distance between the pupils; affects overall balance.",
    ),
    entry(
        "Hunter Eyes",
        "Hunter Eyes",
        "Upturned outer eye corners giving a sharp, intense gaze. The opposite of prey eyes.",
    ),
    entry(
        "Mewing",
        "Mewing",
        "Resting the tongue flat against the palate to improve jaw and face structure over time.",
    ),
    entry("Halo", "Halo", "A standout positive feature that masks weaker ones. Opposite of failo."),
    entry("Failo", "Failo", "A negative feature that drags down overall appearance. Opposite of halo."),
    entry(
        "Softmaxxing",
        "Softmaxxing",
        "Non-surgical improvement: skincare, hair, fitness, clothing, grooming.",
    ),
    entry(
        "Hardmaxxing",
        "Hardmaxxing",
        "Surgical or medical procedures: rhinoplasty, fillers, botox, jaw surgery.",
    ),
];

/// Glossary entry for `term`, matched case-insensitively against the term
/// or its full name.
pub fn lookup_term(term: &str) -> Option<&'static GlossaryEntry> {
    let term = term.trim();
    GLOSSARY
        .iter()
        .find(|e| e.term.eq_ignore_ascii_case(term) || e.name.eq_ignore_ascii_case(term))
}

/// Whether `needle` occurs in `haystack` as a whole word. Both lowercase.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Glossary entries mentioned anywhere in the result's prose, in glossary order.
pub fn terms_in(result: &AnalysisResult) -> Vec<&'static GlossaryEntry> {
    let text = [result.analysis.as_str(), result.advice.as_str()]
        .into_iter()
        .chain(result.strengths.iter().map(String::as_str))
        .chain(result.weaknesses.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    GLOSSARY
        .iter()
        .filter(|e| contains_word(&text, &e.term.to_lowercase()))
        .collect()
}

/// First `max_chars` characters of `text`, with `…` when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;

    #[test]
    fn test_format_score_one_decimal() {
        assert_eq!(format_score(7.5), "7.5");
        assert_eq!(format_score(8.0), "8.0");
        assert_eq!(format_score(6.44), "6.4");
        assert_eq!(format_score(6.46), "6.5");
    }

    #[test]
    fn test_measurement_rows_for_mock() {
        let rows = measurement_rows(&mock::mock_measurements());
        // ipd_face_ratio is absent in the mock payload
        assert_eq!(rows.len(), 6);

        assert_eq!(rows[0].label, "Canthal Tilt");
        assert_eq!(rows[0].value, "5.2°");
        assert!(rows[0].in_range);

        assert_eq!(rows[1].value, "77.0%");
        assert!(rows[1].in_range);

        assert_eq!(rows[2].label, "Midface Ratio");
        assert_eq!(rows[2].value, "46.0%");
        assert!(!rows[2].in_range);

        assert_eq!(rows[4].value, "136.5°");
        assert!(!rows[4].in_range);

        assert_eq!(rows[5].value, "92.0%");
        assert!(!rows[5].in_range);
    }

    #[test]
    fn test_optional_ipd_row() {
        let mut m = mock::mock_measurements();
        m.ipd_face_ratio = Some(0.44);
        let rows = measurement_rows(&m);
        let last = rows.last().unwrap();
        assert_eq!(last.value, "44.0%");
        assert!(last.in_range);
    }

    #[test]
    fn test_facial_thirds_percentages() {
        let thirds = facial_thirds(&mock::mock_measurements());
        assert_eq!(thirds[0], ("Upper", "32.0%".to_string()));
        assert_eq!(thirds[1].1, "35.0%");
        assert_eq!(thirds[2].1, "33.0%");
    }

    #[test]
    fn test_score_bar_width() {
        assert_eq!(score_bar(10.0, 10), "██████████");
        assert_eq!(score_bar(0.0, 4), "    ");
        assert_eq!(score_bar(7.5, 10), "███████▌  ");
        assert_eq!(score_bar(12.0, 5).chars().count(), 5);
        assert_eq!(score_bar(-3.0, 5), "     ");
    }

    #[test]
    fn test_terms_in_mock_analysis() {
        let terms: Vec<&str> = terms_in(&mock::mock_analysis()).iter().map(|e| e.term).collect();
        assert_eq!(
            terms,
            ["Canthal Tilt", "Gonial Angle", "Midface Ratio", "Nasofrontal Angle", "Facial Thirds", "Hunter Eyes", "Mewing"]
        );
    }

    #[test]
    fn test_terms_match_whole_words_only() {
        let mut result = mock::mock_analysis();
        result.analysis = "Halogen lighting; no failo here.".into();
        result.advice = "Try softmaxxing.".into();
        result.strengths.clear();
        result.weaknesses.clear();
        let terms: Vec<&str> = terms_in(&result).iter().map(|e| e.term).collect();
        assert_eq!(terms, ["Failo", "Softmaxxing"]);
    }

    #[test]
    fn test_lookup_term() {
        assert_eq!(lookup_term(" ipd ").unwrap().name, "Inter-Pupillary Distance");
        assert_eq!(lookup_term("bigonial width").unwrap().term, "Bigonial");
        assert!(lookup_term("cheekbones").is_none());
    }

    #[test]
    fn test_excerpt_cuts_on_char_boundary() {
        assert_eq!(excerpt("short", 300), "short");
        assert_eq!(excerpt("tilt +5.2° is fine", 10), "tilt +5.2°…");
        assert_eq!(excerpt("abc", 3), "abc");
    }
}
