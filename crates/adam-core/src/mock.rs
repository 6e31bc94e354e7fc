//! Canned payloads shown when the scoring service is unreachable or in demo mode.

use crate::tier::Tier;
use crate::types::{AnalysisResult, CompareResult, Measurements, ModelResult, RadarData};
use indexmap::IndexMap;

pub const MOCK_SCORE: f64 = 7.5;
pub const MOCK_TIER: Tier = Tier::Chadlite;

/// Per-model scores and latencies of the canned comparison, in wire order.
const MOCK_MODEL_RUNS: [(&str, f64, f64); 4] = [
    ("gemini-2.0-flash", 7.3, 1.2),
    ("gemini-1.5-flash", 7.4, 1.8),
    ("gemini-1.5-pro", 7.5, 3.5),
    ("gemini-2.0-pro-exp", 7.6, 4.2),
];

pub fn mock_measurements() -> Measurements {
    Measurements {
        canthal_tilt: 5.2,
        bigonial_bizygomatic_ratio: 0.77,
        midface_ratio: 0.46,
        gonial_angle: 127.3,
        nasofrontal_angle: 136.5,
        facial_thirds: [0.32, 0.35, 0.33],
        symmetry_score: 0.92,
        ipd_face_ratio: None,
    }
}

pub fn mock_analysis() -> AnalysisResult {
    AnalysisResult {
        score: MOCK_SCORE,
        tier: MOCK_TIER,
        analysis: "Your facial structure demonstrates several positive aesthetic qualities. \
            The positive canthal tilt (+5.2°) creates an attractive \"hunter eyes\" appearance, \
            while the well-defined gonial angle (127°) indicates good jaw development. The facial \
            thirds are reasonably balanced, though the midface is slightly elongated at 46%."
            .to_string(),
        strengths: vec![
            "Positive canthal tilt (+5.2°) creating hunter eye appearance".to_string(),
            "Well-defined gonial angle (127°) showing strong jaw".to_string(),
            "Good facial symmetry (92%)".to_string(),
            "Balanced jaw-to-cheekbone ratio (77%)".to_string(),
        ],
        weaknesses: vec![
            "Slightly elongated midface ratio (46% vs ideal 43-44%)".to_string(),
            "Nasofrontal angle slightly above ideal range".to_string(),
        ],
        advice: "To further enhance your appearance, consider maintaining low body fat to \
            maximize facial definition. Mewing exercises can help improve tongue posture for \
            better facial development over time. Your strong features are already well-developed."
            .to_string(),
        radar_data: RadarData {
            eyes: 8.5,
            jaw: 7.5,
            midface: 6.8,
            symmetry: 8.2,
            harmony: 7.5,
        },
        measurements: mock_measurements(),
    }
}

pub fn mock_comparison() -> CompareResult {
    let model_results: IndexMap<String, ModelResult> = MOCK_MODEL_RUNS
        .iter()
        .map(|&(id, score, secs)| {
            let result = ModelResult {
                success: true,
                data: Some(AnalysisResult {
                    score,
                    ..mock_analysis()
                }),
                time_seconds: Some(secs),
                error: None,
                raw_response: None,
            };
            (id.to_string(), result)
        })
        .collect();

    CompareResult {
        measurements: mock_measurements(),
        model_results,
    }
}
