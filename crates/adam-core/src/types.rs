use crate::tier::Tier;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Five-axis score vector used for the radar chart (each axis 0–10).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarData {
    pub eyes: f64,
    pub jaw: f64,
    pub midface: f64,
    pub symmetry: f64,
    pub harmony: f64,
}

impl RadarData {
    /// Axis labels paired with their scores, in chart order.
    pub fn axes(&self) -> [(&'static str, f64); 5] {
        [
            ("Eyes", self.eyes),
            ("Jaw", self.jaw),
            ("Midface", self.midface),
            ("Symmetry", self.symmetry),
            ("Harmony", self.harmony),
        ]
    }
}

/// Geometric ratios and angles computed by the service from facial landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Degrees; positive when the outer canthus sits above the inner one.
    pub canthal_tilt: f64,
    /// Jaw width over cheekbone width, 0.0–1.0.
    pub bigonial_bizygomatic_ratio: f64,
    /// Midface height over face height, 0.0–1.0.
    pub midface_ratio: f64,
    pub gonial_angle: f64,
    pub nasofrontal_angle: f64,
    /// Upper, middle and lower face proportions; sums to roughly 1.0.
    pub facial_thirds: [f64; 3],
    /// 1.0 = perfect bilateral symmetry.
    pub symmetry_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipd_face_ratio: Option<f64>,
}

/// Complete analysis for one photo pair, as produced by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: f64,
    pub tier: Tier,
    pub analysis: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub advice: String,
    pub radar_data: RadarData,
    pub measurements: Measurements,
}

/// Outcome of one backend model inside a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// First few hundred bytes of an unparseable model reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl ModelResult {
    /// Score of a usable result.
    ///
    /// A result counts as successful only when the flag is set and the
    /// analysis payload is present.
    pub fn score(&self) -> Option<f64> {
        if self.success {
            self.data.as_ref().map(|d| d.score)
        } else {
            None
        }
    }

    pub fn is_success(&self) -> bool {
        self.score().is_some()
    }
}

/// Per-model outcomes of a comparison run plus the measurements they share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResult {
    pub measurements: Measurements,
    /// Keyed by model id, in the order the service returned them.
    pub model_results: IndexMap<String, ModelResult>,
}

impl CompareResult {
    /// Point every model's embedded measurements at the shared record.
    ///
    /// Measurements are computed once per comparison run, so any per-model
    /// copy that drifted is overwritten. Returns how many copies differed.
    pub fn share_measurements(&mut self) -> usize {
        let mut rewritten = 0;
        for (id, result) in self.model_results.iter_mut() {
            let Some(data) = result.data.as_mut() else {
                continue;
            };
            if data.measurements != self.measurements {
                tracing::warn!(model = %id, "model measurements differ from shared record; replacing");
                data.measurements = self.measurements.clone();
                rewritten += 1;
            }
        }
        rewritten
    }
}
