//! Frame type and pixel conversion — YUYV/GREY to RGB, dark detection.

/// A captured RGB camera frame.
#[derive(Clone)]
pub struct Frame {
    /// Packed RGB8 pixel data (width * height * 3 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: std::time::Instant,
    pub sequence: u32,
    pub is_dark: bool,
}

impl Frame {
    /// Build a frame from packed RGB8 data, computing the dark flag.
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32, sequence: u32) -> Result<Self, FrameError> {
        let expected = pixel_count(width, height) * 3;
        if data.len() != expected {
            return Err(FrameError::InvalidLength {
                expected,
                actual: data.len(),
            });
        }
        let is_dark = is_dark_frame(&data, 0.95);
        Ok(Self {
            data,
            width,
            height,
            timestamp: std::time::Instant::now(),
            sequence,
            is_dark,
        })
    }

    /// Average luma (0.0–255.0).
    pub fn avg_brightness(&self) -> f32 {
        if self.data.len() < 3 {
            return 0.0;
        }
        let pixels = self.data.len() / 3;
        self.data.chunks_exact(3).map(luma).sum::<f32>() / pixels as f32
    }
}

/// Widen before multiplying; decoded MJPG sizes can exceed `u32` products.
fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// BT.601 luma of one RGB pixel.
fn luma(px: &[u8]) -> f32 {
    0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert packed YUYV (4:2:2) to RGB8.
///
/// YUYV packs two pixels per 4 bytes: [Y0, U, Y1, V]; both pixels share
/// the chroma pair. Uses BT.601 limited-range coefficients.
pub fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Result<Vec<u8>, FrameError> {
    let expected = pixel_count(width, height) * 2;
    if yuyv.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: yuyv.len(),
        });
    }

    let mut rgb = Vec::with_capacity(pixel_count(width, height) * 3);
    for quad in yuyv[..expected].chunks_exact(4) {
        let u = quad[1] as f32 - 128.0;
        let v = quad[3] as f32 - 128.0;
        for y in [quad[0], quad[2]] {
            let c = 1.164 * (y as f32 - 16.0);
            rgb.push(clamp_u8(c + 1.596 * v));
            rgb.push(clamp_u8(c - 0.392 * u - 0.813 * v));
            rgb.push(clamp_u8(c + 2.017 * u));
        }
    }
    Ok(rgb)
}

/// Replicate 8-bit grayscale into RGB8.
pub fn grey_to_rgb(grey: &[u8], width: u32, height: u32) -> Result<Vec<u8>, FrameError> {
    let expected = pixel_count(width, height);
    if grey.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: grey.len(),
        });
    }
    Ok(grey[..expected].iter().flat_map(|&g| [g, g, g]).collect())
}

/// Check if an RGB frame is dark.
///
/// Returns true if more than `threshold_pct` of pixels have luma below 32.
pub fn is_dark_frame(rgb: &[u8], threshold_pct: f32) -> bool {
    let pixels = rgb.len() / 3;
    if pixels == 0 {
        return true;
    }
    let dark_count = rgb.chunks_exact(3).filter(|px| luma(px) < 32.0).count();
    (dark_count as f32 / pixels as f32) > threshold_pct
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_to_rgb_neutral_chroma() {
        // 2x1 image, no chroma: Y=16 is black, Y=235 is white
        let yuyv = vec![16, 128, 235, 128];
        let rgb = yuyv_to_rgb(&yuyv, 2, 1).unwrap();
        assert_eq!(rgb, vec![0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn test_yuyv_to_rgb_red_chroma() {
        // Strong V pushes red up and green down
        let yuyv = vec![128, 128, 128, 240];
        let rgb = yuyv_to_rgb(&yuyv, 2, 1).unwrap();
        assert_eq!(rgb.len(), 6);
        assert!(rgb[0] > 200, "red = {}", rgb[0]);
        assert!(rgb[1] < 80, "green = {}", rgb[1]);
        assert_eq!(&rgb[..3], &rgb[3..]);
    }

    #[test]
    fn test_yuyv_invalid_length() {
        let yuyv = vec![100, 128]; // too short for 2x1
        assert!(yuyv_to_rgb(&yuyv, 2, 1).is_err());
    }

    #[test]
    fn test_grey_to_rgb() {
        let rgb = grey_to_rgb(&[7, 200], 2, 1).unwrap();
        assert_eq!(rgb, vec![7, 7, 7, 200, 200, 200]);
        assert!(grey_to_rgb(&[7], 2, 1).is_err());
    }

    #[test]
    fn test_dark_frame_all_black() {
        assert!(is_dark_frame(&vec![0u8; 300], 0.95));
    }

    #[test]
    fn test_dark_frame_normal() {
        assert!(!is_dark_frame(&vec![128u8; 300], 0.95));
    }

    #[test]
    fn test_dark_frame_empty() {
        assert!(is_dark_frame(&[], 0.95));
    }

    #[test]
    fn test_dark_frame_borderline_bright() {
        // 94% dark, 6% bright → should NOT be dark
        let mut rgb = vec![10u8; 940 * 3];
        rgb.extend(vec![128u8; 60 * 3]);
        assert!(!is_dark_frame(&rgb, 0.95));
    }

    #[test]
    fn test_from_rgb_checks_length() {
        assert!(Frame::from_rgb(vec![0; 11], 2, 2, 0).is_err());
        let frame = Frame::from_rgb(vec![200; 12], 2, 2, 5).unwrap();
        assert!(!frame.is_dark);
        assert!((frame.avg_brightness() - 200.0).abs() < 0.01);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_huge_dimensions_report_length_instead_of_overflowing() {
        match grey_to_rgb(&[0; 4], 65_536, 65_536) {
            Err(FrameError::InvalidLength { expected, actual }) => {
                assert_eq!(expected, 1 << 32);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Frame::from_rgb(vec![0; 3], 40_000, 40_000, 0).is_err());
    }
}
