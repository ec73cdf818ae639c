//! Facial geometry metrics
//!
//! Pure functions deriving the eye aspect ratio (EAR) and mouth aspect ratio
//! (MAR) from landmark points. Lower EAR means a more closed eye; higher MAR
//! means a more open mouth.

use crate::types::{FacialLandmarks, FrameMetrics, Point};

/// Horizontal baselines shorter than this yield a 0.0 ratio instead of
/// dividing by a near-zero width
const MIN_BASELINE: f64 = 0.1;

/// Eye aspect ratio over a 6-point eye contour:
/// (‖p1−p5‖ + ‖p2−p4‖) / (2·‖p0−p3‖)
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> f64 {
    let a = eye[1].distance(&eye[5]);
    let b = eye[2].distance(&eye[4]);
    let c = eye[0].distance(&eye[3]);

    if c < MIN_BASELINE {
        return 0.0;
    }
    (a + b) / (2.0 * c)
}

/// Mouth aspect ratio: two vertical lip distances (outer pair 51/57, inner
/// pair 62/66) over the mouth width (corners 48/54)
pub fn mouth_aspect_ratio(landmarks: &FacialLandmarks) -> f64 {
    let h1 = landmarks.point(51).distance(&landmarks.point(57));
    let h2 = landmarks.point(62).distance(&landmarks.point(66));
    let w = landmarks.point(48).distance(&landmarks.point(54));

    if w < MIN_BASELINE {
        return 0.0;
    }
    (h1 + h2) / (2.0 * w)
}

/// Derive all per-frame geometry metrics from one landmark set
pub fn frame_metrics(landmarks: &FacialLandmarks) -> FrameMetrics {
    let left_ear = eye_aspect_ratio(&landmarks.left_eye());
    let right_ear = eye_aspect_ratio(&landmarks.right_eye());
    FrameMetrics {
        left_ear,
        right_ear,
        avg_ear: (left_ear + right_ear) / 2.0,
        mar: mouth_aspect_ratio(landmarks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LANDMARK_COUNT;
    use pretty_assertions::assert_eq;

    fn eye(points: [(f64, f64); 6]) -> [Point; 6] {
        points.map(|(x, y)| Point::new(x, y))
    }

    #[test]
    fn test_ear_known_geometry() {
        // width 2.0, both vertical pairs 2 * 0.3 apart: EAR = 1.2 / 4.0
        let e = eye([
            (0.0, 0.0),
            (0.5, 0.3),
            (1.5, 0.3),
            (2.0, 0.0),
            (1.5, -0.3),
            (0.5, -0.3),
        ]);
        assert!((eye_aspect_ratio(&e) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_ear_never_negative() {
        let e = eye([
            (0.0, 0.0),
            (0.2, -0.1),
            (0.8, 0.1),
            (1.0, 0.0),
            (0.8, -0.1),
            (0.2, 0.1),
        ]);
        assert!(eye_aspect_ratio(&e) >= 0.0);
    }

    #[test]
    fn test_ear_degenerate_width_is_zero() {
        // all six points collapsed near one spot: baseline below the guard
        let e = eye([
            (0.0, 0.0),
            (0.01, 0.5),
            (0.02, 0.5),
            (0.05, 0.0),
            (0.02, -0.5),
            (0.01, -0.5),
        ]);
        assert_eq!(eye_aspect_ratio(&e), 0.0);
    }

    #[test]
    fn test_mar_known_geometry() {
        let mut points = vec![Point::default(); LANDMARK_COUNT];
        points[48] = Point::new(0.0, 0.0);
        points[54] = Point::new(2.0, 0.0);
        points[51] = Point::new(1.0, 0.7);
        points[57] = Point::new(1.0, -0.7);
        points[62] = Point::new(1.0, 0.5);
        points[66] = Point::new(1.0, -0.5);
        let lm = FacialLandmarks::new(points).unwrap();
        // (1.4 + 1.0) / (2 * 2.0)
        assert!((mouth_aspect_ratio(&lm) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_mar_degenerate_width_is_zero() {
        let mut points = vec![Point::default(); LANDMARK_COUNT];
        points[51] = Point::new(0.0, 1.0);
        points[57] = Point::new(0.0, -1.0);
        // corners left at the origin: zero width
        let lm = FacialLandmarks::new(points).unwrap();
        assert_eq!(mouth_aspect_ratio(&lm), 0.0);
    }

    #[test]
    fn test_frame_metrics_averages_both_eyes() {
        let mut points = vec![Point::default(); LANDMARK_COUNT];
        // left eye EAR 0.2
        for (offset, p) in eye_points(0.2).into_iter().enumerate() {
            points[36 + offset] = p;
        }
        // right eye EAR 0.4
        for (offset, p) in eye_points(0.4).into_iter().enumerate() {
            points[42 + offset] = p;
        }
        // keep the mouth non-degenerate
        points[48] = Point::new(0.0, 0.0);
        points[54] = Point::new(2.0, 0.0);
        let lm = FacialLandmarks::new(points).unwrap();
        let metrics = frame_metrics(&lm);
        assert!((metrics.avg_ear - 0.3).abs() < 1e-9);
        assert!((metrics.left_ear - 0.2).abs() < 1e-9);
        assert!((metrics.right_ear - 0.4).abs() < 1e-9);
    }

    /// 6-point eye whose EAR equals `ear` exactly (width 2, offsets ±ear)
    fn eye_points(ear: f64) -> [Point; 6] {
        [
            Point::new(0.0, 0.0),
            Point::new(0.5, ear),
            Point::new(1.5, ear),
            Point::new(2.0, 0.0),
            Point::new(1.5, -ear),
            Point::new(0.5, -ear),
        ]
    }
}
