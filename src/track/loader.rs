//! Control point loading.
//!
//! Track files are plain text with one point per line. Coordinates are
//! separated by whitespace and/or commas; blank lines and `#` comments are
//! ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, TrackError};
use crate::sim::Float3;

/// How the coordinates in a track file map to world positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointEncoding {
    /// Each line is a world position.
    #[default]
    Absolute,
    /// Each line is a delta from the previous point, accumulated from
    /// `origin`; every accumulated point is then multiplied by `scale`.
    Relative { origin: Float3, scale: f32 },
}

impl PointEncoding {
    /// Authoring convention of the bundled track files.
    pub const AUTHORED: Self = Self::Relative {
        origin: Float3::new(-2.0, 0.0, -2.0),
        scale: 2.0,
    };
}

/// Source of ordered control points, looked up by name.
pub trait ControlPointSource {
    fn load(&self, name: &str) -> Result<Vec<Float3>>;
}

/// Loads control point files from a folder.
#[derive(Debug, Clone, PartialEq)]
pub struct FileLoader {
    pub folder: PathBuf,
    pub encoding: PointEncoding,
}

impl FileLoader {
    pub fn new(folder: impl Into<PathBuf>, encoding: PointEncoding) -> Self {
        Self {
            folder: folder.into(),
            encoding,
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.folder.join(name)
    }
}

impl ControlPointSource for FileLoader {
    fn load(&self, name: &str) -> Result<Vec<Float3>> {
        let path = self.path_for(name);
        let points = load_file(&path, self.encoding)?;
        debug!(path = %path.display(), count = points.len(), "loaded control points");
        Ok(points)
    }
}

pub fn load_file(path: &Path, encoding: PointEncoding) -> Result<Vec<Float3>> {
    let text = std::fs::read_to_string(path)?;
    parse_control_points(&text, encoding)
}

/// Parses control points from text.
pub fn parse_control_points(text: &str, encoding: PointEncoding) -> Result<Vec<Float3>> {
    let mut points = Vec::new();
    let mut cursor = match encoding {
        PointEncoding::Absolute => Float3::ZERO,
        PointEncoding::Relative { origin, .. } => origin,
    };

    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let point = parse_line(line).map_err(|message| TrackError::Parse {
            line: index + 1,
            message,
        })?;

        points.push(match encoding {
            PointEncoding::Absolute => point,
            PointEncoding::Relative { scale, .. } => {
                cursor += point;
                cursor * scale
            }
        });
    }

    Ok(points)
}

fn parse_line(line: &str) -> std::result::Result<Float3, String> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() != 3 {
        return Err(format!("expected 3 coordinates, found {}", fields.len()));
    }

    let mut xyz = [0.0f32; 3];
    for (slot, field) in xyz.iter_mut().zip(&fields) {
        let value: f32 = field
            .parse()
            .map_err(|_| format!("`{field}` is not a number"))?;
        if !value.is_finite() {
            return Err(format!("`{field}` is not finite"));
        }
        *slot = value;
    }
    Ok(Float3::new(xyz[0], xyz[1], xyz[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_whitespace_and_commas() {
        let text = "0 0 0\n1.5, 2, -3\n  4,5 ,6  \n";
        let points = parse_control_points(text, PointEncoding::Absolute).unwrap();
        assert_eq!(
            points,
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(1.5, 2.0, -3.0),
                Float3::new(4.0, 5.0, 6.0),
            ]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# lift hill\n\n1 2 3 # crest\n   \n";
        let points = parse_control_points(text, PointEncoding::Absolute).unwrap();
        assert_eq!(points, vec![Float3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn relative_encoding_accumulates_and_scales() {
        let text = "1 0 0\n0 1 0\n0 0 1\n";
        let points = parse_control_points(text, PointEncoding::AUTHORED).unwrap();
        // (-2,0,-2) + (1,0,0) = (-1,0,-2) -> x2
        assert_relative_eq!(points[0].x, -2.0);
        assert_relative_eq!(points[0].z, -4.0);
        // + (0,1,0) -> (-1,1,-2) -> x2
        assert_relative_eq!(points[1].y, 2.0);
        // + (0,0,1) -> (-1,1,-1) -> x2
        assert_relative_eq!(points[2].z, -2.0);
    }

    #[test]
    fn reports_line_of_bad_field() {
        let err = parse_control_points("1 2 3\n\n4 five 6\n", PointEncoding::Absolute).unwrap_err();
        match err {
            TrackError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("five"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_wrong_arity() {
        let err = parse_control_points("1 2\n", PointEncoding::Absolute).unwrap_err();
        assert!(matches!(err, TrackError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_non_finite() {
        let err = parse_control_points("1 inf 3\n", PointEncoding::Absolute).unwrap_err();
        assert!(matches!(err, TrackError::Parse { line: 1, .. }));
    }

    #[test]
    fn file_loader_reads_from_folder() {
        let dir = std::env::temp_dir().join(format!("coastercam-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("loop.trk"), "0 0 0\n1 0 0\n1 0 1\n0 0 1\n").unwrap();

        let loader = FileLoader::new(&dir, PointEncoding::Absolute);
        let points = loader.load("loop.trk").unwrap();
        assert_eq!(points.len(), 4);

        let missing = loader.load("missing.trk").unwrap_err();
        assert!(matches!(missing, TrackError::Io(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
