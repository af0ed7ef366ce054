use crate::Result;
use serde::{Deserialize, Serialize};

/// Placement constants for every layout rule. Missing keys in a JSON config keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Cells per row for the grid kinds (class, er, state, deployment, usecase).
    pub grid_columns: usize,
    pub margin: f64,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
    pub font_size: f64,
    /// Minimum distance between two sequence lifelines.
    pub sequence_column_width: f64,
    pub sequence_header_height: f64,
    pub sequence_row_height: f64,
    pub mindmap_level_distance: f64,
    pub mindmap_row_gap: f64,
    /// Minimum width of an activity lane (or of the single chain column without lanes).
    pub lane_width: f64,
    pub lane_header_height: f64,
    /// Vertical space between two consecutive activity nodes.
    pub activity_gap: f64,
    /// Distance between an activity node and its attached note.
    pub note_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_columns: 4,
            margin: 40.0,
            horizontal_gap: 40.0,
            vertical_gap: 60.0,
            font_size: 13.0,
            sequence_column_width: 160.0,
            sequence_header_height: 40.0,
            sequence_row_height: 50.0,
            mindmap_level_distance: 200.0,
            mindmap_row_gap: 20.0,
            lane_width: 260.0,
            lane_header_height: 30.0,
            activity_gap: 30.0,
            note_gap: 30.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub(crate) fn columns(&self) -> usize {
        self.grid_columns.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LayoutConfig::from_json_str(r#"{ "gridColumns": 2, "margin": 10 }"#).unwrap();
        assert_eq!(cfg.grid_columns, 2);
        assert_eq!(cfg.margin, 10.0);
        assert_eq!(cfg.vertical_gap, LayoutConfig::default().vertical_gap);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            LayoutConfig::from_json_str("{ gridColumns: }"),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn zero_columns_still_lays_out_one_per_row() {
        let cfg = LayoutConfig {
            grid_columns: 0,
            ..LayoutConfig::default()
        };
        assert_eq!(cfg.columns(), 1);
    }
}
