//! Document-preview payload model.

use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Grid layout handed from the create step to the display step of the
/// document-preview flow.
///
/// Items are opaque to the service; only the grid dimensions are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewData {
    /// Number of rows in the grid.
    pub rows: u32,
    /// Number of columns in the grid.
    pub cols: u32,
    /// Items placed on the grid.
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

impl PreviewData {
    /// Rejects empty grids.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(PayrollError::InvalidPreview {
                message: format!(
                    "grid must have at least one row and column, got {}x{}",
                    self.rows, self.cols
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_rows() {
        let data = PreviewData {
            rows: 0,
            cols: 3,
            items: vec![],
        };
        assert!(matches!(
            data.validate(),
            Err(PayrollError::InvalidPreview { .. })
        ));
    }

    #[test]
    fn test_items_default_to_empty() {
        let data: PreviewData = serde_json::from_str(r#"{"rows": 2, "cols": 2}"#).unwrap();
        assert!(data.items.is_empty());
        assert!(data.validate().is_ok());
    }
}
