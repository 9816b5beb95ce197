/// Tuning knobs for a [`ListView`](crate::ListView).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListViewConfig {
    /// Item rows kept materialized past each edge of the viewport.
    ///
    /// Headers between those rows are kept as well. Zero fills the viewport
    /// exactly. Default is 1.
    pub overscan_rows: usize,

    /// Initial viewport width.
    pub initial_width: i32,

    /// Initial viewport height.
    pub initial_height: i32,
}

impl Default for ListViewConfig {
    fn default() -> Self {
        Self {
            overscan_rows: 1,
            initial_width: 0,
            initial_height: 0,
        }
    }
}

impl ListViewConfig {
    pub fn with_overscan(mut self, rows: usize) -> Self {
        self.overscan_rows = rows;
        self
    }

    /// Sets the viewport size the list starts with.
    pub fn with_viewport(mut self, width: i32, height: i32) -> Self {
        self.initial_width = width.max(0);
        self.initial_height = height.max(0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = ListViewConfig::default().with_overscan(0).with_viewport(320, -5);
        assert_eq!(config.overscan_rows, 0);
        assert_eq!((config.initial_width, config.initial_height), (320, 0));
        assert_eq!(ListViewConfig::default().overscan_rows, 1);
    }
}
