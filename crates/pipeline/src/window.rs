//! Spatial windows for chunked processing
//!
//! Per-pixel evaluation needs no neighborhood, so windows carry no overlap
//! and are visited strictly sequentially.

/// A rectangular subset of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Row offset in the source raster
    pub row_offset: usize,
    /// Column offset in the source raster
    pub col_offset: usize,
    /// Number of rows in this window
    pub rows: usize,
    /// Number of columns in this window
    pub cols: usize,
}

impl Window {
    pub fn new(row_offset: usize, col_offset: usize, rows: usize, cols: usize) -> Self {
        Self {
            row_offset,
            col_offset,
            rows,
            cols,
        }
    }

    /// Number of pixels covered by this window
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert window-local coordinates to source raster coordinates
    pub fn to_source_coords(&self, local_row: usize, local_col: usize) -> (usize, usize) {
        (self.row_offset + local_row, self.col_offset + local_col)
    }
}

/// Iterator over square windows covering a raster, row-major.
pub struct WindowIterator {
    total_rows: usize,
    total_cols: usize,
    size: usize,
    current_row: usize,
    current_col: usize,
}

impl WindowIterator {
    /// Create an iterator over `size` x `size` windows (edge windows are
    /// clipped to the raster bounds). `size` must be non-zero.
    pub fn new(total_rows: usize, total_cols: usize, size: usize) -> Self {
        debug_assert!(size > 0);
        Self {
            total_rows,
            total_cols,
            size,
            current_row: 0,
            current_col: 0,
        }
    }

    /// Total number of windows this iterator will yield
    pub fn count_windows(&self) -> usize {
        let vertical = self.total_rows.div_ceil(self.size);
        let horizontal = self.total_cols.div_ceil(self.size);
        vertical * horizontal
    }
}

impl Iterator for WindowIterator {
    type Item = Window;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.total_rows || self.total_cols == 0 {
            return None;
        }

        let rows = self.size.min(self.total_rows - self.current_row);
        let cols = self.size.min(self.total_cols - self.current_col);
        let window = Window::new(self.current_row, self.current_col, rows, cols);

        self.current_col += self.size;
        if self.current_col >= self.total_cols {
            self.current_col = 0;
            self.current_row += self.size;
        }

        Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tiling() {
        let windows: Vec<_> = WindowIterator::new(4, 4, 2).collect();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0], Window::new(0, 0, 2, 2));
        assert_eq!(windows[3], Window::new(2, 2, 2, 2));
    }

    #[test]
    fn edge_windows_are_clipped() {
        let windows: Vec<_> = WindowIterator::new(5, 3, 2).collect();
        // 3 row bands x 2 col bands
        assert_eq!(windows.len(), 6);
        let last = windows.last().unwrap();
        assert_eq!(*last, Window::new(4, 2, 1, 1));
    }

    #[test]
    fn count_matches_iteration() {
        for (rows, cols, size) in [(100, 100, 32), (7, 5, 3), (1, 1, 256), (256, 512, 256)] {
            let it = WindowIterator::new(rows, cols, size);
            let expected = it.count_windows();
            assert_eq!(WindowIterator::new(rows, cols, size).count(), expected);
        }
    }

    #[test]
    fn full_coverage_without_overlap() {
        let rows = 10;
        let cols = 7;
        let mut covered = vec![vec![0u32; cols]; rows];

        for window in WindowIterator::new(rows, cols, 3) {
            for r in 0..window.rows {
                for c in 0..window.cols {
                    let (sr, sc) = window.to_source_coords(r, c);
                    covered[sr][sc] += 1;
                }
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                assert_eq!(covered[r][c], 1, "Cell ({}, {}) covered {} times", r, c, covered[r][c]);
            }
        }
    }
}
