//! Window scheduling over the page range

use crate::{
    error::{CoreError, Result},
    types::Window,
};

/// Partition `[0, total_pages - 1]` into overlapping classification windows.
///
/// Consecutive windows overlap by exactly `overlap` pages; the final window
/// truncates at the last page instead of re-covering earlier ones. A
/// production no larger than one window yields a single window.
pub fn plan_windows(total_pages: usize, window_size: usize, overlap: usize) -> Result<Vec<Window>> {
    if total_pages == 0 {
        return Err(CoreError::InvalidConfig(
            "production must have at least one page".to_string(),
        ));
    }
    if window_size < 2 {
        return Err(CoreError::InvalidConfig(format!(
            "window size must be at least 2, got {window_size}"
        )));
    }
    if overlap >= window_size {
        return Err(CoreError::InvalidConfig(format!(
            "overlap {overlap} must be smaller than window size {window_size}"
        )));
    }

    let step = window_size - overlap;
    let mut windows = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + window_size - 1).min(total_pages - 1);
        windows.push(Window {
            id: windows.len(),
            start_page: start,
            end_page: end,
        });
        if end == total_pages - 1 {
            break;
        }
        start += step;
    }

    Ok(windows)
}
