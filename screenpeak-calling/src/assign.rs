//! Assignment of guides to windows and to the background group.

use std::collections::HashMap;

use screenpeak_core::models::{GuideRecord, Window};

/// Group label inside one window fit: background controls are group 0,
/// guides overlapping the window are group 1.
pub const BACKGROUND_GROUP: usize = 0;
pub const FOREGROUND_GROUP: usize = 1;

/// Sparse guide-by-window membership.
///
/// Non-targeting controls always belong to the background group (index 0)
/// and to no window; a targeting guide belongs to every window its effect
/// region overlaps (replicated across windows, never partitioned).
/// Rows hold indices into the guide slice the matrix was built from.
#[derive(Debug, Clone)]
pub struct AssignmentMatrix {
    control: Vec<usize>,
    windows: Vec<Vec<usize>>,
}

impl AssignmentMatrix {
    pub fn build(guides: &[GuideRecord], windows: &[Window]) -> Self {
        let control: Vec<usize> = guides
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_control())
            .map(|(i, _)| i)
            .collect();

        let window_members: Vec<Vec<usize>> = windows
            .iter()
            .map(|w| {
                guides
                    .iter()
                    .enumerate()
                    .filter(|(_, g)| {
                        g.target
                            .as_ref()
                            .map(|t| t.overlaps(&w.region))
                            .unwrap_or(false)
                    })
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        AssignmentMatrix {
            control,
            windows: window_members,
        }
    }

    pub fn control_guides(&self) -> &[usize] {
        &self.control
    }

    /// Members of a window by its 1-based index.
    pub fn window_guides(&self, window_index: usize) -> &[usize] {
        &self.windows[window_index - 1]
    }

    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    /// Assemble the two-group guide set for one window's fit.
    ///
    /// A guide enters the fit only if it belongs to exactly one of the
    /// two groups: membership in neither says nothing about this window,
    /// and membership in both would make the guide useless as either
    /// control or foreground. Returns `(guide_index, group)` pairs in
    /// guide order.
    pub fn fit_groups(&self, window_index: usize) -> Vec<(usize, usize)> {
        let mut membership: HashMap<usize, (bool, bool)> = HashMap::new();
        for &i in &self.control {
            membership.entry(i).or_default().0 = true;
        }
        for &i in self.window_guides(window_index) {
            membership.entry(i).or_default().1 = true;
        }

        let mut groups: Vec<(usize, usize)> = membership
            .into_iter()
            .filter_map(|(i, (in_control, in_window))| match (in_control, in_window) {
                (true, false) => Some((i, BACKGROUND_GROUP)),
                (false, true) => Some((i, FOREGROUND_GROUP)),
                _ => None,
            })
            .collect();
        groups.sort_unstable();
        groups
    }
}
