use std::fmt::{self, Display};

use crate::models::region::Region;

/// Window index reserved for the non-targeting background group. Real
/// windows are numbered from 1.
pub const BACKGROUND_INDEX: usize = 0;

///
/// One candidate window on the genome. Windows are produced once per run
/// by the window builder, carry 1-based sequential indices, and are never
/// mutated afterwards. The index ordering is the unit of chunked work.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub region: Region,
    pub index: usize,
}

impl Window {
    pub fn new(region: Region, index: usize) -> Self {
        debug_assert!(index > BACKGROUND_INDEX, "window indices are 1-based");
        Window { region, index }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wnd_{} ({})", self.index, self.region)
    }
}
