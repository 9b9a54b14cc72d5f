use burn::data::dataset::Dataset;

use crate::data::windows::Window;

/// The full windows set behind Burn's Dataset trait, so the
/// DataLoader can call .get(index) and .len() on it.
pub struct WindowDataset {
    windows: Vec<Window>,
}

impl WindowDataset {
    pub fn new(windows: Vec<Window>) -> Self {
        Self { windows }
    }
}

impl Dataset<Window> for WindowDataset {
    fn get(&self, index: usize) -> Option<Window> {
        self.windows.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}
