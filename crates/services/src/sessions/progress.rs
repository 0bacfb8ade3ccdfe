/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub position: usize,
    pub answered: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    /// One-based question number for display, or 0 when nothing was sampled.
    #[must_use]
    pub fn display_number(&self) -> usize {
        if self.total == 0 { 0 } else { self.position + 1 }
    }
}
