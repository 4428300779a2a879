//! Code fence tracking for line-based directive splitting.
//!
//! Directive markers (`:::`) inside fenced code are content, not structure.

/// Tracks whether the current line sits inside a fenced code block.
///
/// Fences use backticks or tildes (three or more). A closing fence must use
/// the opening character and be at least as long.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    fence_char: Option<char>,
    fence_len: usize,
}

impl FenceTracker {
    /// Start outside any fence.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the lines fed so far left a fence open.
    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Feed one line. Returns `true` if it opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.fence_char {
            Some(fence_char) if is_closing_fence(trimmed, fence_char, self.fence_len) => {
                self.fence_char = None;
                self.fence_len = 0;
                true
            }
            Some(_) => false,
            None => match opening_fence(trimmed) {
                Some((ch, len)) => {
                    self.fence_char = Some(ch);
                    self.fence_len = len;
                    true
                }
                None => false,
            },
        }
    }
}

fn opening_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

fn is_closing_fence(trimmed: &str, fence_char: char, min_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == fence_char).count();
    count > 0 && count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());
        assert!(!tracker.update(":::note"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_must_match() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("````"));
        assert!(!tracker.update("```"));
        assert!(!tracker.update("~~~~"));
        assert!(tracker.in_fence());
        assert!(tracker.update("`````  "));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_and_indented_fences() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("  ~~~python"));
        assert!(tracker.in_fence());
        assert!(tracker.update(" ~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_regular_lines() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``inline``"));
        assert!(!tracker.update("::: note"));
        assert!(!tracker.in_fence());
    }
}
