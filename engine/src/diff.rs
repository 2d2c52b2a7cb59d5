//! Bounded line-level diff between two text states.
//!
//! The computation is a plain LCS dynamic program over the first
//! [`DiffLimits::max_lines`] lines of each side, so cost is bounded no
//! matter how large the inputs are. Lines past the cap are invisible to the
//! diff; that is a cost policy, not a correctness guarantee for huge files.
//!
//! The function is pure and total: any two strings produce a deterministic
//! edit script, never an error.

use patchbay_types::DiffLine;

/// Default cap on lines considered per side.
pub const DEFAULT_MAX_LINES: usize = 220;
/// Default cap on emitted diff entries before the middle is elided.
pub const DEFAULT_MAX_DIFF_LINES: usize = 260;

/// Truncation limits for one diff computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLimits {
    /// Lines considered per side; anything past this is ignored.
    pub max_lines: usize,
    /// Emitted entries kept before splicing in a `Skip` marker.
    pub max_diff_lines: usize,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            max_diff_lines: DEFAULT_MAX_DIFF_LINES,
        }
    }
}

/// Compute a line-level diff with the default limits.
#[must_use]
pub fn line_diff(before: &str, after: &str) -> Vec<DiffLine> {
    line_diff_with_limits(before, after, DiffLimits::default())
}

/// Compute a line-level diff between `before` and `after`.
///
/// Splits on `'\n'` (the empty string has zero lines, so reconstruction by
/// joining is exact, trailing newlines included). Line numbers are 1-based.
#[must_use]
pub fn line_diff_with_limits(before: &str, after: &str, limits: DiffLimits) -> Vec<DiffLine> {
    let old = split_lines(before, limits.max_lines);
    let new = split_lines(after, limits.max_lines);
    let script = backtrack(&old, &new, &lcs_table(&old, &new));
    truncate_middle(script, limits.max_diff_lines)
}

fn split_lines(text: &str, max_lines: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').take(max_lines).collect()
}

fn lcs_table(old: &[&str], new: &[&str]) -> Vec<Vec<u32>> {
    let (m, n) = (old.len(), new.len());
    let mut dp = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if old[i - 1] == new[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }
    dp
}

fn backtrack(old: &[&str], new: &[&str], dp: &[Vec<u32>]) -> Vec<DiffLine> {
    let mut lines = Vec::new();
    let (mut i, mut j) = (old.len(), new.len());
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            lines.push(DiffLine::context(i as u32, j as u32, old[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            // Tie-break: on equal DP values, additions come out before
            // removals. Fixed policy, keeps output deterministic.
            lines.push(DiffLine::added(j as u32, new[j - 1]));
            j -= 1;
        } else {
            lines.push(DiffLine::removed(i as u32, old[i - 1]));
            i -= 1;
        }
    }
    lines.reverse();
    lines
}

fn truncate_middle(lines: Vec<DiffLine>, max_diff_lines: usize) -> Vec<DiffLine> {
    if lines.len() <= max_diff_lines {
        return lines;
    }
    let half = max_diff_lines / 2;
    let elided = lines.len() - max_diff_lines;
    let mut out = Vec::with_capacity(half * 2 + 1);
    out.extend_from_slice(&lines[..half]);
    out.push(DiffLine::skip(format!("{elided} lines omitted")));
    out.extend_from_slice(&lines[lines.len() - half..]);
    out
}
