//! Console output icons and rules.

use console::{style, StyledObject};

/// Width of the heavy rules around headers and summaries.
pub const WIDE: usize = 80;

/// Width of the light rules around per-store blocks.
pub const NARROW: usize = 60;

/// Success checkmark icon (green ✓).
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Failure icon (red ✗).
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

/// Info/progress arrow icon (cyan →).
pub fn info() -> StyledObject<&'static str> {
    style("→").cyan()
}

/// Warning icon (yellow !).
pub fn warn() -> StyledObject<&'static str> {
    style("!").yellow()
}

/// Heavy rule, `=` repeated.
pub fn heavy_rule() -> String {
    "=".repeat(WIDE)
}

/// Light rule, `─` repeated.
pub fn light_rule() -> String {
    "─".repeat(NARROW)
}
