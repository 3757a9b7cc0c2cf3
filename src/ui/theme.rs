use crossterm::style::Color;

/// Design tokens for the hoist console.
///
/// Design constraints:
/// - Only 4 semantic colors (`colors::*`)
/// - All icons must be sourced from this module
pub mod colors {
    use super::Color;

    /// #22C55E
    pub const SUCCESS: Color = Color::Green;
    /// #EF4444
    pub const ERROR: Color = Color::Red;
    /// #F59E0B
    pub const WARNING: Color = Color::Yellow;
    /// #6B7280
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const ARROW: &str = "↳";
}

pub mod icons_ascii {
    pub const ARROW: &str = ">";
}

/// Status words printed after a step title
pub mod labels {
    pub const OK: &str = "OK";
    pub const WARNING: &str = "WARNING";
    pub const FAILED: &str = "FAILED";
}
