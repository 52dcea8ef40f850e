//! Color palette and spacing constants. Pure lookup, no logic beyond the
//! token-balance band.

/// Dark palette, mirrored from the product style guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub background_root: &'static str,
    pub background_default: &'static str,
    pub background_secondary: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
    pub user_bubble: &'static str,
    pub ai_bubble: &'static str,
}

pub const DARK: Palette = Palette {
    text: "#F8FAFC",
    text_secondary: "#94A3B8",
    background_root: "#0F172A",
    background_default: "#1E293B",
    background_secondary: "#2D3748",
    primary: "#6366F1",
    secondary: "#1E40AF",
    accent: "#06B6D4",
    success: "#10B981",
    warning: "#F59E0B",
    error: "#EF4444",
    user_bubble: "#6366F1",
    ai_bubble: "#2D3748",
};

/// Spacing scale in display points.
#[derive(Debug, Clone, Copy)]
pub struct Spacing {
    pub xs: u16,
    pub sm: u16,
    pub md: u16,
    pub lg: u16,
    pub xl: u16,
    pub xxl: u16,
    pub input_height: u16,
    pub button_height: u16,
}

pub const SPACING: Spacing = Spacing {
    xs: 4,
    sm: 8,
    md: 12,
    lg: 16,
    xl: 20,
    xxl: 24,
    input_height: 48,
    button_height: 52,
};

/// Status band for the token-balance indicator in the chat header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBand {
    Empty,
    Low,
    Ok,
}

impl TokenBand {
    pub fn for_balance(tokens_day: i64) -> Self {
        match tokens_day {
            0 => TokenBand::Empty,
            1..=5 => TokenBand::Low,
            _ => TokenBand::Ok,
        }
    }

    pub fn color(self, palette: &Palette) -> &'static str {
        match self {
            TokenBand::Empty => palette.error,
            TokenBand::Low => palette.warning,
            TokenBand::Ok => palette.accent,
        }
    }
}
