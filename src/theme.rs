//! Kanagawa Dragon theme module.
//!
//! This module implements the "Kanagawa Dragon" / "Ef-Autumn" color palette.
//! A low-contrast, warm, dark theme inspired by traditional Japanese ink wash painting.

use ratatui::style::Color;

/// Kanagawa Dragon color palette
/// Low-contrast, warm, dark theme inspired by traditional Japanese ink wash painting
pub mod colors {
    use super::Color;

    // === Background Colors ===
    /// Dragon Black - Primary background
    pub const BG_DARK: Color = Color::Rgb(0x18, 0x16, 0x16);
    /// Slightly lighter background for medium contrast areas
    pub const BG_MEDIUM: Color = Color::Rgb(0x1D, 0x1C, 0x19);

    // === Foreground Colors ===
    /// Old White - Primary text color
    pub const FG_PRIMARY: Color = Color::Rgb(0xC5, 0xC9, 0xC5);
    /// Dimmed text for secondary information
    pub const FG_DIM: Color = Color::Rgb(0x72, 0x71, 0x69);
    /// Very dim text for hints and placeholders
    pub const FG_HINT: Color = Color::Rgb(0x54, 0x54, 0x54);

    // === Accent Colors ===
    /// Dragon Red - For errors and warnings
    pub const RED: Color = Color::Rgb(0xC4, 0x74, 0x6E);
    /// Dragon Green - For success, completed items
    pub const GREEN: Color = Color::Rgb(0x8A, 0x9A, 0x7B);
    /// Carp Yellow - For warnings, in-progress items
    pub const YELLOW: Color = Color::Rgb(0xC4, 0xB2, 0x8A);
    /// Dragon Blue - For info, selected items
    pub const BLUE: Color = Color::Rgb(0x8B, 0xA4, 0xB0);
    /// Purple - For special accents
    pub const PURPLE: Color = Color::Rgb(0x95, 0x7F, 0xB8);

    // === UI Element Colors ===
    /// Wall Gray - For borders and separators
    pub const BORDER: Color = Color::Rgb(0x72, 0x71, 0x69);
    /// Dim border for less important separators
    pub const BORDER_DIM: Color = Color::Rgb(0x3A, 0x3A, 0x3A);

    // === Timeline Colors ===
    /// Unfilled portion of a task bar
    pub const TASK_BAR_REST: Color = Color::Rgb(0x45, 0x47, 0x5A);
    /// Bar color for completed tasks
    pub const TASK_COMPLETED: Color = GREEN;
    /// Marker for pending milestones
    pub const MILESTONE_PENDING: Color = YELLOW;
    /// Marker for completed milestones
    pub const MILESTONE_DONE: Color = GREEN;
}

/// Color palette for task bars in the timeline
/// Vibrant, distinct colors for easy task differentiation
pub const TASK_COLORS: &[Color] = &[
    Color::Rgb(0x7A, 0xA2, 0xF7), // Bright blue
    Color::Rgb(0x9E, 0xCE, 0x6A), // Bright green
    Color::Rgb(0xE0, 0xAF, 0x68), // Golden yellow
    Color::Rgb(0xBB, 0x9A, 0xF7), // Bright purple
    Color::Rgb(0xFF, 0x9E, 0x64), // Bright orange
    Color::Rgb(0xF7, 0x76, 0x8E), // Pink/magenta
    Color::Rgb(0x73, 0xDA, 0xCA), // Cyan/teal
    Color::Rgb(0xC0, 0xCA, 0xF5), // Lavender
];

/// Get a task color by index (cycles through available colors)
pub fn get_task_color(index: usize) -> Color {
    TASK_COLORS[index % TASK_COLORS.len()]
}

/// Semantic styling helpers
pub mod styles {
    use super::colors;
    use ratatui::style::{Modifier, Style};

    /// Style for primary text
    pub fn text() -> Style {
        Style::default().fg(colors::FG_PRIMARY)
    }

    /// Style for dimmed/secondary text
    pub fn text_dim() -> Style {
        Style::default().fg(colors::FG_DIM)
    }

    /// Style for hint text
    pub fn text_hint() -> Style {
        Style::default().fg(colors::FG_HINT)
    }

    /// Style for success messages
    pub fn success() -> Style {
        Style::default().fg(colors::GREEN)
    }

    /// Style for error messages
    pub fn error() -> Style {
        Style::default().fg(colors::RED)
    }

    /// Style for warning messages
    pub fn warning() -> Style {
        Style::default().fg(colors::YELLOW)
    }

    /// Style for info messages
    pub fn info() -> Style {
        Style::default().fg(colors::BLUE)
    }

    /// Style for selected/highlighted items
    pub fn selected() -> Style {
        Style::default()
            .fg(colors::BG_DARK)
            .bg(colors::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for unfocused borders
    pub fn border() -> Style {
        Style::default().fg(colors::BORDER)
    }

    /// Style for dim borders
    pub fn border_dim() -> Style {
        Style::default().fg(colors::BORDER_DIM)
    }

    /// Style for block titles
    pub fn title() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for accent titles (selector, headers)
    pub fn title_accent() -> Style {
        Style::default()
            .fg(colors::PURPLE)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the active view-selector option
    pub fn view_active() -> Style {
        Style::default()
            .fg(colors::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for inactive view-selector options
    pub fn view_inactive() -> Style {
        Style::default().fg(colors::FG_DIM)
    }

    /// Style for modal content background
    pub fn modal_content_bg() -> Style {
        Style::default().bg(colors::BG_MEDIUM)
    }
}
