//! Shared UI styles for the settings panel

use bevy::prelude::*;

/// Panel background (semi-opaque dark gray)
pub const PANEL_BACKGROUND: Color = Color::srgba(0.2, 0.2, 0.2, 0.92);

pub const BUTTON_NORMAL: Color = Color::srgb(0.33, 0.33, 0.33);
pub const BUTTON_HOVERED: Color = Color::srgb(0.42, 0.42, 0.42);
pub const BUTTON_PRESSED: Color = Color::srgb(0.55, 0.55, 0.55);

/// Save / Load / Reset
pub const SAVE_COLOR: Color = Color::srgb(0.30, 0.69, 0.31);
pub const LOAD_COLOR: Color = Color::srgb(0.13, 0.59, 0.95);
pub const RESET_COLOR: Color = Color::srgb(0.96, 0.26, 0.21);

pub const TEXT_COLOR: Color = Color::WHITE;
pub const TEXT_MUTED: Color = Color::srgb(0.7, 0.7, 0.7);

pub const PANEL_WIDTH: f32 = 220.0;

/// Small square -/+ button
pub fn step_button_style() -> Node {
    Node {
        width: Val::Px(24.0),
        height: Val::Px(22.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

/// Full-width action button
pub fn action_button_style() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Px(28.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        margin: UiRect::bottom(Val::Px(5.0)),
        ..default()
    }
}

pub fn button_text_style() -> TextFont {
    TextFont {
        font_size: 14.0,
        ..default()
    }
}

pub fn section_title_style() -> TextFont {
    TextFont {
        font_size: 17.0,
        ..default()
    }
}

pub fn label_text_style() -> TextFont {
    TextFont {
        font_size: 13.0,
        ..default()
    }
}
