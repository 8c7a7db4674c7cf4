//! UI module

pub mod settings_panel;
pub mod styles;

pub use settings_panel::SettingsPanelPlugin;
