//! Settings panel
//!
//! Top-left overlay with -/+ steppers for every setting plus Save / Load / Reset.
//! Changes are queued as `ControlCommand::ApplySettings` so they take effect at the
//! start of the next frame, the same way keyboard and mouse input does.

use bevy::prelude::*;

use arena_shared::{ControlCommand, ControlQueue, SettingField, Settings, SettingsStore};

use super::styles::*;

/// Holding Shift multiplies a stepper click
const FAST_STEP_MULTIPLIER: i32 = 10;

/// Panel sections in display order
const SECTIONS: [(&str, &[SettingField]); 4] = [
    (
        "Player",
        &[
            SettingField::MoveSpeed,
            SettingField::SkillSpeed,
            SettingField::SkillRadius,
        ],
    ),
    ("Camera", &[SettingField::CameraDistance, SettingField::CameraFov]),
    ("Area", &[SettingField::CircleRadius]),
    ("Debug", &[SettingField::RenderDistance]),
];

pub struct SettingsPanelPlugin;

impl Plugin for SettingsPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_settings_panel);
        app.add_systems(
            Update,
            (
                button_interactions,
                handle_step_buttons,
                handle_panel_actions,
                refresh_value_texts,
            ),
        );
    }
}

// =============================================================================
// COMPONENTS
// =============================================================================

/// Root of the overlay; carries an `Interaction` so the world input systems can
/// tell when the pointer is over the panel
#[derive(Component)]
struct SettingsPanelRoot;

/// Collapsible part of the panel (everything below the toggle)
#[derive(Component)]
struct PanelBody;

/// Label of the show/hide button
#[derive(Component)]
struct ToggleLabel;

/// Displayed value of one setting
#[derive(Component)]
struct SettingValueText(SettingField);

/// -/+ button for one setting
#[derive(Component, Clone, Copy)]
struct SettingStepButton {
    field: SettingField,
    steps: i32,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
enum PanelAction {
    Save,
    Load,
    Reset,
    Toggle,
}

/// Background colors per interaction state
#[derive(Component, Clone, Copy)]
struct ButtonPalette {
    normal: Color,
    hovered: Color,
    pressed: Color,
}

impl ButtonPalette {
    const NEUTRAL: Self = Self {
        normal: BUTTON_NORMAL,
        hovered: BUTTON_HOVERED,
        pressed: BUTTON_PRESSED,
    };

    /// Accent buttons darken on hover and press
    fn accent(color: Color) -> Self {
        let srgba = color.to_srgba();
        let shade = |f: f32| Color::srgb(srgba.red * f, srgba.green * f, srgba.blue * f);
        Self {
            normal: color,
            hovered: shade(0.85),
            pressed: shade(0.7),
        }
    }
}

// =============================================================================
// SPAWNING
// =============================================================================

fn spawn_settings_panel(mut commands: Commands, settings: Res<Settings>) {
    commands
        .spawn((
            SettingsPanelRoot,
            Interaction::default(),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                width: Val::Px(PANEL_WIDTH),
                flex_direction: FlexDirection::Column,
                ..default()
            },
        ))
        .with_children(|root| {
            spawn_button(
                root,
                "Hide Settings",
                PanelAction::Toggle,
                ButtonPalette::NEUTRAL,
                Some(ToggleLabel),
            );

            root.spawn((
                PanelBody,
                Node {
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(10.0)),
                    ..default()
                },
                BackgroundColor(PANEL_BACKGROUND),
            ))
            .with_children(|body| {
                for (title, fields) in SECTIONS {
                    body.spawn((
                        Text::new(title),
                        section_title_style(),
                        TextColor(TEXT_COLOR),
                        Node {
                            margin: UiRect::vertical(Val::Px(6.0)),
                            ..default()
                        },
                    ));
                    for &field in fields {
                        spawn_setting_row(body, field, &settings);
                    }
                }

                body.spawn(Node {
                    height: Val::Px(10.0),
                    ..default()
                });
                spawn_button(
                    body,
                    "Save Settings",
                    PanelAction::Save,
                    ButtonPalette::accent(SAVE_COLOR),
                    None,
                );
                spawn_button(
                    body,
                    "Load Settings",
                    PanelAction::Load,
                    ButtonPalette::accent(LOAD_COLOR),
                    None,
                );
                spawn_button(
                    body,
                    "Reset Settings",
                    PanelAction::Reset,
                    ButtonPalette::accent(RESET_COLOR),
                    None,
                );

                body.spawn((
                    Text::new("Shift+click steps x10"),
                    label_text_style(),
                    TextColor(TEXT_MUTED),
                ));
            });
        });
}

fn spawn_setting_row(parent: &mut ChildSpawnerCommands<'_>, field: SettingField, settings: &Settings) {
    parent.spawn((
        Text::new(field.label()),
        label_text_style(),
        TextColor(TEXT_MUTED),
    ));

    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceBetween,
            margin: UiRect::bottom(Val::Px(8.0)),
            ..default()
        })
        .with_children(|row| {
            spawn_step_button(row, "-", SettingStepButton { field, steps: -1 });
            row.spawn((
                SettingValueText(field),
                Text::new(format_value(field, settings.get(field))),
                button_text_style(),
                TextColor(TEXT_COLOR),
            ));
            spawn_step_button(row, "+", SettingStepButton { field, steps: 1 });
        });
}

fn spawn_step_button(parent: &mut ChildSpawnerCommands<'_>, text: &str, step: SettingStepButton) {
    parent
        .spawn((
            Button,
            step,
            ButtonPalette::NEUTRAL,
            step_button_style(),
            BackgroundColor(BUTTON_NORMAL),
            BorderRadius::all(Val::Px(3.0)),
        ))
        .with_children(|btn| {
            btn.spawn((Text::new(text), button_text_style(), TextColor(TEXT_COLOR)));
        });
}

fn spawn_button(
    parent: &mut ChildSpawnerCommands<'_>,
    text: &str,
    action: PanelAction,
    palette: ButtonPalette,
    label_marker: Option<ToggleLabel>,
) {
    parent
        .spawn((
            Button,
            action,
            palette,
            action_button_style(),
            BackgroundColor(palette.normal),
        ))
        .with_children(|btn| {
            let mut label = btn.spawn((Text::new(text), button_text_style(), TextColor(TEXT_COLOR)));
            if let Some(marker) = label_marker {
                label.insert(marker);
            }
        });
}

fn format_value(field: SettingField, value: f32) -> String {
    format!("{:.*}", field.decimals(), value)
}

// =============================================================================
// INTERACTION
// =============================================================================

fn button_interactions(
    mut buttons: Query<
        (&Interaction, &ButtonPalette, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, palette, mut bg_color) in buttons.iter_mut() {
        *bg_color = match interaction {
            Interaction::Pressed => BackgroundColor(palette.pressed),
            Interaction::Hovered => BackgroundColor(palette.hovered),
            Interaction::None => BackgroundColor(palette.normal),
        };
    }
}

fn handle_step_buttons(
    buttons: Query<(&Interaction, &SettingStepButton), Changed<Interaction>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut queue: ResMut<ControlQueue>,
) {
    let multiplier = if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        FAST_STEP_MULTIPLIER
    } else {
        1
    };

    let mut next = *settings;
    let mut changed = false;
    for (interaction, step) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            next.step(step.field, step.steps * multiplier);
            changed = true;
        }
    }

    if changed && next != *settings {
        queue.push(ControlCommand::ApplySettings(next));
    }
}

fn handle_panel_actions(
    buttons: Query<(&Interaction, &PanelAction), Changed<Interaction>>,
    settings: Res<Settings>,
    store: Res<SettingsStore>,
    mut queue: ResMut<ControlQueue>,
    mut bodies: Query<&mut Node, With<PanelBody>>,
    mut toggle_labels: Query<&mut Text, With<ToggleLabel>>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action {
            PanelAction::Save => {
                if let Err(e) = store.save(&settings) {
                    warn!("Failed to save settings: {}", e);
                }
            }
            PanelAction::Load => {
                let loaded = store.load_or_default();
                queue.push(ControlCommand::ApplySettings(loaded));
            }
            PanelAction::Reset => {
                info!("Resetting settings to defaults");
                queue.push(ControlCommand::ApplySettings(Settings::default()));
            }
            PanelAction::Toggle => {
                let mut hidden = false;
                for mut node in bodies.iter_mut() {
                    node.display = if node.display == Display::None {
                        Display::Flex
                    } else {
                        hidden = true;
                        Display::None
                    };
                }
                for mut text in toggle_labels.iter_mut() {
                    text.0 = if hidden { "Show Settings" } else { "Hide Settings" }.to_string();
                }
            }
        }
    }
}

/// Refresh displayed values after any settings change (panel, wheel zoom, load)
fn refresh_value_texts(settings: Res<Settings>, mut texts: Query<(&SettingValueText, &mut Text)>) {
    if !settings.is_changed() {
        return;
    }
    for (value, mut text) in texts.iter_mut() {
        text.0 = format_value(value.0, settings.get(value.0));
    }
}
