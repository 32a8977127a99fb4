//! Material design inspired styling for the UI.
//!
//! This module centralises all colors, spacing and basic widget styles.
//! New components should be built on top of these helpers so the
//! application keeps a consistent look.

use iced::widget::{button, checkbox, container, text_input};
use iced::{theme, Background, Border, Color, Theme};

/// Material color palette
pub struct Palette;

impl Palette {
    pub const PRIMARY: Color = Color { r: 0.25, g: 0.32, b: 0.71, a: 1.0 }; // Indigo 700
    pub const ON_PRIMARY: Color = Color::WHITE;
    pub const SURFACE: Color = Color { r: 0.98, g: 0.98, b: 0.98, a: 1.0 };
    pub const ON_SURFACE: Color = Color { r: 0.1, g: 0.1, b: 0.1, a: 1.0 };
    pub const MUTED: Color = Color { r: 0.45, g: 0.45, b: 0.45, a: 1.0 };
    pub const ERROR: Color = Color { r: 0.80, g: 0.0, b: 0.0, a: 1.0 };

    pub const SPACING: u16 = 16;
}

struct PrimaryButton;

impl button::StyleSheet for PrimaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(Palette::PRIMARY)),
            text_color: Palette::ON_PRIMARY,
            border: Border {
                radius: 4.0.into(),
                ..Border::default()
            },
            ..button::Appearance::default()
        }
    }
}

/// Style for primary action buttons.
pub fn button_primary() -> theme::Button {
    theme::Button::Custom(Box::new(PrimaryButton))
}

struct BasicTextInput;

impl text_input::StyleSheet for BasicTextInput {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(Palette::SURFACE),
            border: Border {
                color: Palette::PRIMARY,
                width: 1.0,
                radius: 4.0.into(),
            },
            icon_color: Palette::ON_SURFACE,
        }
    }

    fn focused(&self, style: &Self::Style) -> text_input::Appearance {
        self.active(style)
    }

    fn disabled(&self, style: &Self::Style) -> text_input::Appearance {
        self.active(style)
    }

    fn placeholder_color(&self, _style: &Self::Style) -> Color {
        Palette::MUTED
    }

    fn value_color(&self, _style: &Self::Style) -> Color {
        Palette::ON_SURFACE
    }

    fn disabled_color(&self, _style: &Self::Style) -> Color {
        Palette::MUTED
    }

    fn selection_color(&self, _style: &Self::Style) -> Color {
        Palette::PRIMARY
    }
}

/// Basic text input styling.
pub fn text_input_basic() -> theme::TextInput {
    theme::TextInput::Custom(Box::new(BasicTextInput))
}

struct Card {
    dimmed: bool,
    selected: bool,
}

impl container::StyleSheet for Card {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        let surface = if self.dimmed {
            Color { a: 0.5, ..Palette::SURFACE }
        } else {
            Palette::SURFACE
        };
        container::Appearance {
            background: Some(Background::Color(surface)),
            text_color: Some(if self.dimmed {
                Palette::MUTED
            } else {
                Palette::ON_SURFACE
            }),
            border: Border {
                color: if self.selected {
                    Palette::PRIMARY
                } else {
                    Color::TRANSPARENT
                },
                width: if self.selected { 2.0 } else { 1.0 },
                radius: 4.0.into(),
            },
            ..container::Appearance::default()
        }
    }
}

/// Container style for one photo card. Hidden photos render dimmed,
/// selected photos carry the primary border.
pub fn card(hidden: bool, selected: bool) -> theme::Container {
    theme::Container::Custom(Box::new(Card {
        dimmed: hidden,
        selected,
    }))
}

struct ErrorBanner;

impl container::StyleSheet for ErrorBanner {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(Palette::ON_PRIMARY),
            background: Some(Background::Color(Palette::ERROR)),
            border: Border {
                color: Palette::ERROR,
                width: 1.0,
                radius: 2.0.into(),
            },
            ..container::Appearance::default()
        }
    }
}

/// Banner surface for surfaced request failures.
pub fn error_banner() -> theme::Container {
    theme::Container::Custom(Box::new(ErrorBanner))
}

struct PrimaryCheckbox;

impl checkbox::StyleSheet for PrimaryCheckbox {
    type Style = Theme;

    fn active(&self, _style: &Self::Style, is_checked: bool) -> checkbox::Appearance {
        checkbox::Appearance {
            background: if is_checked {
                Background::Color(Palette::PRIMARY)
            } else {
                Background::Color(Palette::SURFACE)
            },
            icon_color: Palette::ON_PRIMARY,
            border: Border {
                color: Palette::PRIMARY,
                width: 1.0,
                radius: 2.0.into(),
            },
            text_color: None,
        }
    }

    fn hovered(&self, style: &Self::Style, is_checked: bool) -> checkbox::Appearance {
        self.active(style, is_checked)
    }
}

/// Style for checkboxes using the primary color.
pub fn checkbox_primary() -> theme::Checkbox {
    theme::Checkbox::Custom(Box::new(PrimaryCheckbox))
}
