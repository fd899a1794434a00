use ratatui::style::{Color, Modifier, Style};

use moodtrack_core::models::Mood;
use moodtrack_core::notify::NotificationLevel;

// Chrome
const BRAND: Color = Color::Rgb(112, 96, 200);
const TEXT: Color = Color::Rgb(220, 220, 228);
const DIM: Color = Color::Rgb(120, 120, 136);
const LABEL: Color = Color::Rgb(200, 168, 96);
const SELECTION_BG: Color = Color::Rgb(44, 40, 68);
const BAR_BG: Color = Color::Rgb(28, 26, 40);

// Moods, warm to cold
const EXCITED: Color = Color::Rgb(255, 196, 64);
const HAPPY: Color = Color::Rgb(112, 192, 112);
const NEUTRAL: Color = TEXT;
const ANXIOUS: Color = Color::Rgb(224, 144, 80);
const SAD: Color = Color::Rgb(96, 144, 216);
const ANGRY: Color = Color::Rgb(216, 72, 72);

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

pub fn title_style() -> Style {
    fg(BRAND).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(SELECTION_BG).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    fg(TEXT)
}

pub fn muted_style() -> Style {
    fg(DIM)
}

/// Field labels and key hints
pub fn highlight_style() -> Style {
    fg(LABEL)
}

pub fn success_style() -> Style {
    fg(HAPPY)
}

pub fn error_style() -> Style {
    fg(ANGRY)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        title_style().add_modifier(Modifier::UNDERLINED)
    } else {
        fg(TEXT)
    }
}

pub fn border_style(focused: bool) -> Style {
    fg(if focused { BRAND } else { DIM })
}

pub fn status_bar_style() -> Style {
    Style::default().bg(BAR_BG).fg(TEXT)
}

pub fn help_key_style() -> Style {
    highlight_style().add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    fg(TEXT)
}

pub fn mood_style(mood: Mood) -> Style {
    let color = match mood {
        Mood::Excited => EXCITED,
        Mood::Happy => HAPPY,
        Mood::Neutral => NEUTRAL,
        Mood::Anxious => ANXIOUS,
        Mood::Sad => SAD,
        Mood::Angry => ANGRY,
    };
    fg(color)
}

pub fn toast_style(level: NotificationLevel) -> Style {
    match level {
        NotificationLevel::Success => success_style(),
        NotificationLevel::Info => highlight_style(),
        NotificationLevel::Error => error_style(),
    }
}
