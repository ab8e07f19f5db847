//! Pure state transitions: (Mode, Action) → Transition.
//!
//! Fully testable without a terminal. Each mode defines which actions it
//! accepts. Unhandled actions return the current mode unchanged (no-op).

use crate::settings::Settings;

use super::state::{Action, Command, Effect, MENU_BAR, MenuEntry, Mode, Prompt, Transition};

/// Pure state transition function.
///
/// `settings` is read only to seed prompts with current values.
pub fn update(mode: Mode, action: &Action, settings: &Settings) -> Transition {
    match mode {
        Mode::Reading => update_reading(action, settings),
        Mode::Menu { selected, item } => update_menu(selected, item, action, settings),
        Mode::Prompt(prompt) => update_prompt(prompt, action),
    }
}

/// Map a command to its transition: open a prompt, run an effect, or quit.
fn run_command(command: Command, settings: &Settings) -> Transition {
    if let Some(kind) = command.prompt() {
        return Transition::Mode(Mode::Prompt(Prompt::seeded(kind, settings)));
    }
    match command {
        Command::SaveSettings => Transition::Effect(Effect::SaveSettings),
        Command::ToggleScroll => Transition::Effect(Effect::ToggleScroll),
        Command::Exit => Transition::Quit,
        // Prompting commands were handled above
        _ => Transition::Mode(Mode::Reading),
    }
}

// ============================================================================
// PER-MODE HANDLERS
// ============================================================================

/// Reading: hotkeys, manual scrolling, menu focus.
fn update_reading(action: &Action, settings: &Settings) -> Transition {
    match action {
        Action::Up => Transition::Effect(Effect::Scroll(-1)),
        Action::Down => Transition::Effect(Effect::Scroll(1)),
        Action::PageUp => Transition::Effect(Effect::ScrollPages(-1)),
        Action::PageDown => Transition::Effect(Effect::ScrollPages(1)),
        Action::Top => Transition::Effect(Effect::ScrollTop),
        Action::OpenMenu => Transition::Mode(Mode::menu()),
        Action::Command(command) => run_command(*command, settings),
        Action::Quit => Transition::Quit,
        _ => Transition::Mode(Mode::Reading),
    }
}

/// Menu: left/right across the bar, up/down within a dropdown.
fn update_menu(
    selected: usize,
    item: Option<usize>,
    action: &Action,
    settings: &Settings,
) -> Transition {
    let len = MENU_BAR.len();
    let entry = &MENU_BAR[selected.min(len - 1)];
    let items = entry.items();

    match action {
        Action::Left | Action::Right => {
            let next = if *action == Action::Left {
                (selected + len - 1) % len
            } else {
                (selected + 1) % len
            };
            // Keep the dropdown open while moving between cascades
            let item = item
                .filter(|_| !MENU_BAR[next].items().is_empty())
                .map(|_| 0);
            Transition::Mode(Mode::Menu {
                selected: next,
                item,
            })
        }
        Action::Down => {
            let item = match item {
                None if !items.is_empty() => Some(0),
                None => None,
                Some(i) => Some((i + 1).min(items.len().saturating_sub(1))),
            };
            Transition::Mode(Mode::Menu { selected, item })
        }
        Action::Up => {
            let item = match item {
                Some(0) | None => None,
                Some(i) => Some(i - 1),
            };
            Transition::Mode(Mode::Menu { selected, item })
        }
        Action::Enter => match (entry, item) {
            (MenuEntry::Command { command, .. }, _) => run_command(*command, settings),
            (MenuEntry::Cascade { .. }, None) => Transition::Mode(Mode::Menu {
                selected,
                item: Some(0),
            }),
            (MenuEntry::Cascade { items, .. }, Some(i)) => match items.get(i) {
                Some((_, command)) => run_command(*command, settings),
                None => Transition::Mode(Mode::Menu { selected, item: None }),
            },
        },
        Action::Back => match item {
            Some(_) => Transition::Mode(Mode::Menu { selected, item: None }),
            None => Transition::Mode(Mode::Reading),
        },
        Action::OpenMenu => Transition::Mode(Mode::Reading),
        Action::Command(command) => run_command(*command, settings),
        Action::Quit => Transition::Quit,
        _ => Transition::Mode(Mode::Menu { selected, item }),
    }
}

/// Prompt: edit the answer, submit it, or cancel.
fn update_prompt(mut prompt: Prompt, action: &Action) -> Transition {
    match action {
        Action::Input(c) => {
            prompt.input.push(*c);
            Transition::Mode(Mode::Prompt(prompt))
        }
        Action::Backspace => {
            prompt.input.pop();
            Transition::Mode(Mode::Prompt(prompt))
        }
        Action::Enter => {
            if prompt.input.trim().is_empty() {
                // Empty answer is a cancel
                Transition::Mode(Mode::Reading)
            } else {
                Transition::Effect(Effect::Submit {
                    kind: prompt.kind,
                    value: prompt.input,
                })
            }
        }
        Action::Back => Transition::Mode(Mode::Reading),
        Action::Quit => Transition::Quit,
        _ => Transition::Mode(Mode::Prompt(prompt)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
