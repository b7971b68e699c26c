//! Keybinding configuration for the TUI.

use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Key strings per action; each action accepts several keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub next_tab: Vec<String>,
    pub prev_tab: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub select: Vec<String>,
    pub edit: Vec<String>,
    pub submit: Vec<String>,
    pub preview: Vec<String>,
    pub toggle_ai: Vec<String>,
    pub cycle_method: Vec<String>,
    pub refresh: Vec<String>,
    pub toggle_auto_refresh: Vec<String>,
    pub delete_record: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub next_view: Vec<String>,
    pub prev_view: Vec<String>,
    pub export_json: Vec<String>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: vec!["q".to_string(), "Ctrl+c".to_string()],
            next_tab: vec!["Tab".to_string()],
            prev_tab: vec!["BackTab".to_string(), "Shift+Tab".to_string()],
            move_up: vec!["k".to_string(), "Up".to_string()],
            move_down: vec!["j".to_string(), "Down".to_string()],
            next_page: vec!["n".to_string(), "PageDown".to_string()],
            prev_page: vec!["p".to_string(), "PageUp".to_string()],
            select: vec!["Enter".to_string()],
            edit: vec!["e".to_string(), "i".to_string()],
            submit: vec!["s".to_string()],
            preview: vec!["v".to_string()],
            toggle_ai: vec!["t".to_string()],
            cycle_method: vec!["M".to_string()],
            refresh: vec!["R".to_string()],
            toggle_auto_refresh: vec!["a".to_string()],
            delete_record: vec!["d".to_string(), "Delete".to_string()],
            open_in_browser: vec!["o".to_string()],
            next_view: vec!["l".to_string(), "Right".to_string()],
            prev_view: vec!["h".to_string(), "Left".to_string()],
            export_json: vec!["x".to_string()],
        }
    }
}

impl KeybindingConfig {
    /// First action whose bindings match `key`.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 20] = [
            (&self.quit, Action::Quit),
            (&self.next_tab, Action::NextTab),
            (&self.prev_tab, Action::PrevTab),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.select, Action::Select),
            (&self.edit, Action::Edit),
            (&self.submit, Action::Submit),
            (&self.preview, Action::Preview),
            (&self.toggle_ai, Action::ToggleAi),
            (&self.cycle_method, Action::CycleMethod),
            (&self.refresh, Action::Refresh),
            (&self.toggle_auto_refresh, Action::ToggleAutoRefresh),
            (&self.delete_record, Action::DeleteRecord),
            (&self.open_in_browser, Action::OpenInBrowser),
            (&self.next_view, Action::NextView),
            (&self.prev_view, Action::PrevView),
            (&self.export_json, Action::ExportJson),
        ];

        table
            .iter()
            .find(|(bindings, _)| self.matches_key(key, bindings))
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }

    fn matches_key(&self, key: &KeyEvent, bindings: &[String]) -> bool {
        bindings
            .iter()
            .filter_map(|binding| binding.parse::<KeyBinding>().ok())
            .any(|binding| binding.matches(key))
    }
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Shift is ignored when the binding does not ask for it, since
    /// terminals report `R` as Shift+R.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parses strings such as `"j"`, `"PageDown"`, `"F5"`, `"Ctrl+c"` or
/// `"Ctrl+Shift+a"`.
impl FromStr for KeyBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (prefix, key) = if s.len() > 2 && s.ends_with("++") {
            (Some(&s[..s.len() - 2]), "+")
        } else {
            match s.rsplit_once('+') {
                Some((prefix, key)) if !prefix.is_empty() && !key.is_empty() => {
                    (Some(prefix), key)
                }
                _ => (None, s),
            }
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.into_iter().flat_map(|p| p.split('+')) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "shift" => KeyModifiers::SHIFT,
                "alt" => KeyModifiers::ALT,
                _ => return Err(format!("Unknown modifier: {}", part)),
            };
        }

        Ok(KeyBinding {
            code: parse_key_code(key)?,
            modifiers,
        })
    }
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        _ => return Err(format!("Unknown key: {}", s)),
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(s: &str) -> KeyBinding {
        s.parse().unwrap()
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_bindings() {
        assert_eq!(binding("x").code, KeyCode::Char('x'));
        assert_eq!(binding("é").code, KeyCode::Char('é'));
        assert_eq!(binding("pgdn").code, KeyCode::PageDown);
        assert_eq!(binding("F5").code, KeyCode::F(5));
        assert_eq!(binding("space").code, KeyCode::Char(' '));

        let ctrl_shift = binding("Ctrl+Shift+a");
        assert_eq!(ctrl_shift.code, KeyCode::Char('a'));
        assert_eq!(
            ctrl_shift.modifiers,
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        );

        // A bare "+" is the plus key, not a modifier list.
        assert_eq!(binding("+").code, KeyCode::Char('+'));
        assert_eq!(binding("Alt++").code, KeyCode::Char('+'));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("Hyper+a".parse::<KeyBinding>().is_err());
        assert!("F13".parse::<KeyBinding>().is_err());
        assert!("Launch".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn test_shift_is_implicit_for_plain_bindings() {
        let refresh = binding("R");
        assert!(refresh.matches(&press(KeyCode::Char('R'), KeyModifiers::SHIFT)));

        let quit = binding("Ctrl+c");
        assert!(quit.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!quit.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_default_dashboard_keys() {
        let config = KeybindingConfig::default();
        let cases = [
            (press(KeyCode::Char('R'), KeyModifiers::SHIFT), Action::Refresh),
            (press(KeyCode::Char('a'), KeyModifiers::NONE), Action::ToggleAutoRefresh),
            (press(KeyCode::Delete, KeyModifiers::NONE), Action::DeleteRecord),
            (press(KeyCode::BackTab, KeyModifiers::SHIFT), Action::PrevTab),
            (press(KeyCode::Char('x'), KeyModifiers::NONE), Action::ExportJson),
            (press(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit),
            (press(KeyCode::Char('z'), KeyModifiers::NONE), Action::None),
        ];
        for (key, action) in cases {
            assert_eq!(config.get_action(&key), action, "{:?}", key.code);
        }
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: KeybindingConfig = toml::from_str(r#"refresh = ["F5"]"#).unwrap();
        assert_eq!(
            config.get_action(&press(KeyCode::F(5), KeyModifiers::NONE)),
            Action::Refresh
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Action::None
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Action::Quit
        );
    }
}
