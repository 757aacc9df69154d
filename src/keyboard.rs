use std::fmt::Display;

use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::messages::{LabEvent, Radio, SessionAction, ViewMode};

struct KeyAction {
    code: KeyCode,
    description: String,
    lab_event: Box<dyn Fn() -> LabEvent>,
    is_active_in: Box<dyn Fn(ViewMode) -> bool>,
}

impl Display for KeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// Key bindings and the modes they apply in.
#[derive(Default)]
pub struct KeyTable {
    actions: Vec<KeyAction>,
}

impl KeyTable {
    pub fn with_actions(mut self) -> Self {
        let browsing = |mode: ViewMode| matches!(mode, ViewMode::Generations);
        self.add_action(
            KeyCode::ArrowLeft,
            "\u{2190} previous",
            Box::new(|| LabEvent::Session(SessionAction::Step(-1))),
            Box::new(browsing),
        );
        self.add_action(
            KeyCode::ArrowRight,
            "\u{2192} next",
            Box::new(|| LabEvent::Session(SessionAction::Step(1))),
            Box::new(browsing),
        );
        self.add_action(
            KeyCode::PageUp,
            "PgUp +10",
            Box::new(|| LabEvent::Session(SessionAction::Step(10))),
            Box::new(browsing),
        );
        self.add_action(
            KeyCode::PageDown,
            "PgDn -10",
            Box::new(|| LabEvent::Session(SessionAction::Step(-10))),
            Box::new(browsing),
        );
        self.add_action(
            KeyCode::Home,
            "Home first",
            Box::new(|| LabEvent::Session(SessionAction::First)),
            Box::new(browsing),
        );
        self.add_action(
            KeyCode::End,
            "End last",
            Box::new(|| LabEvent::Session(SessionAction::Last)),
            Box::new(browsing),
        );
        self.add_action(
            KeyCode::KeyR,
            "R reset view",
            Box::new(|| LabEvent::ResetView),
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::Escape,
            "Esc quit",
            Box::new(|| LabEvent::Quit),
            Box::new(|_| true),
        );
        self
    }

    pub fn events_for(&self, code: KeyCode, mode: ViewMode) -> Vec<LabEvent> {
        self.actions
            .iter()
            .filter(|action| action.code == code && (action.is_active_in)(mode))
            .map(|action| (action.lab_event)())
            .collect()
    }

    pub fn legend(&self, mode: ViewMode) -> Vec<String> {
        self.actions
            .iter()
            .filter(|action| (action.is_active_in)(mode))
            .map(|action| action.to_string())
            .collect()
    }

    fn add_action(
        &mut self,
        code: KeyCode,
        description: &str,
        lab_event: Box<dyn Fn() -> LabEvent>,
        is_active_in: Box<dyn Fn(ViewMode) -> bool>,
    ) {
        self.actions.push(KeyAction {
            code,
            description: description.into(),
            lab_event,
            is_active_in,
        });
    }
}

pub struct Keyboard {
    radio: Radio,
    table: KeyTable,
}

impl Keyboard {
    pub fn new(radio: Radio) -> Self {
        Self {
            radio,
            table: KeyTable::default().with_actions(),
        }
    }

    pub fn handle_key_event(&self, key_event: &KeyEvent, mode: ViewMode) {
        if !key_event.state.is_pressed() {
            return;
        }
        if let PhysicalKey::Code(code) = key_event.physical_key {
            for event in self.table.events_for(code, mode) {
                event.send(&self.radio);
            }
        }
    }

    pub fn legend(&self, mode: ViewMode) -> Vec<String> {
        self.table.legend(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_action(table: &KeyTable, code: KeyCode) -> Option<SessionAction> {
        match table.events_for(code, ViewMode::Generations).as_slice() {
            [LabEvent::Session(action)] => Some(*action),
            _ => None,
        }
    }

    #[test]
    fn browse_keys_move_through_generations() {
        let table = KeyTable::default().with_actions();
        assert_eq!(
            session_action(&table, KeyCode::ArrowLeft),
            Some(SessionAction::Step(-1))
        );
        assert_eq!(
            session_action(&table, KeyCode::ArrowRight),
            Some(SessionAction::Step(1))
        );
        assert_eq!(
            session_action(&table, KeyCode::PageUp),
            Some(SessionAction::Step(10))
        );
        assert_eq!(
            session_action(&table, KeyCode::PageDown),
            Some(SessionAction::Step(-10))
        );
        assert_eq!(
            session_action(&table, KeyCode::Home),
            Some(SessionAction::First)
        );
        assert_eq!(
            session_action(&table, KeyCode::End),
            Some(SessionAction::Last)
        );
    }

    #[test]
    fn reset_and_quit_work_in_both_modes() {
        let table = KeyTable::default().with_actions();
        for mode in [ViewMode::Generations, ViewMode::PointCloud] {
            assert!(matches!(
                table.events_for(KeyCode::KeyR, mode).as_slice(),
                [LabEvent::ResetView]
            ));
            assert!(matches!(
                table.events_for(KeyCode::Escape, mode).as_slice(),
                [LabEvent::Quit]
            ));
        }
    }

    #[test]
    fn point_cloud_ignores_browse_keys() {
        let table = KeyTable::default().with_actions();
        for code in [
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Home,
            KeyCode::End,
        ] {
            assert!(table.events_for(code, ViewMode::PointCloud).is_empty());
        }
        assert_eq!(
            table.legend(ViewMode::PointCloud),
            vec!["R reset view", "Esc quit"]
        );
    }

    #[test]
    fn legend_lists_every_key_while_browsing() {
        let table = KeyTable::default().with_actions();
        let legend = table.legend(ViewMode::Generations);
        assert_eq!(legend.len(), 8);
        assert_eq!(legend.first().map(String::as_str), Some("\u{2190} previous"));
        assert_eq!(legend.last().map(String::as_str), Some("Esc quit"));
    }

    #[test]
    fn unbound_keys_do_nothing() {
        let table = KeyTable::default().with_actions();
        assert!(table.events_for(KeyCode::KeyQ, ViewMode::Generations).is_empty());
    }
}
