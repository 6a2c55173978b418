use crate::draft::ReminderDraft;
use crate::inventory::InventoryView;
use crate::model::{Frequency, Hospital};
use crate::notify::Subscription;
use crate::session::Session;
use chrono::{DateTime, NaiveTime, Utc};
use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Inventory,
    Connect,
    AddReminder,
}

/// Which wizard screen the add-reminder flow is showing. The pages map onto
/// the draft's steps one-to-one; Confirm sits on the draft's Submit step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPage {
    Name,
    Frequency,
    Times,
    Dosages,
    Compartment,
    Confirm,
}

pub struct AppState {
    // Data
    pub session: Session,
    pub inventory: InventoryView,
    pub draft: ReminderDraft,
    pub hospitals: Vec<Hospital>,

    // UI State
    pub screen: Screen,
    pub wizard_page: WizardPage,
    pub list_state: ListState,
    pub freq_state: ListState,
    pub message: String,
    pub modal_message: Option<String>,
    pub form_error: Option<String>,
    pub submitting: bool,
    pub report_loading: bool,
    pub scan_loading: bool,
    pub quit: bool,

    // Input Buffers
    pub input_buffer: String,
    pub cursor_position: usize,
    pub time_inputs: Vec<String>,
    pub time_index: usize,
    pub dosage_inputs: Vec<String>,
    pub dosage_index: usize,

    pub notifications: Option<Subscription>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        let mut f_state = ListState::default();
        f_state.select(Some(0));

        Self {
            session,
            inventory: InventoryView::default(),
            draft: ReminderDraft::default(),
            hospitals: vec![],

            screen: Screen::Dashboard,
            wizard_page: WizardPage::Name,
            list_state: ListState::default(),
            freq_state: f_state,
            message: String::new(),
            modal_message: None,
            form_error: None,
            submitting: false,
            report_loading: false,
            scan_loading: false,
            quit: false,

            input_buffer: String::new(),
            cursor_position: 0,
            time_inputs: vec![],
            time_index: 0,
            dosage_inputs: vec![],
            dosage_index: 0,

            notifications: None,
        }
    }

    /// Abandoning or finishing the wizard clears everything it touched.
    pub fn reset_wizard(&mut self) {
        self.draft.reset();
        self.wizard_page = WizardPage::Name;
        self.time_inputs.clear();
        self.time_index = 0;
        self.dosage_inputs.clear();
        self.dosage_index = 0;
        self.form_error = None;
        self.submitting = false;
        self.reset_input();
        self.freq_state.select(Some(0));
    }

    pub fn selected_frequency(&self) -> Frequency {
        let idx = self.freq_state.selected().unwrap_or(0);
        Frequency::ALL[idx.min(Frequency::ALL.len() - 1)]
    }

    // --- INPUT HELPERS ---
    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        // cursor_position counts chars; insert wants a byte offset.
        let idx = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(idx, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }

    // --- NAVIGATION ---
    pub fn next(&mut self) {
        let len = self.inventory.items().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }
    pub fn previous(&mut self) {
        let len = self.inventory.items().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }
    pub fn next_frequency(&mut self) {
        let len = Frequency::ALL.len();
        let i = match self.freq_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.freq_state.select(Some(i));
    }
    pub fn previous_frequency(&mut self) {
        let len = Frequency::ALL.len();
        let i = match self.freq_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.freq_state.select(Some(i));
    }

    /// Clamp the list selection after a refetch so it never points past the
    /// end of a shrunken list.
    pub fn clamp_selection(&mut self) {
        let len = self.inventory.items().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.min(len - 1)));
        }
    }
}

/// Parse an `HH:MM` wizard entry into a reminder time on today's date.
pub fn parse_time_of_day(input: &str) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(input.trim(), "%H:%M").ok()?;
    Some(Utc::now().date_naive().and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::InventoryItem;
    use chrono::{TimeZone, Timelike};

    fn state() -> AppState {
        let config: Config = toml::from_str(
            r#"
            api_url = "https://api.example.com"
            token = "t"
            "#,
        )
        .unwrap();
        AppState::new(Session::from_config(&config))
    }

    fn item(name: &str) -> InventoryItem {
        InventoryItem {
            id: name.to_string(),
            medicine_name: name.to_string(),
            stock: 1,
            compartment: 1,
            expiration_date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn load(state: &mut AppState, count: usize) {
        let seq = state.inventory.begin_fetch();
        let items = (0..count).map(|i| item(&format!("med-{}", i))).collect();
        state.inventory.complete_fetch(seq, Ok(items));
    }

    #[test]
    fn test_navigation_next_wraps() {
        let mut state = state();
        load(&mut state, 3);

        state.list_state.select(Some(0));
        state.next();
        assert_eq!(state.list_state.selected(), Some(1));
        state.next();
        assert_eq!(state.list_state.selected(), Some(2));
        state.next();
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_empty_list_safety() {
        let mut state = state();
        // Should not panic
        state.next();
        state.previous();
    }

    #[test]
    fn test_clamp_selection_after_shrink() {
        let mut state = state();
        load(&mut state, 5);
        state.list_state.select(Some(4));

        load(&mut state, 2);
        state.clamp_selection();
        assert_eq!(state.list_state.selected(), Some(1));
    }

    #[test]
    fn test_cursor_clamping() {
        let mut state = state();
        state.input_buffer = "abc".to_string();
        state.cursor_position = 0;

        state.move_cursor_right();
        state.move_cursor_right();
        state.move_cursor_right();
        state.move_cursor_right(); // Should stay 3
        assert_eq!(state.cursor_position, 3);

        state.move_cursor_left();
        state.move_cursor_left();
        state.move_cursor_left();
        state.move_cursor_left(); // Should stay 0
        assert_eq!(state.cursor_position, 0);
    }

    #[test]
    fn test_enter_char_handles_multibyte_input() {
        let mut state = state();
        state.enter_char('é');
        state.enter_char('x');
        assert_eq!(state.input_buffer, "éx");
        assert_eq!(state.cursor_position, 2);

        state.move_cursor_left();
        state.move_cursor_left();
        state.enter_char('à');
        assert_eq!(state.input_buffer, "àéx");

        state.delete_char();
        assert_eq!(state.input_buffer, "éx");
    }

    #[test]
    fn test_frequency_selection_wraps() {
        let mut state = state();
        assert_eq!(state.selected_frequency(), Frequency::OnceADay);
        state.next_frequency();
        state.next_frequency();
        assert_eq!(state.selected_frequency(), Frequency::ThreeTimesADay);
        state.next_frequency();
        assert_eq!(state.selected_frequency(), Frequency::OnceADay);
        state.previous_frequency();
        assert_eq!(state.selected_frequency(), Frequency::ThreeTimesADay);
    }

    #[test]
    fn test_reset_wizard_clears_buffers() {
        let mut state = state();
        state.input_buffer = "Paracetamol".to_string();
        state.cursor_position = 5;
        state.draft.set_medication_name("Paracetamol").unwrap();
        state.draft.set_frequency(Frequency::TwiceADay).unwrap();
        state.time_inputs = vec!["08:00".to_string()];
        state.form_error = Some("oops".to_string());
        state.wizard_page = WizardPage::Dosages;

        state.reset_wizard();

        assert!(state.input_buffer.is_empty());
        assert_eq!(state.wizard_page, WizardPage::Name);
        assert!(state.draft.frequency().is_none());
        assert_eq!(state.draft.medication_name(), "");
        assert!(state.time_inputs.is_empty());
        assert!(state.form_error.is_none());
    }

    #[test]
    fn test_parse_time_of_day() {
        let parsed = parse_time_of_day("08:30").unwrap();
        assert_eq!(parsed.hour(), 8);
        assert_eq!(parsed.minute(), 30);
        assert!(parse_time_of_day("25:00").is_none());
        assert!(parse_time_of_day("8 am").is_none());
    }
}
