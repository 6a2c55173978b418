// File: src/tui/handlers.rs
use crate::report::ReportData;
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::{AppState, Screen, WizardPage, parse_time_of_day};
use crossterm::event::{KeyCode, KeyEvent};

/// Landing a network result may require a follow-up request (e.g. refreshing
/// the inventory after a reminder is created), hence the returned Action.
pub fn handle_app_event(state: &mut AppState, event: AppEvent) -> Option<Action> {
    match event {
        AppEvent::Status(s) => state.message = s,
        AppEvent::Error(s) => state.message = format!("Error: {}", s),
        AppEvent::InventoryLoaded { seq, result } => {
            if state.inventory.complete_fetch(seq, result) {
                state.clamp_selection();
            }
        }
        AppEvent::ReminderSubmitted(Ok(())) => {
            state.reset_wizard();
            state.screen = Screen::Inventory;
            state.message = "Reminder created.".to_string();
            let seq = state.inventory.begin_fetch();
            return Some(Action::FetchInventory { seq });
        }
        AppEvent::ReminderSubmitted(Err(e)) => {
            state.submitting = false;
            state.form_error = Some(e.to_string());
        }
        AppEvent::HospitalsLoaded(Ok(hospitals)) => {
            state.scan_loading = false;
            state.message = format!("Found {} hospital(s) nearby.", hospitals.len());
            state.hospitals = hospitals;
        }
        AppEvent::HospitalsLoaded(Err(_)) => {
            state.scan_loading = false;
            state.modal_message =
                Some("Unable to scan for hospitals. Please try again later.".to_string());
        }
        AppEvent::ReportReady(Ok(path)) => {
            state.report_loading = false;
            state.modal_message = Some(format!("Report saved to {}", path.display()));
        }
        AppEvent::ReportReady(Err(_)) => {
            state.report_loading = false;
            state.modal_message =
                Some("Unable to generate the report. Please try again later.".to_string());
        }
    }
    None
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    // A modal swallows every key until dismissed.
    if state.modal_message.is_some() {
        state.modal_message = None;
        return None;
    }

    if state.screen == Screen::AddReminder {
        return handle_wizard_key(key, state);
    }

    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('1') => {
            state.screen = Screen::Dashboard;
            // Mirrors the mobile app: every dashboard visit re-registers the
            // device token. The endpoint is idempotent.
            if let Some(token) = &state.session.push_token {
                return Some(Action::RegisterPushToken(token.clone()));
            }
        }
        KeyCode::Char('2') => {
            state.screen = Screen::Inventory;
            let seq = state.inventory.begin_fetch();
            return Some(Action::FetchInventory { seq });
        }
        KeyCode::Char('3') => state.screen = Screen::Connect,
        KeyCode::Char('a') => {
            state.reset_wizard();
            state.screen = Screen::AddReminder;
        }
        _ => {}
    }

    match state.screen {
        Screen::Inventory => match key.code {
            KeyCode::Down | KeyCode::Char('j') => state.next(),
            KeyCode::Up | KeyCode::Char('k') => state.previous(),
            KeyCode::Char('s') => {
                state
                    .inventory
                    .set_sort_criteria(state.inventory.criteria().next());
                let seq = state.inventory.begin_fetch();
                return Some(Action::FetchInventory { seq });
            }
            KeyCode::Char('r') => {
                let seq = state.inventory.begin_fetch();
                return Some(Action::FetchInventory { seq });
            }
            _ => {}
        },
        Screen::Connect => match key.code {
            KeyCode::Char('g') if !state.report_loading => {
                state.report_loading = true;
                return Some(Action::GenerateReport(ReportData::sample(
                    &state.session.user_name,
                    &state.session.user_email,
                )));
            }
            KeyCode::Char('h') if !state.scan_loading => {
                state.scan_loading = true;
                return Some(Action::ScanHospitals);
            }
            _ => {}
        },
        _ => {}
    }
    None
}

fn handle_wizard_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    // Esc abandons the wizard from any page; the draft never survives it.
    if key.code == KeyCode::Esc {
        state.reset_wizard();
        state.screen = Screen::Dashboard;
        return None;
    }

    match state.wizard_page {
        WizardPage::Name => match key.code {
            KeyCode::Enter => {
                let name = state.input_buffer.clone();
                match state.draft.set_medication_name(&name) {
                    Ok(()) => {
                        state.form_error = None;
                        state.reset_input();
                        state.wizard_page = WizardPage::Frequency;
                    }
                    Err(e) => state.form_error = Some(e.to_string()),
                }
            }
            KeyCode::Char(c) => state.enter_char(c),
            KeyCode::Backspace => state.delete_char(),
            KeyCode::Left => state.move_cursor_left(),
            KeyCode::Right => state.move_cursor_right(),
            _ => {}
        },
        WizardPage::Frequency => match key.code {
            KeyCode::Down | KeyCode::Char('j') => state.next_frequency(),
            KeyCode::Up | KeyCode::Char('k') => state.previous_frequency(),
            KeyCode::Enter => {
                let frequency = state.selected_frequency();
                match state.draft.set_frequency(frequency) {
                    Ok(()) => {
                        state.time_inputs = vec![String::new(); frequency.dose_count()];
                        state.time_index = 0;
                        state.form_error = None;
                        state.wizard_page = WizardPage::Times;
                    }
                    Err(e) => state.form_error = Some(e.to_string()),
                }
            }
            _ => {}
        },
        WizardPage::Times => match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => {
                state.time_inputs[state.time_index].push(c);
            }
            KeyCode::Backspace => {
                state.time_inputs[state.time_index].pop();
            }
            KeyCode::Enter => {
                if parse_time_of_day(&state.time_inputs[state.time_index]).is_none() {
                    state.form_error =
                        Some("Please enter a valid time in HH:MM format.".to_string());
                } else if state.time_index + 1 < state.time_inputs.len() {
                    state.time_index += 1;
                    state.form_error = None;
                } else {
                    let times: Vec<_> = state
                        .time_inputs
                        .iter()
                        .filter_map(|t| parse_time_of_day(t))
                        .collect();
                    match state.draft.set_times(times) {
                        Ok(()) => {
                            state.dosage_inputs = vec![String::new(); state.time_inputs.len()];
                            state.dosage_index = 0;
                            state.form_error = None;
                            state.wizard_page = WizardPage::Dosages;
                        }
                        Err(e) => state.form_error = Some(e.to_string()),
                    }
                }
            }
            _ => {}
        },
        WizardPage::Dosages => match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                state.dosage_inputs[state.dosage_index].push(c);
            }
            KeyCode::Backspace => {
                state.dosage_inputs[state.dosage_index].pop();
            }
            KeyCode::Enter => {
                if state.dosage_index + 1 < state.dosage_inputs.len() {
                    state.dosage_index += 1;
                } else {
                    let counts = state.dosage_inputs.clone();
                    match state.draft.set_dosages(&counts) {
                        Ok(()) => {
                            state.form_error = None;
                            state.wizard_page = WizardPage::Compartment;
                        }
                        Err(e) => state.form_error = Some(e.to_string()),
                    }
                }
            }
            _ => {}
        },
        WizardPage::Compartment => match key.code {
            KeyCode::Char(c) => {
                // The draft drops anything outside 1..=5 on its own.
                let candidate = format!("{}{}", state.draft.compartment(), c);
                state.draft.set_compartment(&candidate);
            }
            KeyCode::Backspace => {
                let current = state.draft.compartment();
                let mut chars = current.chars();
                chars.next_back();
                let candidate = chars.as_str().to_string();
                state.draft.set_compartment(&candidate);
            }
            KeyCode::Enter => match state.draft.finalize_compartment() {
                Ok(()) => {
                    state.form_error = None;
                    state.wizard_page = WizardPage::Confirm;
                }
                Err(e) => state.form_error = Some(e.to_string()),
            },
            _ => {}
        },
        WizardPage::Confirm => {
            if key.code == KeyCode::Enter && !state.submitting {
                match state.draft.payload() {
                    Ok(payload) => {
                        state.submitting = true;
                        return Some(Action::SubmitReminder(payload));
                    }
                    Err(e) => state.form_error = Some(e.to_string()),
                }
            }
        }
    }
    None
}
