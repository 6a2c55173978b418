use crate::model::Frequency;
use crate::tui::state::{AppState, Screen, WizardPage};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_tabs(f, state, v_chunks[0]);

    match state.screen {
        Screen::Dashboard => draw_dashboard(f, state, v_chunks[1]),
        Screen::Inventory => draw_inventory(f, state, v_chunks[1]),
        Screen::Connect => draw_connect(f, state, v_chunks[1]),
        Screen::AddReminder => draw_wizard(f, state, v_chunks[1]),
    }

    draw_footer(f, state, v_chunks[2]);

    if let Some(msg) = state.modal_message.clone() {
        let area = centered_rect(60, 30, f.area());
        let popup = Paragraph::new(format!("{}\n\n(press any key)", msg))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Notice ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn draw_tabs(f: &mut Frame, state: &AppState, area: Rect) {
    let tab = |label: &str, screen: Screen| {
        if state.screen == screen {
            Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::DarkGray))
        }
    };

    let line = Line::from(vec![
        tab("1:Dashboard", Screen::Dashboard),
        tab("2:Inventory", Screen::Inventory),
        tab("3:Connect", Screen::Connect),
        tab("a:Add Reminder", Screen::AddReminder),
    ]);
    let tabs = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" remedix ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(tabs, area);
}

fn draw_dashboard(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines = vec![
        Line::from(format!("Welcome back, {}!", state.session.user_name)),
        Line::from(""),
    ];
    if state.session.push_token.is_some() {
        lines.push(Line::from(Span::styled(
            "Push notifications: enabled",
            Style::default().fg(Color::Green),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Push notifications: not configured",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("2: view inventory    a: add a reminder"));
    lines.push(Line::from("3: device & reports"));

    let dashboard = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Dashboard "));
    f.render_widget(dashboard, area);
}

fn draw_inventory(f: &mut Frame, state: &mut AppState, area: Rect) {
    let items: Vec<ListItem> = state
        .inventory
        .items()
        .iter()
        .map(|i| {
            // Low stock stands out; the threshold matches the dispenser's
            // refill warning.
            let style = if i.stock <= 3 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            let text = format!(
                "{:<24} stock: {:<4} slot: {}  exp: {}",
                i.medicine_name,
                i.stock,
                i.compartment,
                i.expiration_date.format("%Y-%m-%d")
            );
            ListItem::new(Line::from(vec![Span::styled(text, style)]))
        })
        .collect();

    let title = if state.inventory.is_loading() {
        " Inventory (Loading...) ".to_string()
    } else {
        format!(
            " Inventory ({}) [sort: {}] ",
            state.inventory.items().len(),
            state.inventory.criteria().label()
        )
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(list, area, &mut state.list_state);

    if let Some(err) = state.inventory.error() {
        let area = centered_rect(70, 20, area);
        let popup = Paragraph::new(err.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Error "));
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    } else if state.inventory.items().is_empty() && !state.inventory.is_loading() {
        let empty = Paragraph::new("No medicine found. Press 'a' to add a reminder.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(empty, centered_rect(70, 20, area));
    }
}

fn draw_connect(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let report_line = if state.report_loading {
        "g: generating report..."
    } else {
        "g: generate health & medication report"
    };
    let scan_line = if state.scan_loading {
        "h: scanning for hospitals..."
    } else {
        "h: find nearby hospitals"
    };
    let actions = Paragraph::new(vec![
        Line::from(report_line),
        Line::from(scan_line),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Connect "));
    f.render_widget(actions, chunks[0]);

    let hospital_items: Vec<ListItem> = state
        .hospitals
        .iter()
        .map(|h| {
            ListItem::new(Line::from(format!(
                "{} ({:.4}, {:.4})",
                h.name, h.latitude, h.longitude
            )))
        })
        .collect();
    let hospitals = List::new(hospital_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Nearby Hospitals ({}) ", state.hospitals.len())),
    );
    f.render_widget(hospitals, chunks[1]);
}

fn draw_wizard(f: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    // What the draft has accepted so far.
    let mut summary = vec![Line::from(format!(
        "Name: {}",
        state.draft.medication_name()
    ))];
    if let Some(freq) = state.draft.frequency() {
        summary.push(Line::from(format!("Frequency: {}", freq.label())));
    }
    let progress = Paragraph::new(summary).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" New Reminder "),
    );
    f.render_widget(progress, chunks[0]);

    match state.wizard_page {
        WizardPage::Name => {
            let input = Paragraph::new(format!("> {}", state.input_buffer))
                .style(Style::default().fg(Color::Yellow))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Medication name "),
                );
            f.render_widget(input, chunks[1]);
            let cursor_x = chunks[1].x + 3 + state.cursor_position as u16;
            f.set_cursor_position((cursor_x, chunks[1].y + 1));
        }
        WizardPage::Frequency => {
            let items: Vec<ListItem> = Frequency::ALL
                .iter()
                .map(|freq| ListItem::new(freq.label()))
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" How often? "),
                )
                .highlight_style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .bg(Color::Blue),
                );
            f.render_stateful_widget(list, chunks[1], &mut state.freq_state);
        }
        WizardPage::Times => {
            let items: Vec<ListItem> = state
                .time_inputs
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let marker = if i == state.time_index { "> " } else { "  " };
                    ListItem::new(format!("{}Time {} (HH:MM): {}", marker, i + 1, t))
                })
                .collect();
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Reminder times "),
            );
            f.render_widget(list, chunks[1]);
        }
        WizardPage::Dosages => {
            let items: Vec<ListItem> = state
                .dosage_inputs
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    let marker = if i == state.dosage_index { "> " } else { "  " };
                    ListItem::new(format!("{}Pill(s) at time {}: {}", marker, i + 1, d))
                })
                .collect();
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" How many pill(s)? "),
            );
            f.render_widget(list, chunks[1]);
        }
        WizardPage::Compartment => {
            let input = Paragraph::new(format!("> {}", state.draft.compartment()))
                .style(Style::default().fg(Color::Yellow))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Compartment (1-5) "),
                );
            f.render_widget(input, chunks[1]);
        }
        WizardPage::Confirm => {
            let mut lines = vec![Line::from("Review and press Enter to save:"), Line::from("")];
            for entry in state.draft.dosages() {
                lines.push(Line::from(format!(
                    "  {} - {} pill(s)",
                    entry.time.format("%H:%M"),
                    entry.dosage
                )));
            }
            lines.push(Line::from(format!(
                "  Compartment {}",
                state.draft.compartment()
            )));
            if state.submitting {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Saving...",
                    Style::default().fg(Color::Yellow),
                )));
            }
            let confirm = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Confirm "));
            f.render_widget(confirm, chunks[1]);
        }
    }

    let error_text = state.form_error.clone().unwrap_or_default();
    let error = Paragraph::new(error_text)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(error, chunks[2]);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );

    let help_str = match state.screen {
        Screen::Dashboard => "1/2/3:Screens | a:Add | q:Quit",
        Screen::Inventory => "j/k:Move | s:Sort | r:Refresh | q:Quit",
        Screen::Connect => "g:Report | h:Hospitals | q:Quit",
        Screen::AddReminder => "Enter:Next | Esc:Cancel",
    };
    let help = Paragraph::new(help_str)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

/// Helper function to create a centered rect using up certain percentages of the available rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
