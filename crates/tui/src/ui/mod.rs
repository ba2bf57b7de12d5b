//! Rendering for the sidebar shell.
//!
//! Every draw records the screen region of each element it renders so the
//! app can resolve mouse clicks to document elements. Regions are recorded
//! bottom-up: page content first, then the trigger, then the sidebar and its
//! rows.

mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, RowTarget, SidebarRow};
use theme::ThemeRoles;

/// Collapsed desktop rail, icon-only.
pub const RAIL_WIDTH: u16 = 8;
/// Expanded desktop rail and the mobile overlay.
pub const EXPANDED_WIDTH: u16 = 30;
const HEADER_HEIGHT: u16 = 3;
const TRIGGER_WIDTH: u16 = 10;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.set_viewport_width(area.width);
    app.clear_hits();
    let theme = ThemeRoles::default();
    if app.is_mobile() {
        draw_mobile(frame, area, app, &theme);
    } else {
        draw_desktop(frame, area, app, &theme);
    }
}

fn draw_desktop(frame: &mut Frame, area: Rect, app: &mut App, theme: &ThemeRoles) {
    let width = if app.shows_labels() { EXPANDED_WIDTH } else { RAIL_WIDTH };
    let [sidebar_area, content_area] = Layout::horizontal([Constraint::Length(width.min(area.width)), Constraint::Min(0)]).areas(area);
    draw_content(frame, content_area, app, theme);
    draw_sidebar(frame, sidebar_area, app, theme);
}

fn draw_mobile(frame: &mut Frame, area: Rect, app: &mut App, theme: &ThemeRoles) {
    let [header, body] = Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);
    draw_content(frame, body, app, theme);

    let [trigger_area, title_area] = Layout::horizontal([Constraint::Length(TRIGGER_WIDTH), Constraint::Min(0)]).areas(header);
    let open = app.panel.is_open_on_mobile();
    let trigger = Paragraph::new(Line::from(if open { " ✕ Close" } else { " ☰ Menu" }))
        .style(theme.text_primary_style())
        .block(Block::bordered().border_style(theme.border_style(open)));
    frame.render_widget(trigger, trigger_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", app.panel.current_path()), theme.text_muted_style())))
            .block(Block::bordered().border_style(theme.border_style(false))),
        title_area,
    );
    app.record_hit(trigger_area, app.panel.elements().trigger);

    if open {
        let overlay = Rect {
            x: area.x,
            y: body.y,
            width: EXPANDED_WIDTH.min(area.width),
            height: body.height,
        };
        frame.render_widget(Clear, overlay);
        draw_sidebar(frame, overlay, app, theme);
    }
}

fn draw_content(frame: &mut Frame, area: Rect, app: &mut App, theme: &ThemeRoles) {
    let path = app.panel.current_path().to_string();
    let classes = app.document.root_classes();
    let lines = vec![
        Line::from(vec![Span::styled("Route          ", theme.text_muted_style()), Span::raw(path.clone())]),
        Line::from(vec![
            Span::styled("Overlay open   ", theme.text_muted_style()),
            Span::raw(app.panel.is_open_on_mobile().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Rail expanded  ", theme.text_muted_style()),
            Span::raw(app.panel.is_expanded_on_desktop().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Root classes   ", theme.text_muted_style()),
            Span::raw(if classes.is_empty() { "(none)".to_string() } else { classes.join(" ") }),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "↑/↓ select · Enter activate · m menu · e expand · Esc close · q quit",
            theme.text_muted_style(),
        )),
    ];
    let block = Block::bordered().title(format!(" {path} ")).border_style(theme.border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
    app.record_hit(area, app.content_element());
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &mut App, theme: &ThemeRoles) {
    let labelled = app.shows_labels();
    let block = Block::bordered()
        .title(if labelled { " Menu " } else { "" })
        .border_style(theme.border_style(app.panel.is_open_on_mobile()));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.record_hit(area, app.panel.elements().panel);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut rows = app.rows();
    let footer = rows.last().filter(|row| row.target == Some(RowTarget::ExpandToggle)).cloned();
    if footer.is_some() {
        rows.pop();
    }
    let selected = app.selected_element();
    let list_height = if footer.is_some() { inner.height.saturating_sub(1) } else { inner.height };
    let selected_position = rows.iter().position(|row| selected == Some(row.element));
    app.list_offset = scroll_offset(app.list_offset, selected_position, rows.len(), list_height as usize);

    for (offset, row) in rows.iter().skip(app.list_offset).take(list_height as usize).enumerate() {
        let row_area = Rect {
            y: inner.y + offset as u16,
            height: 1,
            ..inner
        };
        render_row(frame, row_area, row, labelled, selected == Some(row.element), theme);
        app.record_hit(row_area, row.element);
    }

    if let Some(row) = footer {
        let row_area = Rect {
            y: inner.bottom().saturating_sub(1),
            height: 1,
            ..inner
        };
        render_row(frame, row_area, &row, labelled, selected == Some(row.element), theme);
        app.record_hit(row_area, row.element);
    }
}

/// Smallest change to `current` that keeps `selected` inside a window of
/// `height` rows and does not scroll past the end of the list.
fn scroll_offset(current: usize, selected: Option<usize>, len: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    let mut offset = current.min(len.saturating_sub(height));
    if let Some(selected) = selected {
        if selected < offset {
            offset = selected;
        } else if selected >= offset + height {
            offset = selected + 1 - height;
        }
    }
    offset
}

fn render_row(frame: &mut Frame, area: Rect, row: &SidebarRow, labelled: bool, selected: bool, theme: &ThemeRoles) {
    let text = row_text(row, labelled);
    let style = match (&row.target, row.active) {
        (None, _) => theme.text_muted_style(),
        (_, true) => theme.active_style(),
        _ => theme.text_primary_style(),
    };
    let style = if selected { style.patch(theme.selection_style()) } else { style };
    frame.render_widget(Paragraph::new(Line::from(truncate(&text, area.width as usize))).style(style), area);
}

fn row_text(row: &SidebarRow, labelled: bool) -> String {
    match (&row.target, labelled) {
        (None, true) => row.label.to_uppercase(),
        (None, false) => "···".to_string(),
        (Some(RowTarget::Group(_)), true) => format!("{} {}", if row.open { "▾" } else { "▸" }, row.label),
        (Some(RowTarget::Link(_)), true) => format!("{}{}", "  ".repeat(row.depth as usize + 1), row.label),
        (Some(RowTarget::ExpandToggle), true) => format!("« {}", row.label),
        (Some(RowTarget::ExpandToggle), false) => " »".to_string(),
        (Some(_), false) => format!(" {}", initial(&row.label)),
    }
}

fn initial(label: &str) -> String {
    label.chars().next().map(|ch| ch.to_uppercase().collect()).unwrap_or_default()
}

/// Fit `text` into `width` terminal columns, marking cuts with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    if width > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use railnav_types::{NavigationTree, SIDEBAR_EXPANDED_CLASS};
    use railnav_util::UserPreferences;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(width, height)).unwrap()
    }

    fn render(terminal: &mut Terminal<TestBackend>, app: &mut App) -> String {
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn app(path: &str) -> App {
        App::new(Rc::new(UserPreferences::ephemeral()), NavigationTree::builtin().unwrap(), path)
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("Dashboard", 20), "Dashboard");
        assert_eq!(truncate("Dashboard", 5), "Dash…");
        assert_eq!(truncate("日本語", 4), "日…");
    }

    #[test]
    fn scroll_offset_follows_selection() {
        assert_eq!(scroll_offset(0, Some(3), 20, 5), 0);
        assert_eq!(scroll_offset(0, Some(7), 20, 5), 3);
        assert_eq!(scroll_offset(6, Some(2), 20, 5), 2);
        assert_eq!(scroll_offset(18, None, 20, 5), 15);
        assert_eq!(scroll_offset(4, Some(1), 3, 5), 0);
        assert_eq!(scroll_offset(4, Some(1), 20, 0), 0);
    }

    #[test]
    fn selected_row_stays_visible_in_a_short_sidebar() {
        let mut term = terminal(120, 12);
        let mut app = app("/");
        app.panel.set_expanded(true);
        let target = Some(RowTarget::Group(railnav_types::GroupId::new("authentication")));
        while app.selected_target() != target {
            app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }

        let screen = render(&mut term, &mut app);
        assert!(screen.contains("▸ Authentication"));
        let selected = app.selected_element();
        assert!((1..11).any(|row| app.hit_test(2, row) == selected));

        while app.selected_target() != Some(RowTarget::Group(railnav_types::GroupId::new("dashboard"))) {
            app.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        }
        let screen = render(&mut term, &mut app);
        assert!(screen.contains("▾ Dashboard"));
    }

    #[test]
    fn collapsed_rail_expands_from_footer_click() {
        let mut term = terminal(120, 30);
        let mut app = app("/dashboard");
        let screen = render(&mut term, &mut app);
        assert!(!screen.contains("Circle"));

        click(&mut app, 2, 28);
        assert!(app.panel.is_expanded_on_desktop());
        assert!(app.document.has_root_class(SIDEBAR_EXPANDED_CLASS));

        let screen = render(&mut term, &mut app);
        assert!(screen.contains("▾ Dashboard"));
        assert!(screen.contains("Circle"));
        assert!(screen.contains("« Collapse"));
    }

    #[test]
    fn clicking_a_group_row_toggles_it_and_expands() {
        let mut term = terminal(120, 30);
        let mut app = app("/dashboard");
        render(&mut term, &mut app);
        assert!(app.panel.is_group_open("dashboard"));

        // Row 1 holds the section heading, row 2 the first group.
        click(&mut app, 2, 2);
        assert!(!app.panel.is_group_open("dashboard"));
        assert!(app.panel.is_expanded_on_desktop());
    }

    #[test]
    fn mobile_trigger_opens_and_outside_click_dismisses() {
        let mut term = terminal(60, 20);
        let mut app = app("/");
        let screen = render(&mut term, &mut app);
        assert!(screen.contains("☰ Menu"));

        click(&mut app, 2, 1);
        assert!(app.panel.is_open_on_mobile());
        let screen = render(&mut term, &mut app);
        assert!(screen.contains("PAGES"));

        click(&mut app, 5, 6);
        assert!(app.panel.is_open_on_mobile(), "click inside the overlay keeps it open");

        click(&mut app, 50, 10);
        assert!(!app.panel.is_open_on_mobile());
        let screen = render(&mut term, &mut app);
        assert!(!screen.contains("PAGES"));
    }

    #[test]
    fn trigger_click_closes_an_open_overlay() {
        let mut term = terminal(60, 20);
        let mut app = app("/");
        render(&mut term, &mut app);
        click(&mut app, 2, 1);
        render(&mut term, &mut app);
        click(&mut app, 2, 1);
        assert!(!app.panel.is_open_on_mobile());
    }
}
