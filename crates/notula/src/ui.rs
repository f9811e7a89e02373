use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use editcore::{Tag, TagRange};

use crate::app::{App, Mode};
use crate::menu::MenuItem;
use crate::status_manager::MessageType;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(1), // Menu bar
            Constraint::Min(0),    // Editor area
            Constraint::Length(2), // Status bar
        ])
        .split(f.size());

    draw_title_bar(f, app, chunks[0]);
    draw_menu_bar(f, app, chunks[1]);
    draw_editor(f, app, chunks[2]);
    draw_status_bar(f, app, chunks[3]);

    if app.ui_state.mode == Mode::Menu {
        draw_menu_dropdown(f, app, chunks[1], chunks[2]);
    }
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.file_manager.current_path() {
        Some(path) => format!("  Notula -- {}", path.display()),
        None => String::from("  Notula -- [New File]"),
    };

    let modified_str = if app.editor.is_modified() { " [Modified]" } else { "" };
    let title = format!("{}{}", title, modified_str);

    let title_bar = Paragraph::new(title)
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(title_bar, area);
}

fn draw_menu_bar(f: &mut Frame, app: &App, area: Rect) {
    let in_menu = app.ui_state.mode == Mode::Menu;
    let mut spans = Vec::new();

    for (i, menu) in app.menu_bar.menus().iter().enumerate() {
        let label = format!(" {} ", menu.title);
        if in_menu && i == app.menu_bar.selected_menu() {
            spans.push(Span::styled(
                label,
                Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(label));
        }
        spans.push(Span::raw(" "));
    }

    let menu_bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(menu_bar, area);
}

fn draw_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let total_lines = app.editor.line_count();
    let gutter_width = (digit_count(total_lines) + 2) as u16;

    let editor_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(gutter_width), // Line numbers
            Constraint::Min(0),               // Editor content
        ])
        .split(area);

    app.editor.set_viewport_height(area.height as usize);

    let base_style = Style::default()
        .fg(parse_color(&app.config.theme.editor_foreground))
        .bg(parse_color(&app.config.theme.editor_background));

    draw_gutter(f, app, editor_area[0], gutter_width);

    // Content, with search and keyword tags styled per line
    let viewport_offset = app.editor.get_viewport_offset();
    let lines = app.editor.get_viewport_lines();
    let mut text_lines = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line_str = line.trim_end_matches('\n');
        let line_start = app.editor.line_start_byte(viewport_offset + i);
        text_lines.push(styled_line(line_str, line_start, &app.derived.tags, base_style));
    }

    let editor_content = Paragraph::new(text_lines).style(base_style);
    f.render_widget(editor_content, editor_area[1]);

    // The terminal cursor is only meaningful while editing
    if app.ui_state.mode == Mode::Edit {
        let (cursor_line, cursor_col) = app.editor.cursor_position();
        if cursor_line >= viewport_offset && cursor_line < viewport_offset + lines.len() {
            let screen_line = cursor_line - viewport_offset;
            let line_str = lines[screen_line].trim_end_matches('\n');
            let prefix: String = line_str.chars().take(cursor_col).collect();
            let x = editor_area[1].x + prefix.width() as u16;
            let y = editor_area[1].y + screen_line as u16;

            if x < editor_area[1].x + editor_area[1].width
                && y < editor_area[1].y + editor_area[1].height
            {
                f.set_cursor(x, y);
            }
        }
    }
}

fn draw_gutter(f: &mut Frame, app: &App, area: Rect, gutter_width: u16) {
    let style = Style::default()
        .fg(parse_color(&app.config.theme.gutter_foreground))
        .bg(parse_color(&app.config.theme.gutter_background));

    let viewport_offset = app.editor.get_viewport_offset();
    let visible = app.editor.get_viewport_lines().len();
    let width = gutter_width.saturating_sub(1) as usize;

    let numbers: Vec<Line> = app
        .derived
        .gutter
        .lines()
        .skip(viewport_offset)
        .take(visible)
        .map(|n| Line::from(format!("{:>width$} ", n, width = width)))
        .collect();

    let gutter_widget = Paragraph::new(numbers).style(style);
    f.render_widget(gutter_widget, area);
}

/// Split one line of content into styled spans. `line_start` is the byte
/// offset of the line in the full content; `tags` are sorted and disjoint.
fn styled_line<'a>(
    line: &'a str,
    line_start: usize,
    tags: &[TagRange],
    base: Style,
) -> Line<'a> {
    let line_end = line_start + line.len();
    let mut spans = Vec::new();
    let mut pos = 0usize; // byte offset within the line

    for tag in tags {
        if tag.end <= line_start || tag.start >= line_end {
            continue;
        }
        let start = tag.start.max(line_start) - line_start;
        let end = tag.end.min(line_end) - line_start;
        if start > pos {
            spans.push(Span::styled(&line[pos..start], base));
        }
        spans.push(Span::styled(&line[start..end], tag_style(&tag.tag, base)));
        pos = end;
    }

    if pos < line.len() {
        spans.push(Span::styled(&line[pos..], base));
    }
    if spans.is_empty() {
        spans.push(Span::styled("", base));
    }

    Line::from(spans)
}

fn tag_style(tag: &Tag, base: Style) -> Style {
    match tag {
        Tag::Found => base.fg(Color::Red).bg(Color::Yellow),
        Tag::Keyword(_) => base.fg(Color::Blue),
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Prompt input or shortcut hints
            Constraint::Length(1), // Status message and cursor position
        ])
        .split(area);

    match app.ui_state.mode {
        Mode::Prompt => {
            let label = app
                .ui_state
                .prompt_kind()
                .map(|k| k.label())
                .unwrap_or("");
            let input = Paragraph::new(format!("{}{}", label, app.ui_state.prompt_buffer()))
                .style(Style::default().fg(Color::Yellow));
            f.render_widget(input, chunks[0]);
            f.set_cursor(
                chunks[0].x + (label.width() + app.ui_state.prompt_buffer().width()) as u16,
                chunks[0].y,
            );
        }
        _ => {
            let shortcuts = vec![
                Span::styled("F10", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw(" Menu  "),
                Span::styled("^S", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw(" Save  "),
                Span::styled("^F", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw(" Find  "),
                Span::styled("^H", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw(" Replace  "),
                Span::styled("^Z", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw(" Undo  "),
                Span::styled("^Q", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw(" Quit"),
            ];

            let shortcut_bar = Paragraph::new(Line::from(shortcuts))
                .style(Style::default().bg(Color::DarkGray));
            f.render_widget(shortcut_bar, chunks[0]);
        }
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Message
            Constraint::Length(24), // Cursor position
        ])
        .split(chunks[1]);

    let message_style = match app.ui_state.status_manager.current_message() {
        Some(m) => Style::default().fg(message_color(&m.message_type)),
        None => Style::default(),
    };
    let status = Paragraph::new(app.ui_state.status_message().to_string()).style(message_style);
    f.render_widget(status, bottom[0]);

    let position = Paragraph::new(app.derived.cursor_status.clone())
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::White));
    f.render_widget(position, bottom[1]);
}

fn message_color(message_type: &MessageType) -> Color {
    match message_type {
        MessageType::Info => Color::Cyan,
        MessageType::Success => Color::Green,
        MessageType::Warning => Color::Yellow,
        MessageType::Error => Color::Red,
    }
}

fn draw_menu_dropdown(f: &mut Frame, app: &App, bar_area: Rect, editor_area: Rect) {
    let selected = app.menu_bar.selected_menu();
    let menu = &app.menu_bar.menus()[selected];

    // X offset of the selected title within the bar
    let mut x = bar_area.x;
    for m in app.menu_bar.menus().iter().take(selected) {
        x += (m.title.width() + 3) as u16;
    }

    let inner_width = menu
        .items
        .iter()
        .map(|item| match item {
            MenuItem::Action(_, label) => label.width() + 2,
            MenuItem::Separator => 2,
        })
        .max()
        .unwrap_or(2) as u16;
    let width = (inner_width + 2).min(editor_area.width);
    let height = (menu.items.len() as u16 + 2).min(editor_area.height);
    let x = x.min(editor_area.right().saturating_sub(width));

    let area = Rect::new(x, editor_area.y, width, height);

    let lines: Vec<Line> = menu
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            MenuItem::Action(_, label) => {
                let text = format!(" {} ", label);
                if i == app.menu_bar.selected_item() {
                    Line::from(Span::styled(
                        text,
                        Style::default().add_modifier(Modifier::REVERSED),
                    ))
                } else {
                    Line::from(text)
                }
            }
            MenuItem::Separator => Line::from(Span::styled(
                "─".repeat(inner_width as usize),
                Style::default().fg(Color::DarkGray),
            )),
        })
        .collect();

    let dropdown = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(Clear, area);
    f.render_widget(dropdown, area);
}

fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

fn parse_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    // Byte slicing below requires ASCII; config files are hand-editable
    if hex.is_ascii() && hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::Reset
}
