use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::dashboard::DashboardSnapshot;
use crate::notify::{Toast, ToastKind};
use crate::tui::app::{FormField, ResultView, Tab, TuiApp};
use crate::tui::results;

pub fn render(
    frame: &mut Frame,
    app: &mut TuiApp,
    snapshot: &DashboardSnapshot,
    toast: Option<&Toast>,
    colors: &ColorConfig,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Active tab
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0], colors);
    match app.tab {
        Tab::Scraper => render_scraper(frame, app, chunks[1], colors),
        Tab::Dashboard => render_dashboard(frame, app, snapshot, chunks[1], colors),
        Tab::Results => render_results(frame, app, chunks[1], colors),
    }
    render_status_bar(frame, app, toast, chunks[2], colors);
}

fn border_style(active: bool, colors: &ColorConfig) -> Style {
    if active {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    }
}

fn render_tabs(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" webintel ")
                .borders(Borders::ALL)
                .border_style(border_style(false, colors)),
        )
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(colors.active_border)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_scraper(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // URL
            Constraint::Length(3), // Prompt
            Constraint::Length(3), // Options
            Constraint::Min(3),    // Help
        ])
        .split(area);

    let form = &app.form;
    let input = |label: &str, value: &str, field: FormField| {
        let focused = form.focus == field;
        let cursor = if focused && form.editing { "▏" } else { "" };
        Paragraph::new(format!("{}{}", value, cursor)).block(
            Block::default()
                .title(format!(" {} ", label))
                .borders(Borders::ALL)
                .border_style(border_style(focused, colors)),
        )
    };

    frame.render_widget(input("URL", &form.url, FormField::Url), chunks[0]);
    frame.render_widget(
        input("Custom prompt (optional)", &form.prompt, FormField::Prompt),
        chunks[1],
    );

    let on_off = |on: bool| if on { "ON" } else { "OFF" };
    let options = Line::from(vec![
        Span::raw("AI analysis: "),
        Span::styled(
            on_off(form.analyze_with_ai),
            Style::default()
                .fg(if form.analyze_with_ai {
                    colors.success
                } else {
                    colors.inactive_border
                })
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("    Method: "),
        Span::styled(
            form.method.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(if app.submitting { "    Working..." } else { "" }),
    ]);
    frame.render_widget(
        Paragraph::new(options).block(
            Block::default()
                .title(" Options ")
                .borders(Borders::ALL)
                .border_style(border_style(false, colors)),
        ),
        chunks[2],
    );

    let help = Text::from(vec![
        Line::from("e/i: edit field   Enter: scrape (URL) or finish editing   j/k: switch field"),
        Line::from("s: scrape and save   v: preview only   t: toggle AI   M: cycle method"),
    ]);
    frame.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(colors.inactive_border))
            .wrap(Wrap { trim: true }),
        chunks[3],
    );
}

fn render_dashboard(
    frame: &mut Frame,
    app: &mut TuiApp,
    snapshot: &DashboardSnapshot,
    area: Rect,
    colors: &ColorConfig,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stat cards
            Constraint::Length(1), // Refresh line
            Constraint::Min(5),    // Records
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    let stats = snapshot.statistics;
    let card_values = [
        ("Total Scraped", stats.map(|s| s.total_scraped)),
        ("Unique URLs", stats.map(|s| s.unique_urls)),
        ("Recent (24h)", stats.map(|s| s.recent_scrapes)),
    ];
    for ((label, value), area) in card_values.iter().zip(cards.iter()) {
        let text = value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let card = Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .block(
            Block::default()
                .title(format!(" {} ", label))
                .borders(Borders::ALL)
                .border_style(border_style(false, colors)),
        );
        frame.render_widget(card, *area);
    }

    let now = Utc::now();
    let refresh = &snapshot.refresh;
    let refresh_line = Line::from(vec![
        Span::raw(" Auto-refresh: "),
        Span::styled(
            if refresh.auto_refresh_enabled { "ON" } else { "OFF" },
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(if refresh.auto_refresh_enabled {
            format!("  next in {}s", refresh.countdown_seconds)
        } else {
            String::new()
        }),
        Span::raw(format!("  ·  {}", snapshot.last_updated_label(now))),
        Span::raw(if snapshot.loading { "  ·  Loading..." } else { "" }),
    ]);
    frame.render_widget(Paragraph::new(refresh_line), chunks[1]);

    let rows = snapshot.rows(now);
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let mut spans = vec![
                Span::styled("● ", Style::default().fg(colors.freshness(row.freshness))),
                Span::raw(format!("{:>8}  ", row.age)),
                Span::styled(
                    row.record.display_title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ];
            if row.is_recent {
                spans.push(Span::styled(" NEW", Style::default().fg(colors.success)));
            }
            spans.push(Span::styled(
                format!("  {}", row.record.url),
                Style::default().fg(colors.link),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(
        " Recent Scrapes ({}) [{}/{}] ",
        rows.len(),
        (app.record_index + 1).min(rows.len().max(1)),
        rows.len().max(1)
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style(true, colors)),
        )
        .highlight_style(
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    if rows.is_empty() {
        let empty = Paragraph::new(if snapshot.refresh.last_updated_at.is_some() {
            "No records yet. Scrape a URL to get started."
        } else {
            "Loading dashboard..."
        })
        .block(
            Block::default()
                .title(" Recent Scrapes ")
                .borders(Borders::ALL)
                .border_style(border_style(true, colors)),
        );
        frame.render_widget(empty, chunks[2]);
    } else {
        frame.render_stateful_widget(list, chunks[2], &mut app.record_list_state);
    }
}

fn render_results(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    let views: Vec<Line> = ResultView::ALL
        .iter()
        .map(|v| Line::from(v.title()))
        .collect();
    frame.render_widget(
        Tabs::new(views)
            .select(app.result_view.index())
            .highlight_style(
                Style::default()
                    .fg(colors.active_border)
                    .add_modifier(Modifier::BOLD),
            ),
        chunks[0],
    );

    let (title, content) = match &app.displayed {
        Some(displayed) => (
            format!(" {} ", displayed.title()),
            Text::from(results::lines(displayed, app.result_view, colors)),
        ),
        None => (
            " Results ".to_string(),
            Text::from("Nothing to show yet. Scrape a URL or pick a record on the dashboard."),
        ),
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style(true, colors)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    frame.render_widget(paragraph, chunks[1]);
}

fn render_status_bar(
    frame: &mut Frame,
    app: &TuiApp,
    toast: Option<&Toast>,
    area: Rect,
    colors: &ColorConfig,
) {
    let mut style = Style::default().fg(colors.status_fg).bg(colors.status_bg);

    let status = if let Some((_, ref title)) = app.pending_delete {
        format!("Delete \"{}\"? (y/n)", title)
    } else if app.tab == Tab::Scraper && app.form.editing {
        "Editing: type to enter text  Enter:Done (scrapes from URL)  Esc:Done  Tab:Next field".to_string()
    } else if let Some(toast) = toast {
        match toast.kind {
            ToastKind::Success => style = style.fg(colors.success),
            ToastKind::Error | ToastKind::Warning => style = style.fg(colors.error),
            ToastKind::Info | ToastKind::Loading => {}
        }
        format!("{} {}", toast.kind.icon(), toast.message)
    } else {
        let help = match app.tab {
            Tab::Scraper => "Tab:Switch tab  e:Edit  s:Scrape  v:Preview  t:AI  M:Method  q:Quit",
            Tab::Dashboard => {
                "j/k:Nav  Enter:View  o:Open  d:Delete  R:Refresh  a:Auto-refresh  q:Quit"
            }
            Tab::Results => "h/l:View  j/k:Scroll  n/p:Page  o:Open  x:Export JSON  q:Quit",
        };
        help.to_string()
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}
