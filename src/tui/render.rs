use std::borrow::Cow;
use std::time::Instant;

use super::state::{ArticlesFocus, HitMap, HitTarget, Page, SettingsRow, CARD_HEIGHT};
use crate::action::forms::slider_fill_percent;
use crate::action::{ButtonId, ButtonState, SettingsField};
use crate::app::App;
use crate::articles::{self, Topic};
use crate::effects::hover::tilt;
use crate::modal::{Modal, THINKING_STEPS};
use crate::notify::ToastKind;
use crate::theme::Palette;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;
const SLIDER_WIDTH: usize = 20;

/// Draw one frame and return where everything clickable ended up.
pub fn draw(f: &mut Frame, app: &App, now: Instant) -> HitMap {
    let pal = app.theme.current().palette();
    let mut hits = HitMap::default();

    f.render_widget(Block::default().style(Style::default().bg(pal.bg).fg(pal.text)), f.area());

    let header_height = if app.header_condensed() { 1 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, &pal, chunks[0], &mut hits);
    match app.page {
        Page::Articles => draw_articles(f, app, &pal, chunks[1], now, &mut hits),
        Page::Draft => draw_draft(f, app, &pal, chunks[1], &mut hits),
        Page::Settings => draw_settings(f, app, &pal, chunks[1], &mut hits),
    }
    draw_footer(f, app, &pal, chunks[2]);

    draw_ripples(f, app, &pal, &hits, now);
    draw_toasts(f, app, &pal, now, &mut hits);
    draw_modal(f, app, &pal, now, &mut hits);
    hits
}

fn draw_header(f: &mut Frame, app: &App, pal: &Palette, area: Rect, hits: &mut HitMap) {
    let condensed = area.height < 3;
    let inner = if condensed {
        area
    } else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(pal.muted))
            .style(Style::default().bg(pal.surface));
        let inner = block.inner(area);
        f.render_widget(block, area);
        inner
    };

    let mut spans = vec![Span::styled(
        " Curator ",
        Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
    )];
    let mut x = inner.x + spans[0].width() as u16;
    for (i, page) in Page::ALL.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, page.title());
        let style = if *page == app.page {
            Style::default().fg(pal.bg).bg(pal.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(pal.text)
        };
        let width = label.chars().count() as u16;
        hits.push(HitTarget::Tab(*page), Rect::new(x, inner.y, width.min(inner.right().saturating_sub(x)), 1));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);

    let (icon, text) = app.theme.current().indicator();
    let toggle = format!(" {} {} ", icon, text);
    let width = toggle.chars().count() as u16;
    if inner.width > width {
        let toggle_area = Rect::new(inner.right() - width, inner.y, width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(toggle, Style::default().fg(pal.warning))),
            toggle_area,
        );
        hits.push(HitTarget::ThemeToggle, toggle_area);
    }
}

fn draw_articles(f: &mut Frame, app: &App, pal: &Palette, area: Rect, now: Instant, hits: &mut HitMap) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // topic chips
            Constraint::Length(1), // sources + fetch
            Constraint::Length(1), // count line
            Constraint::Min(0),    // cards
        ])
        .split(area.inner(Margin { horizontal: 1, vertical: 0 }));

    // Topic chips
    let mut x = chunks[0].x;
    let mut spans = Vec::new();
    for topic in Topic::ALL {
        let label = format!(" {} ", topic.label());
        let width = label.chars().count() as u16;
        if x + width > chunks[0].right() {
            break;
        }
        let style = if topic == app.topic {
            Style::default().fg(pal.bg).bg(pal.accent)
        } else {
            Style::default().fg(pal.muted).bg(pal.surface)
        };
        hits.push(HitTarget::TopicChip(topic), Rect::new(x, chunks[0].y, width, 1));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    // Source chips and fetch button
    let fetch = app.dispatcher.button(&ButtonId::FetchArticles);
    let fetch_label = if fetch.is_loading() {
        format!("[ {} ]", ButtonId::FetchArticles.busy_label())
    } else {
        format!("[ {} ]", fetch.label())
    };
    let fetch_width = fetch_label.chars().count() as u16;
    let sources_right = chunks[1].right().saturating_sub(fetch_width + 1);
    let focused = app.articles_focus == ArticlesFocus::Sources;
    let mut x = chunks[1].x;
    let mut spans = vec![];
    for (i, (url, checked)) in app.sources.iter().enumerate() {
        let label = format!("{} {} ", if checked { "☑" } else { "☐" }, short_source(url));
        let width = label.chars().count() as u16;
        if x + width > sources_right {
            break;
        }
        let mut style = Style::default().fg(if checked { pal.text } else { pal.muted });
        if focused && i == app.source_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        hits.push(HitTarget::SourceChip(i), Rect::new(x, chunks[1].y, width, 1));
        spans.push(Span::styled(label, style));
        x += width;
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
    let fetch_area = Rect::new(sources_right + 1, chunks[1].y, fetch_width, 1);
    f.render_widget(
        Paragraph::new(Span::styled(fetch_label, button_style(fetch.state(), fetch.is_disabled(), pal))),
        fetch_area,
    );
    hits.push(HitTarget::Button(ButtonId::FetchArticles), fetch_area);

    // Count line
    let visible = app.visible_articles();
    let mut count = vec![Span::styled(articles::showing_label(visible.len()), Style::default().fg(pal.muted))];
    if let Some(t) = &app.last_fetch {
        count.push(Span::styled(format!("  · last fetch {}", t), Style::default().fg(pal.muted)));
    }
    f.render_widget(Paragraph::new(Line::from(count)), chunks[2]);

    // Cards
    let list = chunks[3];
    hits.list_height = list.height;
    if visible.is_empty() {
        let msg = if app.articles.is_empty() {
            "No articles yet. Press [f] to fetch."
        } else {
            "No articles match this topic."
        };
        f.render_widget(
            Paragraph::new(msg).style(Style::default().fg(pal.muted)).alignment(Alignment::Center),
            list,
        );
        return;
    }

    let per_page = (list.height / CARD_HEIGHT) as usize;
    for (slot, pos) in (app.article_scroll..visible.len()).take(per_page).enumerate() {
        let article = &app.articles[visible[pos]];
        let card = Rect::new(list.x, list.y + slot as u16 * CARD_HEIGHT, list.width, CARD_HEIGHT);
        hits.push(HitTarget::ArticleCard(pos), card);

        let reveal = app.card_progress(pos, &article.link, now);
        let lift = app.hover.lift(&pos, now);
        let shift = match (app.hover.hovered(), app.pointer) {
            (Some(h), Some(p)) if *h == pos => tilt(card, p).1.round() as i16,
            _ => 0,
        };
        let slide = ((1.0 - reveal) * 4.0).round() as u16;
        let max_x = list.right().saturating_sub(4).max(list.x);
        let x = (card.x + slide).saturating_add_signed(shift).clamp(list.x, max_x);
        let body = Rect::new(x, card.y, list.right().saturating_sub(x), card.height);

        let selected = pos == app.article_cursor && app.articles_focus == ArticlesFocus::List;
        let border = if selected {
            pal.accent
        } else if lift > 0.5 {
            pal.info
        } else {
            pal.muted
        };
        let text = if reveal < 0.5 { pal.muted } else { pal.text };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(pal.surface));
        if lift > 0.5 {
            block = block.border_type(BorderType::Thick);
        }
        let inner = block.inner(body);
        f.render_widget(block, body);

        let title_width = inner.width as usize;
        let mut title_style = Style::default().fg(text).add_modifier(Modifier::BOLD);
        if article.is_posted {
            title_style = title_style.add_modifier(Modifier::DIM);
        }
        f.render_widget(
            Paragraph::new(Span::styled(truncate_with_ellipsis(&article.title, title_width), title_style)),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );

        let id = ButtonId::GenerateTweet(article.link.clone());
        let button = app.dispatcher.button(&id);
        let label = if article.is_posted {
            "✓ Posted".to_string()
        } else {
            format!("[ {} ]", button.label())
        };
        let label_width = label.chars().count() as u16;
        let meta = format!("{}  {}", article.source, article.published);
        let meta_width = (inner.width.saturating_sub(label_width + 1)) as usize;
        let meta_row = Rect::new(inner.x, inner.y + 1, inner.width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(truncate_with_ellipsis(&meta, meta_width), Style::default().fg(pal.muted))),
            meta_row,
        );
        if inner.width > label_width {
            let button_area = Rect::new(inner.right() - label_width, meta_row.y, label_width, 1);
            let style = if article.is_posted {
                Style::default().fg(pal.success)
            } else {
                button_style(button.state(), button.is_disabled(), pal)
            };
            f.render_widget(Paragraph::new(Span::styled(label, style)), button_area);
            if !article.is_posted {
                hits.push(HitTarget::Button(id), button_area);
            }
        }
    }
}

fn draw_draft(f: &mut Frame, app: &App, pal: &Palette, area: Rect, hits: &mut HitMap) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tweet draft ")
        .border_style(Style::default().fg(pal.muted))
        .style(Style::default().bg(pal.surface));
    let inner = block.inner(area.inner(Margin { horizontal: 1, vertical: 0 }));
    f.render_widget(block, area.inner(Margin { horizontal: 1, vertical: 0 }));

    let Some(draft) = &app.draft else {
        f.render_widget(
            Paragraph::new("No draft yet. Generate one from the Articles page.")
                .style(Style::default().fg(pal.muted))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(draft.full_tweet.as_str())
            .style(Style::default().fg(pal.text))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let count_color = if draft.char_count > 280 { pal.error } else { pal.muted };
    f.render_widget(
        Paragraph::new(Span::styled(format!("{}/280", draft.char_count), Style::default().fg(count_color)))
            .alignment(Alignment::Right),
        chunks[1],
    );

    let mut x = chunks[3].x;
    for id in [ButtonId::RegenerateTweet, ButtonId::PostTweet] {
        let button = app.dispatcher.button(&id);
        let label = format!("[ {} ]", button.label());
        let width = (label.chars().count() as u16).min(chunks[3].right().saturating_sub(x));
        let button_area = Rect::new(x, chunks[3].y, width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(label, button_style(button.state(), button.is_disabled(), pal))),
            button_area,
        );
        hits.push(HitTarget::Button(id), button_area);
        x += width + 2;
    }
}

fn draw_settings(f: &mut Frame, app: &App, pal: &Palette, area: Rect, hits: &mut HitMap) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Settings ")
        .border_style(Style::default().fg(pal.muted))
        .style(Style::default().bg(pal.surface));
    let outer = area.inner(Margin { horizontal: 1, vertical: 0 });
    let inner = block.inner(outer);
    f.render_widget(block, outer);

    let rows = app.settings_rows();
    let height = inner.height as usize;
    if height == 0 {
        return;
    }
    let cursor = app.settings_cursor.min(rows.len().saturating_sub(1));
    let offset = cursor.saturating_sub(height.saturating_sub(1));

    for (line, (i, row)) in rows.iter().enumerate().skip(offset).take(height).enumerate() {
        let row_area = Rect::new(inner.x, inner.y + line as u16, inner.width, 1);
        let selected = i == cursor;
        let marker = if selected { "▶ " } else { "  " };
        let base = Style::default().fg(pal.text);

        let mut spans = vec![Span::styled(marker, Style::default().fg(pal.accent))];
        match row {
            SettingsRow::Field(field) => {
                spans.push(Span::styled(format!("{:<18}", field.label()), base));
                spans.push(Span::styled(
                    format!("{:>6} ", app.settings.display_value(*field)),
                    Style::default().fg(pal.accent),
                ));
                if let Some(pct) = field_fill(app, *field) {
                    let filled = ((pct / 100.0) * SLIDER_WIDTH as f64).round() as usize;
                    spans.push(Span::styled("━".repeat(filled), Style::default().fg(pal.accent)));
                    spans.push(Span::styled(
                        "─".repeat(SLIDER_WIDTH.saturating_sub(filled)),
                        Style::default().fg(pal.muted),
                    ));
                }
            }
            SettingsRow::Topic(t) => {
                if let Some((name, checked)) = app.settings.topics.get(*t) {
                    spans.push(Span::styled(format!("{} {}", if *checked { "☑" } else { "☐" }, name), base));
                }
            }
            SettingsRow::Feed(url) => {
                let button = app.dispatcher.button(&ButtonId::RemoveFeed(url.clone()));
                spans.push(Span::styled(format!("{}  ", url), base));
                spans.push(Span::styled(
                    button.label().to_string(),
                    button_style(button.state(), button.is_disabled(), pal).fg(pal.error),
                ));
            }
            SettingsRow::FeedInput => {
                let caret = if app.editing_feed { "▏" } else { "" };
                let shown = if app.feed_input.is_empty() && !app.editing_feed {
                    Span::styled("https://example.com/feed.xml", Style::default().fg(pal.muted))
                } else {
                    Span::styled(format!("{}{}", app.feed_input, caret), base)
                };
                let button = app.dispatcher.button(&ButtonId::SaveFeed);
                spans.push(Span::styled("New feed: ", base));
                spans.push(shown);
                spans.push(Span::styled(
                    format!("  [ {} ]", button.label()),
                    button_style(button.state(), button.is_disabled(), pal),
                ));
            }
            SettingsRow::Suggested(url) => {
                let button = app.dispatcher.button(&ButtonId::AddSuggestedFeed(url.clone()));
                spans.push(Span::styled(format!("{}  ", url), Style::default().fg(pal.muted)));
                spans.push(Span::styled(
                    format!("[ {} ]", button.label()),
                    button_style(button.state(), button.is_disabled(), pal),
                ));
            }
            SettingsRow::SaveAll => {
                let button = app.dispatcher.button(&ButtonId::SaveSettings);
                spans.push(Span::styled(
                    format!("[ {} ]", button.label()),
                    button_style(button.state(), button.is_disabled(), pal).add_modifier(Modifier::BOLD),
                ));
            }
        }

        let mut line_style = Style::default();
        if selected {
            line_style = line_style.bg(pal.bg);
        }
        f.render_widget(Paragraph::new(Line::from(spans)).style(line_style), row_area);
        hits.push(HitTarget::SettingsRow(i), row_area);
    }
}

fn field_fill(app: &App, field: SettingsField) -> Option<f64> {
    let s = &app.settings;
    match field {
        SettingsField::Temperature => Some(slider_fill_percent(f64::from(s.temperature_pct), 0.0, 100.0)),
        SettingsField::MaxHashtags => Some(slider_fill_percent(f64::from(s.max_hashtags), 0.0, 5.0)),
        SettingsField::MaxLength => Some(slider_fill_percent(f64::from(s.max_length), 100.0, 280.0)),
        SettingsField::MaxPerDay => Some(slider_fill_percent(f64::from(s.max_per_day), 1.0, 50.0)),
        SettingsField::AutoPost => None,
    }
}

fn draw_footer(f: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(pal.warning));
    let mut spans = vec![key("  [q]"), Span::raw("uit  "), key("[t]"), Span::raw("heme  "), key("[1-3]"), Span::raw(" pages  ")];
    match app.page {
        Page::Articles => spans.extend([
            key("[f]"),
            Span::raw("etch  "),
            key("[g]"),
            Span::raw("enerate  "),
            key("[←/→]"),
            Span::raw(" topic  "),
            key("[Tab]"),
            Span::raw(" sources  "),
        ]),
        Page::Draft => spans.extend([key("[r]"), Span::raw("egenerate  "), key("[p]"), Span::raw("ost  ")]),
        Page::Settings => spans.extend([
            key("[←/→]"),
            Span::raw(" adjust  "),
            key("[Enter]"),
            Span::raw(" select  "),
            key("[s]"),
            Span::raw("ave  "),
        ]),
    }
    if app.dispatcher.in_flight() > 0 {
        spans.push(Span::styled(
            format!(" ⏳ {} pending", app.dispatcher.in_flight()),
            Style::default().fg(pal.info),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().fg(pal.muted)), area);
}

fn draw_ripples(f: &mut Frame, app: &App, pal: &Palette, hits: &HitMap, now: Instant) {
    let buf = f.buffer_mut();
    for (target, area) in hits.regions() {
        let Some(ripple) = app.ripples.get(target) else { continue };
        if ripple.opacity(now) < 0.15 {
            continue;
        }
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if ripple.covers(x, y, now) {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_bg(pal.accent).set_fg(pal.bg);
                    }
                }
            }
        }
    }
}

fn draw_toasts(f: &mut Frame, app: &App, pal: &Palette, now: Instant, hits: &mut HitMap) {
    let screen = f.area();
    let width = TOAST_WIDTH.min(screen.width);
    let mut y = screen.bottom().saturating_sub(1);

    // Newest at the bottom, stacking upwards.
    for toast in app.notifier.snapshot(now).iter().rev() {
        if y < screen.y + TOAST_HEIGHT {
            break;
        }
        y -= TOAST_HEIGHT;
        let area = Rect::new(screen.right() - width, y, width, TOAST_HEIGHT);
        let color = match toast.kind {
            ToastKind::Success => pal.success,
            ToastKind::Error => pal.error,
            ToastKind::Warning => pal.warning,
            ToastKind::Info => pal.info,
        };
        let mut style = Style::default().fg(color).bg(pal.surface);
        if toast.fading && toast.fade_progress > 0.3 {
            style = style.fg(pal.muted).add_modifier(Modifier::DIM);
        }
        let text = format!("{} {}", toast.kind.icon(), toast.message);
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(truncate_with_ellipsis(&text, width.saturating_sub(2) as usize).into_owned())
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            area,
        );
        hits.push(HitTarget::Toast(toast.id), area);
    }
}

fn draw_modal(f: &mut Frame, app: &App, pal: &Palette, now: Instant, hits: &mut HitMap) {
    let Some(modal) = app.modal.current() else { return };
    let area = centered(f.area(), 56, 10);
    f.render_widget(Clear, area);

    match modal {
        Modal::Progress { .. } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" ✨ Generating tweet ")
                .border_style(Style::default().fg(pal.accent))
                .style(Style::default().bg(pal.surface));
            let inner = block.inner(area);
            f.render_widget(block, area);

            let active = app.modal.active_steps(now);
            let lines: Vec<Line> = THINKING_STEPS
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    if i < active {
                        Line::from(Span::styled(format!("✓ {}", step), Style::default().fg(pal.success)))
                    } else {
                        Line::from(Span::styled(format!("  {}", step), Style::default().fg(pal.muted)))
                    }
                })
                .collect();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(inner);
            f.render_widget(Paragraph::new(lines), chunks[0]);
            f.render_widget(
                Gauge::default()
                    .ratio(f64::from(app.modal.progress(now)).clamp(0.0, 1.0))
                    .gauge_style(Style::default().fg(pal.accent).bg(pal.bg)),
                chunks[1],
            );
        }
        Modal::ConfirmRemove { url } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" Remove feed ")
                .border_style(Style::default().fg(pal.warning))
                .style(Style::default().bg(pal.surface));
            let inner = block.inner(area);
            f.render_widget(block, area);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(inner);
            f.render_widget(
                Paragraph::new(format!("Remove this feed?\n\n{}", url))
                    .style(Style::default().fg(pal.text))
                    .wrap(Wrap { trim: true }),
                chunks[0],
            );

            let yes = Rect::new(chunks[1].x + 2, chunks[1].y, 9, 1);
            let no = Rect::new(yes.right() + 2, chunks[1].y, 8, 1);
            f.render_widget(Paragraph::new(Span::styled("[ Yes y ]", Style::default().fg(pal.error))), yes);
            f.render_widget(Paragraph::new(Span::styled("[ No n ]", Style::default().fg(pal.muted))), no);
            hits.push(HitTarget::ModalChoice(true), yes);
            hits.push(HitTarget::ModalChoice(false), no);
        }
    }
}

fn button_style(state: ButtonState, disabled: bool, pal: &Palette) -> Style {
    let style = match state {
        ButtonState::Success => Style::default().fg(pal.success),
        ButtonState::Error => Style::default().fg(pal.error),
        ButtonState::Pending => Style::default().fg(pal.muted),
        ButtonState::Idle => Style::default().fg(pal.accent),
    };
    if disabled {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Host part of a feed URL for compact chips.
fn short_source(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let host = rest.split('/').next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host)
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
