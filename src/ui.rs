use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use std::time::SystemTime;
use unicode_width::UnicodeWidthStr;

use crate::{tracker::Outcome, App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::MoodEntry => render_mood_entry(self, area, buf),
            AppState::Transcribing => render_transcribing(self, area, buf),
        }
    }
}

fn render_mood_entry(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("오늘 당신의 하루는 어땠나요?", bold))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);
    Paragraph::new(Span::styled("How was your day today?", dim_italic))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let input = Paragraph::new(format!("{}▌", app.mood_input))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    input.render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(enter) 문장 추천 받기 / (esc) 종료",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    if let Some(status) = &app.status {
        Paragraph::new(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
    }
}

fn render_transcribing(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(reading) = &app.reading else {
        // reachable only when the screen is entered without a reading
        Paragraph::new("결과가 없습니다. 먼저 기분을 입력해주세요.")
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold = Style::default().patch(bold).add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let t = &app.transcription;
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut quote_lines =
        ((t.reference_text().width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if t.reference_text().width() <= max_chars_per_line as usize {
        quote_lines = 1;
    }
    if !app.config.overlay {
        // separate reference and input lines need twice the room
        quote_lines *= 2;
    }
    let guide_lines = u16::from(app.config.show_guide);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),           // emotion
            Constraint::Length(1),           // padding
            Constraint::Length(quote_lines), // quotation
            Constraint::Length(guide_lines), // guide rule
            Constraint::Length(1),           // source
            Constraint::Length(1),           // padding
            Constraint::Length(1),           // stats
            Constraint::Length(1),           // status / completion banner
            Constraint::Min(0),              // filler
            Constraint::Length(1),           // legend
        ])
        .split(area);

    let emotion = reading.emotion;
    Paragraph::new(Line::from(vec![
        Span::raw("오늘 당신의 감정은: "),
        Span::styled(format!("{} {}", emotion.emoji(), emotion.label()), bold),
        Span::raw("입니다."),
    ]))
    .render(chunks[0], buf);

    let quote = quotation_paragraph(app);
    quote.render(chunks[2], buf);

    if app.config.show_guide {
        Paragraph::new(Span::styled(
            "─".repeat(max_chars_per_line as usize),
            Style::default().add_modifier(Modifier::DIM),
        ))
        .render(chunks[3], buf);
    }

    if let Some(source) = reading.encouragement.source() {
        Paragraph::new(Span::styled(source.to_owned(), italic)).render(chunks[4], buf);
    }

    let now = SystemTime::now();
    let cmp = t.comparison();
    let (m, n) = (t.typed_units().len(), t.reference_units().len());
    let stats = format!(
        "정확도 {}%   진행도 {}% ({}/{})   속도 {}타   {:.0}초",
        cmp.accuracy,
        cmp.progress,
        m,
        n,
        t.speed(now),
        t.elapsed_secs(now),
    );
    Paragraph::new(Span::styled(stats, bold))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

    if t.has_finished() {
        Paragraph::new(Span::styled(
            app.celebration.message,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
    } else if let Some(status) = &app.status {
        Paragraph::new(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
    }

    Paragraph::new(Span::styled(
        "(tab) 다음 문장 / (ctrl-r) 다시 쓰기 / (esc) 돌아가기",
        Style::default().patch(italic).patch(dim_bold),
    ))
    .render(chunks[9], buf);

    if app.celebration.is_active {
        render_celebration_particles(&app.celebration, area, buf);
    }
}

/// Color every position of the quotation by its comparison outcome. With the
/// overlay option the typed input replaces the reference in place; without it
/// the dimmed reference sits on its own line above the input.
fn quotation_paragraph(app: &App) -> Paragraph<'static> {
    let t = &app.transcription;
    let reference = t.reference_units();
    let typed = t.typed_units();
    let cmp = t.comparison();

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green_bold = Style::default().patch(bold).fg(Color::Green);
    let red_bold = Style::default().patch(bold).fg(Color::Red);
    let dim_bold = Style::default().patch(bold).add_modifier(Modifier::DIM);
    let cursor = Style::default()
        .patch(dim_bold)
        .add_modifier(Modifier::UNDERLINED);

    let mut spans: Vec<Span<'static>> = Vec::with_capacity(cmp.outcomes.len());
    for (i, outcome) in cmp.outcomes.iter().enumerate() {
        let span = match outcome {
            Outcome::Match => Span::styled(reference[i].clone(), green_bold),
            Outcome::Mismatch => Span::styled(
                match typed[i].as_str() {
                    " " => "·".to_owned(),
                    other => other.to_owned(),
                },
                red_bold,
            ),
            // unreachable behind the input guard, still rendered distinctly
            Outcome::Overflow => Span::styled(
                typed[i].clone(),
                Style::default().bg(Color::Yellow).fg(Color::Black),
            ),
            Outcome::Pending => {
                if i == typed.len() {
                    Span::styled(reference[i].clone(), cursor)
                } else {
                    Span::styled(reference[i].clone(), dim_bold)
                }
            }
        };
        spans.push(span);
    }

    if app.config.overlay {
        Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false })
    } else {
        let reference_line = Line::from(Span::styled(t.reference_text().to_owned(), dim_bold));
        Paragraph::new(vec![reference_line, Line::from(spans)]).wrap(Wrap { trim: false })
    }
}

fn render_celebration_particles(
    celebration: &crate::celebration::Celebration,
    area: Rect,
    buf: &mut Buffer,
) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let alpha = 1.0 - (particle.age / particle.max_age);
        let style = if alpha > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if alpha > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}
