use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tui_dispatch::EventKind;

use super::artwork_box::render_artwork;
use super::catalog_grid::category_badges;
use super::format::{
    format_height, format_id, format_name, format_weight, spinner, stat_bar, stat_color,
    stat_label,
};
use super::Component;
use crate::action::Action;
use crate::artwork::ArtworkView;
use crate::detail::{move_preview, DetailStatus};
use crate::state::FullDetailRecord;

pub const DETAIL_ERROR_MESSAGE: &str =
    "Unable to load Pokemon details. Please check your connection and try again.";

const MODAL_WIDTH: u16 = 64;
const MODAL_HEIGHT: u16 = 34;
const ART_ROWS: u16 = 8;
const STAT_BAR_WIDTH: usize = 20;
const ACCENT: Color = Color::Rgb(228, 176, 88);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);

pub struct DetailModalProps<'a> {
    pub status: DetailStatus<'a>,
    pub artwork: ArtworkView<'a>,
    pub tick: u64,
    pub is_focused: bool,
}

/// Overlay for a single record; renders nothing while closed
#[derive(Default)]
pub struct DetailModal;

impl DetailModal {
    /// Centered area the modal occupies inside `area`
    pub fn area(area: Rect) -> Rect {
        let width = MODAL_WIDTH.min(area.width);
        let height = MODAL_HEIGHT.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }
}

impl Component<Action> for DetailModal {
    type Props<'a> = DetailModalProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.status == DetailStatus::Closed {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
                    Some(Action::DetailClose)
                }
                KeyCode::Char('r') if matches!(props.status, DetailStatus::Failed(_)) => {
                    Some(Action::DetailRetry)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let (title, lines) = match props.status {
            DetailStatus::Closed => return,
            DetailStatus::Loading => (
                " Details ".to_string(),
                vec![
                    Line::from(""),
                    Line::from(format!("{} Loading details...", spinner(props.tick))),
                ],
            ),
            DetailStatus::Failed(error) => (
                " Details ".to_string(),
                vec![
                    Line::from(""),
                    Line::styled(DETAIL_ERROR_MESSAGE, Style::default().fg(Color::Red)),
                    Line::styled(error.to_string(), Style::default().fg(TEXT_DIM)),
                    Line::from(""),
                    Line::from("Press r to retry, Esc to close"),
                ],
            ),
            DetailStatus::Loaded(record) => (
                format!(
                    " {} {} ",
                    format_name(&record.summary.name),
                    format_id(record.summary.id)
                ),
                record_lines(record),
            ),
        };

        let modal_area = Self::area(area);
        frame.render_widget(Clear, modal_area);

        let alignment = if matches!(props.status, DetailStatus::Loaded(_)) {
            Alignment::Left
        } else {
            Alignment::Center
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(Span::styled(
                title,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        let mut text_area = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        if matches!(props.status, DetailStatus::Loaded(_)) {
            let [art_area, rest] =
                Layout::vertical([Constraint::Length(ART_ROWS), Constraint::Min(0)])
                    .areas(text_area);
            render_artwork(
                frame,
                art_area,
                props.artwork,
                "[loading artwork]",
                "[no artwork]",
            );
            text_area = rest;
        }

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(alignment)
                .wrap(Wrap { trim: false }),
            text_area,
        );
    }
}

fn section(title: impl Into<String>) -> Line<'static> {
    Line::styled(title.into(), Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
}

fn record_lines(record: &FullDetailRecord) -> Vec<Line<'static>> {
    let summary = &record.summary;
    let base_experience = record
        .base_experience
        .map(|xp| xp.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        category_badges(&summary.categories),
        Line::from(format!(
            "Height {}   Weight {}   Base XP {}",
            format_height(summary.height),
            format_weight(summary.weight),
            base_experience
        )),
    ];

    lines.push(Line::from(""));
    lines.push(section("Abilities"));
    for ability in &record.abilities {
        let mut spans = vec![Span::raw(format!("  {}", format_name(&ability.name)))];
        if ability.is_hidden {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                " Hidden ",
                Style::default().fg(Color::Black).bg(TEXT_DIM),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(section("Base stats"));
    for stat in &record.stats {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<4}", stat_label(&stat.name))),
            Span::styled(
                stat_bar(stat.base, STAT_BAR_WIDTH),
                Style::default().fg(stat_color(stat.base)),
            ),
            Span::raw(format!(" {:>3}", stat.base)),
        ]));
    }

    let preview = move_preview(&record.moves);
    if !preview.shown.is_empty() {
        lines.push(Line::from(""));
        lines.push(section(format!("Moves ({})", record.moves.len())));
        let mut moves = preview
            .shown
            .iter()
            .map(|name| format_name(name))
            .collect::<Vec<_>>()
            .join(", ");
        if preview.remaining > 0 {
            moves.push_str(&format!(" +{} more", preview.remaining));
        }
        lines.push(Line::from(format!("  {moves}")));
    }
    lines
}
