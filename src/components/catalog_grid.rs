use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::artwork_box::render_artwork;
use super::format::{format_height, format_id, format_name, format_weight, spinner};
use super::Component;
use crate::action::Action;
use crate::artwork::ArtworkCache;
use crate::category::Category;
use crate::search::CatalogView;
use crate::state::{AppState, CatalogScreen, DetailRecord};

pub const CARD_WIDTH: u16 = 30;
/// Columns of the thumbnail on the left of each card
const CARD_ART_WIDTH: u16 = 8;
pub const CARD_HEIGHT: u16 = 5;

pub const LIST_ERROR_MESSAGE: &str =
    "Unable to load Pokemon. Please check your connection and try again.";

const ACCENT: Color = Color::Rgb(72, 204, 184);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);

pub struct CatalogGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Header, card grid and footer of the catalog screen
#[derive(Default)]
pub struct CatalogGrid {
    /// Cards per row at the last render; vertical cursor moves step by this
    columns: usize,
}

impl CatalogGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn row_step(&self) -> i16 {
        i16::try_from(self.columns.max(1)).unwrap_or(i16::MAX)
    }

    fn handle_search_key(code: KeyCode, query: &str) -> Option<Action> {
        match code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => {
                let mut query = query.to_string();
                query.pop()?;
                Some(Action::SearchQueryChange(query))
            }
            KeyCode::Char(c) => Some(Action::SearchQueryChange(format!("{query}{c}"))),
            _ => None,
        }
    }
}

impl Component<Action> for CatalogGrid {
    type Props<'a> = CatalogGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        let state = props.state;
        if state.search.active {
            return Self::handle_search_key(key.code, &state.search.query);
        }

        match key.code {
            KeyCode::Char('/') => return Some(Action::SearchOpen),
            KeyCode::Char('r') | KeyCode::F(5) => return Some(Action::CatalogFetch),
            KeyCode::Char('q') => return Some(Action::Quit),
            _ => {}
        }

        // Records behind a loading or error screen are not navigable
        let view = match state.screen() {
            CatalogScreen::Grid(view) => view,
            CatalogScreen::NoResults(_) if key.code == KeyCode::Esc => {
                return Some(Action::SearchCancel)
            }
            _ => return None,
        };

        match key.code {
            KeyCode::Esc if !state.search.query.is_empty() => Some(Action::SearchCancel),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::CursorMove(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::CursorMove(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorMove(-self.row_step())),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorMove(self.row_step())),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Action::PageNext),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Action::PagePrev),
            KeyCode::Home => Some(Action::PageSelect(1)),
            KeyCode::End => Some(Action::PageSelect(view.total_pages)),
            KeyCode::Enter => state.focused_url().map(Action::DetailOpen),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Header + search
            Constraint::Min(1),    // Grid
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let state = props.state;
        render_header(frame, chunks[0], state);

        match state.screen() {
            CatalogScreen::FetchingList => {
                render_message(
                    frame,
                    chunks[1],
                    vec![Line::from(format!(
                        "{} Loading Pokemon...",
                        spinner(state.tick)
                    ))],
                );
            }
            CatalogScreen::ResolvingDetails => {
                render_message(
                    frame,
                    chunks[1],
                    vec![Line::from(format!(
                        "{} Fetching Pokemon details...",
                        spinner(state.tick)
                    ))],
                );
            }
            CatalogScreen::Failed(error) => {
                render_message(
                    frame,
                    chunks[1],
                    vec![
                        Line::styled(LIST_ERROR_MESSAGE, Style::default().fg(Color::Red)),
                        Line::styled(error.to_string(), Style::default().fg(TEXT_DIM)),
                        Line::from(""),
                        Line::from("Press r to retry"),
                    ],
                );
            }
            CatalogScreen::Unavailable => {
                render_message(
                    frame,
                    chunks[1],
                    vec![
                        Line::from("No Pokemon could be loaded."),
                        Line::from("Press r to retry"),
                    ],
                );
            }
            CatalogScreen::NoResults(query) => {
                render_message(
                    frame,
                    chunks[1],
                    vec![
                        Line::from(format!("No Pokemon match \"{}\"", query.trim())),
                        Line::styled(
                            "Press Esc to clear the search",
                            Style::default().fg(TEXT_DIM),
                        ),
                    ],
                );
            }
            CatalogScreen::Grid(view) => {
                self.columns = usize::from((chunks[1].width / CARD_WIDTH).max(1));
                render_cards(
                    frame,
                    chunks[1],
                    &view,
                    &state.artwork,
                    state.cursor,
                    self.columns,
                );
                if let Some(summary) = view.summary() {
                    let prev = if view.has_previous() { "◀ " } else { "  " };
                    let next = if view.has_next() { " ▶" } else { "  " };
                    frame.render_widget(
                        Paragraph::new(format!("{prev}{summary}{next}"))
                            .alignment(Alignment::Center)
                            .style(Style::default().fg(TEXT_DIM)),
                        chunks[2],
                    );
                }
            }
        }

        render_hints(frame, chunks[3], state);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut title = vec![Span::styled(
        " Pokegrid ",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    if state.is_loading() {
        title.push(Span::raw(format!("{} ", spinner(state.tick))));
    }

    let search = if state.search.active {
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(ACCENT)),
            Span::raw(state.search.query.as_str()),
            Span::styled("▏", Style::default().fg(ACCENT)),
        ])
    } else if !state.search.query.is_empty() {
        Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(TEXT_DIM)),
            Span::raw(state.search.query.as_str()),
        ])
    } else {
        Line::styled(
            "Press / to search by name or type",
            Style::default().fg(TEXT_DIM),
        )
    };

    let border = if state.search.active {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Line::from(title));
    frame.render_widget(Paragraph::new(search).block(block), area);
}

fn render_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let height = u16::try_from(lines.len()).unwrap_or(area.height);
    let top = area.height.saturating_sub(height) / 2;
    let area = Rect {
        y: area.y + top,
        height: area.height - top,
        ..area
    };
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_cards(
    frame: &mut Frame,
    area: Rect,
    view: &CatalogView<'_>,
    artwork: &ArtworkCache,
    cursor: usize,
    columns: usize,
) {
    let rows_fit = usize::from((area.height / CARD_HEIGHT).max(1));
    // Scroll so the focused row stays on screen
    let first_row = (cursor / columns).saturating_sub(rows_fit - 1);

    for (row, cards) in view
        .visible()
        .chunks(columns)
        .enumerate()
        .skip(first_row)
        .take(rows_fit)
    {
        let y = area.y + (row - first_row) as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }
        for (column, record) in cards.iter().enumerate() {
            let card_area = Rect::new(
                area.x + column as u16 * CARD_WIDTH,
                y,
                CARD_WIDTH,
                CARD_HEIGHT,
            );
            let index = row * columns + column;
            render_card(frame, card_area, record, artwork, index == cursor);
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    record: &DetailRecord,
    artwork: &ArtworkCache,
    is_focused: bool,
) {
    let border = if is_focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format_id(record.id));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [art_area, _, text_area] = Layout::horizontal([
        Constraint::Length(CARD_ART_WIDTH),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);
    render_artwork(
        frame,
        art_area,
        artwork.view(record.image_url()),
        "···",
        &format_id(record.id),
    );

    let lines = vec![
        Line::styled(
            format_name(&record.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        category_badges(&record.categories),
        Line::styled(
            format!(
                "{} · {}",
                format_height(record.height),
                format_weight(record.weight)
            ),
            Style::default().fg(TEXT_DIM),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), text_area);
}

pub fn category_badges(categories: &[String]) -> Line<'static> {
    let mut spans = Vec::with_capacity(categories.len() * 2);
    for (index, name) in categories.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        let category = Category::from_name(name);
        spans.push(Span::styled(
            format!(" {} ", name.to_uppercase()),
            Style::default().fg(Color::Black).bg(category.color()),
        ));
    }
    Line::from(spans)
}

fn render_hints(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints: Vec<StatusBarHint<'static>> = if state.search.active {
        vec![
            StatusBarHint::new("Enter", "keep"),
            StatusBarHint::new("Esc", "clear"),
            StatusBarHint::new("Bksp", "delete"),
        ]
    } else {
        vec![
            StatusBarHint::new("arrows", "move"),
            StatusBarHint::new("Enter", "details"),
            StatusBarHint::new("n/p", "page"),
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("r", "reload"),
            StatusBarHint::new("q", "quit"),
        ]
    };

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::tests::sample_png;
    use crate::artwork::Artwork;
    use crate::state::CatalogPhase;
    use crossterm::event::KeyEvent;
    use tui_dispatch::testing::*;

    fn ready_state(count: u32) -> AppState {
        let mut state = AppState {
            phase: CatalogPhase::Ready,
            ..Default::default()
        };
        state.collection.replace(
            (1..=count)
                .map(|id| DetailRecord {
                    id,
                    name: format!("mon-{id}"),
                    url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
                    image_primary: None,
                    image_fallback: None,
                    categories: vec!["fire".into()],
                    height: 10,
                    weight: 100,
                })
                .collect(),
        );
        state
    }

    fn actions_for(grid: &mut CatalogGrid, state: &AppState, keys: &str) -> Vec<Action> {
        grid.handle_event(
            &EventKind::Key(key(keys)),
            CatalogGridProps {
                state,
                is_focused: true,
            },
        )
        .into_iter()
        .collect()
    }

    #[test]
    fn test_slash_opens_search() {
        let mut grid = CatalogGrid::new();
        let state = ready_state(3);
        let actions = actions_for(&mut grid, &state, "/");
        assert_eq!(actions, vec![Action::SearchOpen]);
    }

    #[test]
    fn test_typing_while_searching_extends_query() {
        let mut grid = CatalogGrid::new();
        let mut state = ready_state(3);
        state.search.active = true;
        state.search.query = "fi".into();

        let actions = actions_for(&mut grid, &state, "r");
        assert_eq!(actions, vec![Action::SearchQueryChange("fir".into())]);
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut grid = CatalogGrid::new();
        let state = ready_state(3);
        let actions: Vec<_> = grid
            .handle_event(
                &EventKind::Key(key("q")),
                CatalogGridProps {
                    state: &state,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_failed_refresh_hides_records_from_navigation() {
        let mut grid = CatalogGrid::new();
        let mut state = ready_state(3);
        state.phase = CatalogPhase::Failed("HTTP 500".into());
        assert!(matches!(state.screen(), CatalogScreen::Failed(_)));

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let actions: Vec<_> = grid
            .handle_event(
                &EventKind::Key(enter),
                CatalogGridProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert!(actions.is_empty());
        assert!(actions_for(&mut grid, &state, "n").is_empty());
        assert!(actions_for(&mut grid, &state, "l").is_empty());

        assert_eq!(actions_for(&mut grid, &state, "r"), vec![Action::CatalogFetch]);
        assert_eq!(actions_for(&mut grid, &state, "/"), vec![Action::SearchOpen]);
        assert_eq!(actions_for(&mut grid, &state, "q"), vec![Action::Quit]);
    }

    #[test]
    fn test_enter_opens_focused_card() {
        let mut grid = CatalogGrid::new();
        let state = ready_state(3);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let actions: Vec<_> = grid
            .handle_event(
                &EventKind::Key(enter),
                CatalogGridProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert_eq!(
            actions,
            vec![Action::DetailOpen(
                "https://pokeapi.co/api/v2/pokemon/1/".into()
            )]
        );
    }

    #[test]
    fn test_vertical_moves_step_by_columns() {
        let mut grid = CatalogGrid::new();
        let state = ready_state(10);
        let mut render = RenderHarness::new(3 * CARD_WIDTH, 30);
        render.render_to_string_plain(|frame| {
            grid.render(
                frame,
                frame.area(),
                CatalogGridProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        let actions = actions_for(&mut grid, &state, "j");
        assert_eq!(actions, vec![Action::CursorMove(3)]);
    }

    #[test]
    fn test_render_grid_shows_cards_and_pagination() {
        let mut grid = CatalogGrid::new();
        let state = ready_state(45);
        let mut render = RenderHarness::new(80, 30);
        let output = render.render_to_string_plain(|frame| {
            grid.render(
                frame,
                frame.area(),
                CatalogGridProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Mon 1"));
        assert!(output.contains("#001"));
        assert!(output.contains("FIRE"));
        assert!(output.contains("1.0 m"));
        assert!(output.contains("Page 1 of 3 (45 total)"));
    }

    fn render_plain(grid: &mut CatalogGrid, state: &AppState, width: u16, height: u16) -> String {
        let mut render = RenderHarness::new(width, height);
        render.render_to_string_plain(|frame| {
            grid.render(
                frame,
                frame.area(),
                CatalogGridProps {
                    state,
                    is_focused: true,
                },
            );
        })
    }

    #[test]
    fn test_cards_show_cached_artwork_or_loading_marker() {
        let mut grid = CatalogGrid::new();
        let mut state = ready_state(1);
        let mut record = state.collection.all()[0].clone();
        record.image_primary = Some("https://img/1.png".into());
        state.collection.replace(vec![record]);

        let output = render_plain(&mut grid, &state, CARD_WIDTH, 12);
        assert!(output.contains("···"));
        assert!(!output.contains('▀'));

        let artwork = Artwork::decode(&sample_png()).unwrap();
        state.artwork.store("https://img/1.png".into(), artwork);
        let output = render_plain(&mut grid, &state, CARD_WIDTH, 12);
        assert!(output.contains('▀'));
        assert!(output.contains("Mon 1"));
    }

    #[test]
    fn test_card_without_image_shows_id_placeholder() {
        let mut grid = CatalogGrid::new();
        let state = ready_state(1);
        let output = render_plain(&mut grid, &state, CARD_WIDTH, 12);
        // Once in the border title, once in the art box
        assert_eq!(output.matches("#001").count(), 2);
    }

    #[test]
    fn test_render_failed_offers_retry() {
        let mut grid = CatalogGrid::new();
        let state = AppState {
            phase: CatalogPhase::Failed("HTTP 500".into()),
            ..Default::default()
        };
        let mut render = RenderHarness::new(100, 20);
        let output = render.render_to_string_plain(|frame| {
            grid.render(
                frame,
                frame.area(),
                CatalogGridProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Unable to load Pokemon."));
        assert!(output.contains("Press r to retry"));
    }

    #[test]
    fn test_render_no_results() {
        let mut grid = CatalogGrid::new();
        let mut state = ready_state(3);
        state.search.query = "water".into();
        let mut render = RenderHarness::new(80, 20);
        let output = render.render_to_string_plain(|frame| {
            grid.render(
                frame,
                frame.area(),
                CatalogGridProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("No Pokemon match \"water\""));
    }
}
