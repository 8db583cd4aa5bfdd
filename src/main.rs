//! Pokegrid - browse the PokeAPI catalog as a card grid

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tracing::info;
use tui_dispatch::{
    EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api::{CatalogApi, HttpCatalog};
use pokegrid::components::{
    CatalogGrid, CatalogGridProps, Component, DetailModal, DetailModalProps,
};
use pokegrid::config::{CatalogArgs, LogArgs};
use pokegrid::effect::{self, Effect};
use pokegrid::logging::init_logging;
use pokegrid::reducer::reducer;
use pokegrid::state::AppState;

/// Spinner frame interval while anything is loading
const TICK_MS: u64 = 90;

#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "Browse, search and inspect the PokeAPI catalog")]
struct Args {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(flatten)]
    log: LogArgs,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GridComponentId {
    Grid,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum GridContext {
    Main,
    Detail,
}

impl EventRoutingState<GridComponentId, GridContext> for AppState {
    fn focused(&self) -> Option<GridComponentId> {
        if self.detail.is_open() {
            Some(GridComponentId::Detail)
        } else {
            Some(GridComponentId::Grid)
        }
    }

    fn modal(&self) -> Option<GridComponentId> {
        if self.detail.is_open() {
            Some(GridComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: GridComponentId) -> GridContext {
        match id {
            GridComponentId::Grid => GridContext::Main,
            GridComponentId::Detail => GridContext::Detail,
        }
    }

    fn default_context(&self) -> GridContext {
        GridContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        catalog: catalog_args,
        log,
        debug: debug_args,
    } = Args::parse();

    init_logging(&log)?;

    let config = catalog_args.into_config();
    let client = HttpCatalog::new(&config).map_err(io::Error::other)?;
    info!(list_url = %client.list_url(), "catalog client ready");
    let api: Arc<dyn CatalogApi> = Arc::new(client);

    let debug = DebugSession::new(debug_args);

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, api).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct GridUi {
    grid: CatalogGrid,
    detail: DetailModal,
}

impl GridUi {
    fn new() -> Self {
        Self {
            grid: CatalogGrid::new(),
            detail: DetailModal,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<GridComponentId>,
    ) {
        event_ctx.set_component_area(GridComponentId::Grid, area);

        let props = CatalogGridProps {
            state,
            is_focused: render_ctx.is_focused() && !state.detail.is_open(),
        };
        self.grid.render(frame, area, props);

        if state.detail.is_open() {
            event_ctx.set_component_area(GridComponentId::Detail, DetailModal::area(area));
            let props = DetailModalProps {
                status: state.detail.status(),
                artwork: state.detail_artwork(),
                tick: state.tick,
                is_focused: render_ctx.is_focused(),
            };
            self.detail.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&GridComponentId::Detail);
        }
    }

    fn handle_grid_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogGridProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.grid.handle_event(event, props).into_iter().collect();
        respond(actions)
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DetailModalProps {
            status: state.detail.status(),
            artwork: state.detail_artwork(),
            tick: state.tick,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    api: Arc<dyn CatalogApi>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(GridUi::new()));
    let mut bus: EventBus<AppState, Action, GridComponentId, GridContext> = EventBus::new();
    let keybindings: Keybindings<GridContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(GridComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(GridComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        EventKind::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            HandlerResponse::action(Action::Quit)
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::CatalogFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |pending, ctx| effect::spawn(ctx.tasks(), &api, pending),
        )
        .await
}
