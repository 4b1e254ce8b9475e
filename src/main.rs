use std::{cell::RefCell, io, rc::Rc};

use clicker_client::clock::Clock;
use clicker_client::error::SyncError;
use clicker_client::input::{pixel_x_to_col, pixel_y_to_row, ClickState};
use clicker_client::render::RenderDispatcher;
use clicker_client::schedule::TickSchedule;
use clicker_client::store::{GameStore, SessionState};
use clicker_client::sync::{ClickTag, SyncController, SyncOutcome};
use clicker_client::view::{TerminalView, RETRY_BOOTSTRAP};
use clicker_client::web::{self, clock::PerformanceClock, transport::FetchTransport};
use log::LevelFilter;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

type Dispatcher = Rc<RefCell<RenderDispatcher<TerminalView>>>;

/// Handles shared by the event callbacks.
#[derive(Clone)]
struct Page {
    clock: Rc<PerformanceClock>,
    store: Rc<GameStore>,
    dispatcher: Dispatcher,
    sync: Rc<SyncController<FetchTransport>>,
    notice_seconds: f64,
}

impl Page {
    fn bootstrap(&self) {
        self.sync.bootstrap(self.on_failure("Could not load the game"));
    }

    fn retry_if_unsynced(&self) {
        if self.store.session_state() == SessionState::Unsynced {
            self.bootstrap();
        }
    }

    /// `tag` is the entity bound to `action_id` in the frame that was clicked.
    fn click(&self, action_id: u16, tag: Option<ClickTag>) {
        if action_id == RETRY_BOOTSTRAP {
            self.retry_if_unsynced();
            return;
        }
        if let Some(tag) = tag {
            self.sync.handle_click(&tag, self.on_failure("Purchase failed"));
        }
    }

    /// Leave the last good display alone and show a transient notice.
    fn on_failure(
        &self,
        what: &'static str,
    ) -> impl FnOnce(Result<SyncOutcome, SyncError>) + 'static {
        let dispatcher = self.dispatcher.clone();
        let clock = self.clock.clone();
        let seconds = self.notice_seconds;
        move |result| {
            if let Err(e) = result {
                dispatcher.borrow_mut().view_mut().show_notice(
                    format!("{}: {}", what, e),
                    clock.now(),
                    seconds,
                );
            }
        }
    }
}

/// Query the grid container's bounding rect and convert a pixel position to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    web::logger::init(LevelFilter::Info);

    let config = web::load_config();
    let clock = Rc::new(PerformanceClock::new());
    let store = Rc::new(GameStore::new());
    let dispatcher: Dispatcher = Rc::new(RefCell::new(RenderDispatcher::new(
        TerminalView::new(&config),
        store.clone(),
        clock.clone(),
    )));
    let sync = SyncController::new(FetchTransport::new(&config), store.clone(), clock.clone(), {
        let dispatcher = dispatcher.clone();
        move || {
            dispatcher.borrow_mut().full_redraw();
        }
    })
    .discard_stale_responses(config.discard_stale_responses);

    let page = Page {
        clock: clock.clone(),
        store: store.clone(),
        dispatcher: dispatcher.clone(),
        sync: Rc::new(sync),
        notice_seconds: config.notice_seconds,
    };
    let click_state = Rc::new(RefCell::new(ClickState::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    page.bootstrap();

    // One handler for the whole grid; targets are rebuilt every frame.
    terminal.on_mouse_event({
        let page = page.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let action = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                .and_then(|(col, row)| cs.hit_test(col, row));
            let Some(action_id) = action else {
                return;
            };
            let tag = cs.entity_for_action(action_id).cloned();
            drop(cs);

            page.click(action_id, tag);
        }
    });

    terminal.on_key_event({
        let page = page.clone();
        move |key_event| {
            if let KeyCode::Char('r') = key_event.code {
                page.retry_if_unsynced();
            }
        }
    });

    let schedule = RefCell::new(TickSchedule::new(config.tick_period_ms));
    terminal.draw_web(move |f| {
        if schedule.borrow_mut().poll(clock.now_ms()) {
            dispatcher.borrow_mut().tick();
        }
        let d = dispatcher.borrow();
        d.view().draw(
            f,
            store.session_state(),
            clock.now(),
            &mut click_state.borrow_mut(),
        );
    });

    Ok(())
}
