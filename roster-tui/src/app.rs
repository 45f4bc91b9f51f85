//! Application state, input handling and the event loop.

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use futures::StreamExt;
use log::{debug, error, info};
use roster_lib::error::ApiError;
use roster_lib::{Action, Outcome, Record, RosterClient, TableState};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::hit::{HitMap, Target};
use crate::settings::SettingsError;
use crate::spinner::Spinner;
use crate::terminal::Terminal;
use crate::text_field::{FieldResult, TextField};
use crate::view;

/// Error type for running the app.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Which widget receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
}

/// Table-focus key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Table(Action),
    CursorUp,
    CursorDown,
    ToggleCursorRow,
    EditCursorRow,
    DeleteCursorRow,
    FocusSearch,
    Quit,
}

/// Maps a key pressed while the table has focus.
pub fn table_command(key: KeyEvent) -> Option<Command> {
    let command = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Command::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Command::CursorDown,
        KeyCode::Char(' ') => Command::ToggleCursorRow,
        KeyCode::Char('a') => Command::Table(Action::ToggleSelectAll),
        KeyCode::Char('e') | KeyCode::Enter => Command::EditCursorRow,
        KeyCode::Char('d') | KeyCode::Delete => Command::DeleteCursorRow,
        KeyCode::Char('D') => Command::Table(Action::DeleteSelected),
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => Command::Table(Action::PrevPage),
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => {
            Command::Table(Action::NextPage)
        }
        KeyCode::Home | KeyCode::Char('g') => Command::Table(Action::FirstPage),
        KeyCode::End | KeyCode::Char('G') => Command::Table(Action::LastPage),
        KeyCode::Char(c @ '1'..='9') => {
            Command::Table(Action::GoToPage(c as usize - '0' as usize))
        }
        KeyCode::Char('/') | KeyCode::Tab => Command::FocusSearch,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Everything the view draws, plus UI-only state around the table.
#[derive(Debug)]
pub struct App {
    pub(crate) table: TableState,
    pub(crate) focus: Focus,
    /// Row index within the current page.
    pub(crate) cursor: usize,
    pub(crate) search: TextField,
    pub(crate) editor: TextField,
    pub(crate) loading: bool,
    pub(crate) tick: usize,
    quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// A fresh app waiting for the initial load.
    pub fn new() -> Self {
        Self {
            table: TableState::new(),
            focus: Focus::Table,
            cursor: 0,
            search: TextField::default(),
            editor: TextField::default(),
            loading: true,
            tick: 0,
            quit: false,
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Applies the result of the initial fetch.
    ///
    /// A failed load leaves the table empty; the failure is only logged.
    pub fn on_loaded(&mut self, result: Result<Vec<Record>, ApiError>) {
        self.loading = false;
        match result {
            Ok(records) => {
                self.dispatch(Action::Loaded(records));
            }
            Err(e) => debug!("Initial load failed, showing an empty table: {}", e),
        }
    }

    /// Applies a table action and keeps UI state consistent with it.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let editing_before = self.table.editing_id();
        let outcome = self.table.apply(action);

        let editing_after = self.table.editing_id();
        if editing_after != editing_before {
            if let Some(id) = editing_after {
                self.editor = TextField::new(self.table.edit_buffer().unwrap_or_default());
                if let Some(row) = self.table.page_slice().iter().position(|r| r.id == id) {
                    self.cursor = row;
                }
            }
        }

        self.clamp_cursor();
        outcome
    }

    /// Id of the record under the cursor.
    pub fn cursor_id(&self) -> Option<u64> {
        self.table.page_slice().get(self.cursor).map(|r| r.id)
    }

    fn clamp_cursor(&mut self) {
        let len = self.table.page_slice().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Handles the next item from the terminal event stream.
    ///
    /// A stream error or the end of the stream ends the session.
    pub fn handle_stream_item(
        &mut self,
        item: Option<std::io::Result<CrosstermEvent>>,
        hits: &HitMap,
    ) -> bool {
        match item {
            Some(Ok(event)) => self.handle_event(event, hits),
            Some(Err(e)) => {
                error!("Event stream error, exiting: {}", e);
                self.quit = true;
                true
            }
            None => {
                info!("Event stream closed, exiting");
                self.quit = true;
                true
            }
        }
    }

    /// Handles one terminal event. Returns `true` if a redraw is needed.
    pub fn handle_event(&mut self, event: CrosstermEvent, hits: &HitMap) -> bool {
        match event {
            CrosstermEvent::Key(key) => self.handle_key(key),
            CrosstermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    match hits.hit_test(mouse.column, mouse.row) {
                        Some(target) => self.handle_click(target),
                        None => false,
                    }
                }
                MouseEventKind::ScrollUp => self.dispatch(Action::PrevPage).is_changed(),
                MouseEventKind::ScrollDown => self.dispatch(Action::NextPage).is_changed(),
                _ => false,
            },
            CrosstermEvent::Resize(..) => true,
            _ => false,
        }
    }

    /// Handles a key press. Returns `true` if a redraw is needed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            info!("Quit requested");
            self.quit = true;
            return true;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Table if self.table.editing_id().is_some() => self.handle_edit_key(key),
            Focus::Table => self.handle_table_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match self.search.handle_key(key) {
            FieldResult::Changed => {
                self.dispatch(Action::SetSearch(self.search.text().to_string()));
                true
            }
            FieldResult::Submitted | FieldResult::Cancelled => {
                self.focus = Focus::Table;
                true
            }
            FieldResult::Handled => true,
            FieldResult::Ignored => match key.code {
                KeyCode::Tab | KeyCode::Down => {
                    self.focus = Focus::Table;
                    true
                }
                _ => false,
            },
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        match self.editor.handle_key(key) {
            FieldResult::Changed => {
                self.dispatch(Action::EditInput(self.editor.text().to_string()));
                true
            }
            FieldResult::Submitted => self.dispatch(Action::SaveEdit).is_changed(),
            FieldResult::Cancelled => self.dispatch(Action::CancelEdit).is_changed(),
            FieldResult::Handled => true,
            FieldResult::Ignored => self.handle_table_key(key),
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> bool {
        let Some(command) = table_command(key) else {
            return false;
        };
        debug!("Command: {:?}", command);
        self.run_command(command)
    }

    fn run_command(&mut self, command: Command) -> bool {
        match command {
            Command::Table(action) => self.dispatch(action).is_changed(),
            Command::CursorUp => {
                let moved = self.cursor > 0;
                self.cursor = self.cursor.saturating_sub(1);
                moved
            }
            Command::CursorDown => {
                let before = self.cursor;
                self.cursor += 1;
                self.clamp_cursor();
                self.cursor != before
            }
            Command::ToggleCursorRow => self.on_cursor(Action::ToggleRow),
            Command::EditCursorRow => self.on_cursor(Action::BeginEdit),
            Command::DeleteCursorRow => self.on_cursor(Action::Delete),
            Command::FocusSearch => {
                self.focus = Focus::Search;
                true
            }
            Command::Quit => {
                info!("Quit requested");
                self.quit = true;
                true
            }
        }
    }

    fn on_cursor(&mut self, make: fn(u64) -> Action) -> bool {
        match self.cursor_id() {
            Some(id) => self.dispatch(make(id)).is_changed(),
            None => false,
        }
    }

    /// Handles a left click on `target`.
    pub fn handle_click(&mut self, target: Target) -> bool {
        debug!("Click: {:?}", target);

        if target == Target::SearchBox {
            self.focus = Focus::Search;
            return true;
        }
        self.focus = Focus::Table;

        let action = match target {
            Target::SearchBox => return true,
            Target::Row(index) => {
                self.cursor = index;
                self.clamp_cursor();
                return true;
            }
            Target::SelectAll => Action::ToggleSelectAll,
            Target::RowCheckbox(id) => Action::ToggleRow(id),
            Target::Edit(id) => Action::BeginEdit(id),
            Target::Delete(id) => Action::Delete(id),
            Target::Save => Action::SaveEdit,
            Target::Cancel => Action::CancelEdit,
            Target::FirstPage => Action::FirstPage,
            Target::PrevPage => Action::PrevPage,
            Target::NextPage => Action::NextPage,
            Target::LastPage => Action::LastPage,
            Target::Page(page) => Action::GoToPage(page),
            Target::DeleteSelected => Action::DeleteSelected,
        };
        self.dispatch(action);
        true
    }
}

/// Runs the terminal UI until the user quits.
///
/// The feed is fetched once, in the background; the table is usable (and
/// empty) while the request is in flight.
pub async fn run(client: RosterClient) -> Result<(), AppError> {
    let mut terminal = Terminal::new()?;

    let (load_tx, mut load_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let result = client.fetch_records().await;
        let _ = load_tx.send(result).await;
    });

    let spinner = Spinner::default();
    let mut spinner_interval = tokio::time::interval(spinner.interval());
    spinner_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut app = App::new();
    let mut hits = HitMap::new();
    let mut events = EventStream::new();
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|buf| view::render(&app, &spinner, buf, &mut hits))?;
            dirty = false;
        }

        if app.should_quit() {
            break;
        }

        tokio::select! {
            item = events.next() => dirty = app.handle_stream_item(item, &hits),

            Some(result) = load_rx.recv() => {
                app.on_loaded(result);
                dirty = true;
            }

            _ = spinner_interval.tick(), if app.is_loading() => {
                app.tick = app.tick.wrapping_add(1);
                dirty = true;
            }
        }
    }

    Ok(())
}
