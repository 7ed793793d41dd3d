use crate::render;
use crate::theme::Theme;
use crate::words;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use wordtrail_core::{Position, SelectionOutcome, Session};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// The main application state
pub struct App {
    pub session: Session,
    /// Keyboard cursor
    pub cursor: Position,
    pub theme: Theme,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Index into the built-in eras
    pub era: usize,
    /// Seed the session was started with
    pub seed: u64,
    /// Seeds word pools after an era switch
    rng: StdRng,
}

impl App {
    pub fn new(session: Session, era: usize, seed: u64) -> Self {
        let mut app = Self {
            session,
            cursor: Position::new(0, 0),
            theme: Theme::dark(),
            message: None,
            message_timer: 0,
            era,
            seed,
            rng: StdRng::seed_from_u64(seed),
        };
        app.next_word();
        app
    }

    pub fn get_tick_rate(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Update timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
        self.session.tick(Instant::now());
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            KeyCode::Enter | KeyCode::Char(' ') => {
                let outcome = if self.session.engine().is_selecting() {
                    self.session.end_selection()
                } else {
                    self.session.begin_selection(self.cursor)
                };
                self.report(outcome);
            }
            KeyCode::Esc => {
                let outcome = self.session.cancel_selection();
                self.report(outcome);
            }

            KeyCode::Char('?') => match self.session.hint(Instant::now()) {
                Some(pos) => self.show_message(&format!(
                    "Starts at row {}, col {}",
                    pos.row + 1,
                    pos.col + 1
                )),
                None => self.show_message("No hint available"),
            },
            KeyCode::Char('n') => self.next_word(),
            KeyCode::Char('e') => self.next_era(),
            KeyCode::Char('t') => self.theme = self.theme.toggled(),
            _ => {}
        }
        AppAction::Continue
    }

    /// Press, drag and release trace a word. `term` is the terminal size.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, term: (u16, u16)) {
        let size = self.session.config().grid_size;
        let origin = render::grid_origin(term.0, term.1, size);
        let cell = render::cell_at(origin, size, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(pos) = cell {
                    self.cursor = pos;
                    let outcome = self.session.begin_selection(pos);
                    self.report(outcome);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(pos) = cell {
                    if let SelectionOutcome::Changed(_) = self.session.extend_selection(pos) {
                        self.cursor = pos;
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let outcome = if cell.is_some() {
                    self.session.end_selection()
                } else {
                    self.session.cancel_selection()
                };
                self.report(outcome);
            }
            _ => {}
        }
    }

    fn report(&mut self, outcome: SelectionOutcome) {
        match outcome {
            SelectionOutcome::Accepted(_) => {
                let word = self.session.current_word().unwrap_or_default().to_string();
                match self.session.take_storage_error() {
                    Some(e) => self.show_message(&format!("Solved {}! (not saved: {})", word, e)),
                    None => {
                        let (solved, total) = self.session.era_progress();
                        self.show_message(&format!("Solved {}! {}/{} this era", word, solved, total));
                    }
                }
            }
            SelectionOutcome::Rejected => self.show_message("Not quite, try again"),
            SelectionOutcome::Changed(_) | SelectionOutcome::Ignored => {}
        }
    }

    /// Open the next word of the era, skipping any that cannot be placed
    pub fn next_word(&mut self) {
        let mut skipped = 0;
        loop {
            match self.session.next_puzzle() {
                Some(Ok(_)) => {
                    self.cursor = Position::new(0, 0);
                    if skipped > 0 {
                        self.show_message(&format!("Skipped {} word(s) that did not fit", skipped));
                    } else {
                        self.message = None;
                    }
                    return;
                }
                Some(Err(_)) => skipped += 1,
                None => {
                    self.show_message("Era complete! Press e for the next era");
                    return;
                }
            }
        }
    }

    /// Switch to the following built-in era with a fresh word pool
    pub fn next_era(&mut self) {
        self.era = (self.era + 1) % words::era_count();
        let supply = words::supply(self.era, self.rng.gen());
        self.session.reset_word_pool(Box::new(supply));
        log::info!("switched to era {}", self.session.supply().active_era());
        self.next_word();
        if self.message.is_none() {
            let era = self.session.supply().active_era().to_string();
            self.show_message(&format!("Welcome to the {} era", era));
        }
    }

    /// Move the cursor; while tracing, moving also extends the trace
    fn move_cursor(&mut self, row_delta: i32, col_delta: i32) {
        let max = self.session.config().grid_size as i32 - 1;
        let new_row = (self.cursor.row as i32 + row_delta).clamp(0, max) as usize;
        let new_col = (self.cursor.col as i32 + col_delta).clamp(0, max) as usize;
        self.cursor = Position::new(new_row, new_col);

        if self.session.engine().is_selecting() {
            self.session.extend_selection(self.cursor);
        }
    }
}
