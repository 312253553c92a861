//! Terminal puzzle runner (default binary).
//!
//! A minimal front-end over the engine: renders the occupancy grid as text,
//! turns arrow keys into one-cell drags, and wires undo and in-memory
//! save/restore. Entirely pixel-free: the keyboard produces grid coordinates
//! directly, which is the only currency the engine deals in.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    style::Print,
    terminal, QueueableCommand,
};
use tracing_subscriber::EnvFilter;

use gridlock::adapter::SaveState;
use gridlock::core::{
    BestResults, Board, CompletionTemplate, ExclusionMask, GameDefinition, PuzzleSession,
    StartLayout, TilePlacement, TileSpec,
};
use gridlock::types::{GridPos, MovementConstraint};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let definition = klotski()?;
    let mut app = App::new(definition.open_session("standard")?);

    enter_terminal()?;
    let result = app.run();
    let _ = leave_terminal();
    result
}

/// The classic Klotski arrangement: free Cao Cao (the 2x2 tile) by sliding
/// him to the bottom-center exit.
fn klotski() -> Result<GameDefinition> {
    let definition = GameDefinition::new(
        "klotski",
        Board::new(4, 5, ExclusionMask::none()),
        vec![
            TileSpec::rect("caocao", 2, 2),
            TileSpec::rect("guanyu", 2, 1),
            TileSpec::rect("zhangfei", 1, 2),
            TileSpec::rect("zhaoyun", 1, 2),
            TileSpec::rect("machao", 1, 2),
            TileSpec::rect("huangzhong", 1, 2),
            TileSpec::rect("bing1", 1, 1),
            TileSpec::rect("bing2", 1, 1),
            TileSpec::rect("bing3", 1, 1),
            TileSpec::rect("bing4", 1, 1),
        ],
        MovementConstraint::None,
        vec![StartLayout::new(
            "standard",
            vec![
                TilePlacement::new("zhangfei", GridPos::new(0, 0)),
                TilePlacement::new("caocao", GridPos::new(1, 0)),
                TilePlacement::new("zhaoyun", GridPos::new(3, 0)),
                TilePlacement::new("machao", GridPos::new(0, 2)),
                TilePlacement::new("guanyu", GridPos::new(1, 2)),
                TilePlacement::new("huangzhong", GridPos::new(3, 2)),
                TilePlacement::new("bing1", GridPos::new(0, 4)),
                TilePlacement::new("bing2", GridPos::new(1, 3)),
                TilePlacement::new("bing3", GridPos::new(2, 3)),
                TilePlacement::new("bing4", GridPos::new(3, 4)),
            ],
        )],
        vec![CompletionTemplate::new(
            "escape",
            vec![TilePlacement::new("caocao", GridPos::new(1, 3))],
        )],
    )?;
    Ok(definition)
}

fn enter_terminal() -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.queue(terminal::EnterAlternateScreen)?;
    stdout.queue(cursor::Hide)?;
    stdout.flush()?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.queue(cursor::Show)?;
    stdout.queue(terminal::LeaveAlternateScreen)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

struct App {
    session: PuzzleSession,
    selected: usize,
    best: BestResults,
    saved: Option<String>,
    status: String,
}

impl App {
    fn new(session: PuzzleSession) -> Self {
        Self {
            session,
            selected: 0,
            best: BestResults::new(),
            saved: None,
            status: String::from("arrows move, tab selects, u undo, s/r save/restore, q quit"),
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Tab => self.cycle_selection(1),
                    KeyCode::BackTab => self.cycle_selection(-1),
                    KeyCode::Left => self.try_step(-1, 0)?,
                    KeyCode::Right => self.try_step(1, 0)?,
                    KeyCode::Up => self.try_step(0, -1)?,
                    KeyCode::Down => self.try_step(0, 1)?,
                    KeyCode::Char('u') => self.undo()?,
                    KeyCode::Char('s') => self.save()?,
                    KeyCode::Char('r') => self.restore()?,
                    _ => {}
                }
            }
        }
    }

    fn cycle_selection(&mut self, step: isize) {
        let count = self.session.tiles().len() as isize;
        self.selected = (self.selected as isize + step).rem_euclid(count) as usize;
        self.status.clear();
    }

    /// One keypress = one single-cell drag: select, validate, release.
    fn try_step(&mut self, dx: i32, dy: i32) -> Result<()> {
        let identity = self.session.tiles()[self.selected].identity().to_string();
        let anchor = self.session.tiles()[self.selected].anchor();
        let target = anchor.offset(dx, dy);

        self.session.select_tile(&identity)?;
        let outcome = self.session.check_movement(target, dx != 0);

        match self.session.release()? {
            Some(commit) => {
                self.status = format!("{identity} -> {target} ({} moves)", commit.move_count);
                if let Some(template) = commit.completed {
                    self.best
                        .record(self.session.instance(), commit.move_count);
                    self.status = format!(
                        "solved `{template}` in {} moves (best {})",
                        commit.move_count,
                        self.best
                            .best_for(self.session.instance())
                            .unwrap_or(commit.move_count),
                    );
                }
            }
            None => {
                let axis = if outcome.x_blocked {
                    "x blocked"
                } else if outcome.y_blocked {
                    "y blocked"
                } else {
                    "no movement"
                };
                self.status = format!("{identity}: {axis}");
            }
        }
        Ok(())
    }

    fn undo(&mut self) -> Result<()> {
        self.status = match self.session.undo()? {
            Some(mv) => format!("undid {} back to {}", mv.identity, mv.from),
            None => String::from("nothing to undo"),
        };
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let save = SaveState::from(&self.session.snapshot());
        self.saved = Some(save.to_json()?);
        self.status = String::from("saved");
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.status = match &self.saved {
            Some(json) => {
                let snapshot = SaveState::from_json(json)?.into_snapshot();
                self.session.restore(&snapshot)?;
                String::from("restored")
            }
            None => String::from("nothing saved yet"),
        };
        Ok(())
    }

    fn draw(&self) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.queue(terminal::Clear(terminal::ClearType::All))?;

        let grid = self.session.grid();
        let selected_id = self.session.tiles()[self.selected].grid_id();

        for y in 0..grid.height() {
            stdout.queue(cursor::MoveTo(0, y as u16))?;
            let mut line = String::with_capacity(grid.width() as usize * 2);
            for x in 0..grid.width() {
                let tag = grid.get(x, y).unwrap_or(-1);
                let glyph = match tag {
                    -1 => '#',
                    0 => '.',
                    id => {
                        let letter = (b'A' + (id - 1) as u8) as char;
                        if id == selected_id {
                            letter.to_ascii_lowercase()
                        } else {
                            letter
                        }
                    }
                };
                line.push(glyph);
                line.push(' ');
            }
            stdout.queue(Print(line))?;
        }

        let base = grid.height() as u16 + 1;
        stdout.queue(cursor::MoveTo(0, base))?;
        stdout.queue(Print(format!(
            "selected: {}  moves: {}",
            self.session.tiles()[self.selected].identity(),
            self.session.move_count()
        )))?;
        stdout.queue(cursor::MoveTo(0, base + 1))?;
        stdout.queue(Print(&self.status))?;
        stdout.flush()?;
        Ok(())
    }
}
