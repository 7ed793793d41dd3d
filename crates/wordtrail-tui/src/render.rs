use crate::app::App;
use crate::theme::Theme;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;
use std::time::Instant;
use wordtrail_core::{Cell, Position, SelectionPhase};

/// Width of the info panel plus the gap before it
const PANEL_WIDTH: u16 = 30;

/// Cells are drawn as `| X |`: 4 columns and 2 rows per cell plus a closing border
pub fn grid_extent(size: usize) -> (u16, u16) {
    let size = size as u16;
    (size * 4 + 1, size * 2 + 1)
}

/// Top-left corner of the grid for a terminal of the given size
pub fn grid_origin(term_width: u16, term_height: u16, size: usize) -> (u16, u16) {
    let (grid_width, grid_height) = grid_extent(size);
    let total_width = grid_width + PANEL_WIDTH;
    let x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let y = if term_height > grid_height + 8 { 2 } else { 1 };
    (x, y)
}

/// The cell under a terminal coordinate. Borders map to nothing.
pub fn cell_at(origin: (u16, u16), size: usize, column: u16, row: u16) -> Option<Position> {
    let dx = column.checked_sub(origin.0 + 1)?;
    let dy = row.checked_sub(origin.1 + 1)?;
    if dx % 4 == 3 || dy % 2 == 1 {
        return None;
    }
    let pos = Position::new((dy / 2) as usize, (dx / 4) as usize);
    pos.in_bounds(size).then_some(pos)
}

/// Linear blend from `from` to `to`; `t` in `[0, 1]`.
/// Non-RGB colors switch halfway.
pub fn fade(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb { r: r1, g: g1, b: b1 }, Color::Rgb { r: r2, g: g2, b: b2 }) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb {
                r: mix(r1, r2),
                g: mix(g1, g2),
                b: mix(b1, b2),
            }
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

/// Foreground and background for one cell. Solved beats selected beats the
/// hint flash beats the cursor. The flash fades out as its progress runs.
pub fn cell_colors(
    theme: &Theme,
    cell: &Cell,
    cursor: Position,
    flash: Option<(Position, f32)>,
) -> (Color, Color) {
    let flashing = flash.filter(|&(pos, _)| pos == cell.position());

    if cell.is_solved() {
        (theme.solved_fg, theme.solved_bg)
    } else if cell.is_selected() {
        (theme.fg, theme.selected_bg)
    } else if let Some((_, progress)) = flashing {
        let base = if cursor == cell.position() {
            theme.cursor_bg
        } else {
            theme.bg
        };
        (theme.bg, fade(theme.highlight_bg, base, progress))
    } else if cursor == cell.position() {
        (theme.fg, theme.cursor_bg)
    } else {
        (theme.fg, theme.bg)
    }
}

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide)?;
    execute!(
        stdout,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    let size = app.session.config().grid_size;
    let (x, y) = grid_origin(term_width, term_height, size);
    let (grid_width, grid_height) = grid_extent(size);

    render_grid(stdout, app, x, y)?;
    render_info_panel(stdout, app, x + grid_width + 3, y)?;
    render_controls(stdout, app, x, y + grid_height + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let Some(grid) = app.session.grid() else {
        execute!(
            stdout,
            MoveTo(x, y),
            SetForegroundColor(theme.info),
            Print("No word loaded")
        )?;
        return Ok(());
    };

    let flash = app.session.highlight_progress(Instant::now());
    let border_line = format!("+{}", "---+".repeat(grid.size()));

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.border),
        Print(&border_line)
    )?;

    for (r, row) in grid.rows().enumerate() {
        let cell_y = y + 1 + r as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for cell in row {
            let (fg, bg) = cell_colors(theme, cell, app.cursor, flash);
            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.border),
                Print("|"),
                SetForegroundColor(fg),
                SetBackgroundColor(bg),
                Print(format!(" {} ", cell.letter()))
            )?;
        }

        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print("|"),
            MoveTo(x, cell_y + 1),
            Print(&border_line)
        )?;
    }

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("=== WORDTRAIL ===")
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Era:    {:>10}", session.supply().active_era()))
    )?;

    let (solved, total) = session.era_progress();
    let progress_color = if total > 0 && solved == total {
        theme.success
    } else {
        theme.info
    };
    execute!(
        stdout,
        MoveTo(x, y + 3),
        SetForegroundColor(theme.info),
        Print("Solved: "),
        SetForegroundColor(progress_color),
        Print(format!("{:>10}", format!("{}/{}", solved, total)))
    )?;

    let word = session.current_word().unwrap_or("-");
    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(theme.info),
        Print("Find:   "),
        SetForegroundColor(theme.fg),
        Print(format!("{:>10}", word))
    )?;

    let trace = session
        .grid()
        .map(|grid| grid.spell(session.engine().selection()))
        .unwrap_or_default();
    execute!(
        stdout,
        MoveTo(x, y + 6),
        SetForegroundColor(theme.info),
        Print("Trace:  "),
        SetForegroundColor(theme.fg),
        Print(format!("{:>10}", trace))
    )?;

    let (status, status_color) = if session.is_current_solved() {
        ("Solved", theme.success)
    } else if session.engine().phase() == SelectionPhase::Selecting {
        ("Tracing", theme.key)
    } else {
        ("", theme.info)
    };
    execute!(
        stdout,
        MoveTo(x, y + 8),
        SetForegroundColor(status_color),
        Print(format!("{:<18}", status))
    )?;

    if !session.skipped().is_empty() {
        execute!(
            stdout,
            MoveTo(x, y + 9),
            SetForegroundColor(theme.error),
            Print(format!("Skipped: {}", session.skipped().len()))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, y + 11),
        SetForegroundColor(theme.info),
        Print(format!("Seed: {}", app.seed))
    )?;

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("hjkl/Arrows", "Move"),
        ("Enter/Spc", "Trace"),
        ("Esc", "Release"),
        ("Mouse", "Drag"),
        ("?", "Hint"),
        ("n", "Next word"),
        ("e", "Next era"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // 3 columns of 3
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 3;
        let row = i % 3;
        let cx = x + (col as u16) * 22;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>11}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.len() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded)
    )?;

    Ok(())
}
