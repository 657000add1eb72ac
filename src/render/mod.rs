use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::data::{LevelId, monsters::HostileKind};
use crate::map::{COLS, Cell, Facing, ROWS};
use crate::narrative::Narrative;
use crate::session::{GameSession, Notice, Phase};

const CELL_W: i32 = 3;
const CELL_H: i32 = 2;
const MAP_ORIGIN: Point = Point { x: 25, y: 7 };
const LOG_PANEL_TOP: i32 = 30;
const LOG_ROWS: usize = 16;

/// Per-level colours for the static parts of the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    pub floor: RGB,
    pub wall: RGB,
    pub accent: RGB,
    pub decoration: FontCharType,
}

pub fn palette(level: LevelId) -> Palette {
    match level.number() {
        1 => Palette {
            floor: RGB::from_u8(40, 40, 40),
            wall: RGB::from_u8(139, 69, 19),
            accent: RGB::from_u8(255, 215, 0),
            decoration: to_cp437('♠'),
        },
        2 => Palette {
            floor: RGB::from_u8(20, 50, 20),
            wall: RGB::from_u8(34, 139, 34),
            accent: RGB::from_u8(144, 238, 144),
            decoration: to_cp437('♣'),
        },
        3 => Palette {
            floor: RGB::from_u8(25, 25, 60),
            wall: RGB::from_u8(112, 128, 144),
            accent: RGB::from_u8(135, 206, 250),
            decoration: to_cp437('*'),
        },
        _ => Palette {
            floor: RGB::from_u8(50, 10, 10),
            wall: RGB::from_u8(90, 90, 90),
            accent: RGB::from_u8(255, 69, 0),
            decoration: to_cp437('♦'),
        },
    }
}

pub fn player_glyph(facing: Facing) -> FontCharType {
    match facing {
        Facing::Up => to_cp437('▲'),
        Facing::Right => to_cp437('►'),
        Facing::Down => to_cp437('▼'),
        Facing::Left => to_cp437('◄'),
    }
}

/// Glyph and foreground for one cell.
pub fn cell_glyph(cell: Cell, level: LevelId, facing: Facing) -> (FontCharType, RGB) {
    let colors = palette(level);
    match cell {
        Cell::Floor => (to_cp437('·'), colors.floor),
        Cell::Wall => (to_cp437('█'), colors.wall),
        Cell::Hedge => (to_cp437('♣'), RGB::from_u8(0, 100, 0)),
        Cell::Decoration => (colors.decoration, colors.accent),
        Cell::Item(item) => (to_cp437(item.glyph()), RGB::named(GOLD)),
        Cell::Exit => (to_cp437('∩'), RGB::named(LIGHT_GREEN)),
        Cell::Sage => (to_cp437('☺'), RGB::named(LIGHT_CYAN)),
        Cell::Player => (player_glyph(facing), RGB::named(WHITE)),
        Cell::Monster | Cell::Warden => {
            let color = HostileKind::from_cell(cell)
                .map(|kind| kind.color(level))
                .unwrap_or_else(|| RGB::named(RED));
            (to_cp437(cell.glyph()), color)
        }
        Cell::Trap => (to_cp437('☼'), RGB::named(ORANGE)),
    }
}

pub fn draw_session(ctx: &mut BTerm, session: &GameSession) {
    ctx.cls();
    match session.phase() {
        Phase::Menu => draw_menu(ctx, session.has_save()),
        Phase::Playing => draw_game(ctx, session),
        Phase::Paused => {
            draw_game(ctx, session);
            draw_pause(ctx);
        }
        Phase::Won => draw_win(ctx),
    }
    if let Some(notice) = session.notice() {
        draw_notice(ctx, notice);
    }
}

fn draw_game(ctx: &mut BTerm, session: &GameSession) {
    draw_hud(ctx, session);
    draw_grid(ctx, session);
    if let Some(text) = session.speech() {
        draw_speech(ctx, text, session.player().point);
    }
    draw_log(ctx, session.narrative(), LOG_PANEL_TOP);
}

fn draw_hud(ctx: &mut BTerm, session: &GameSession) {
    let level = session.level();
    let accent = palette(level).accent;
    ctx.draw_box(0, 0, 79, 5, RGB::named(GRAY), RGB::named(BLACK));
    ctx.print_color(2, 1, accent, RGB::named(BLACK), level.spec().title);
    ctx.print_color(
        2,
        2,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("Objective: {}", session.objective()),
    );
    let item = if session.player().has_item {
        format!("Carrying: {}", level.spec().item.as_str())
    } else {
        "Carrying: nothing".to_string()
    };
    ctx.print_color(2, 3, RGB::named(LIGHT_BLUE), RGB::named(BLACK), item);
    ctx.print_color(
        48,
        3,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
        "H help · P pause · V save",
    );
}

fn screen_point(point: Point) -> Point {
    Point::new(
        MAP_ORIGIN.x + point.x * CELL_W + CELL_W / 2,
        MAP_ORIGIN.y + point.y * CELL_H,
    )
}

fn draw_grid(ctx: &mut BTerm, session: &GameSession) {
    let level = session.level();
    let grid = session.grid();
    let facing = session.player().facing;
    let item = Cell::Item(level.spec().item);
    let glow = RGB::named(BLACK).lerp(RGB::named(GOLD), session.glow() * 0.6);

    for y in 0..ROWS {
        for x in 0..COLS {
            let point = Point::new(x, y);
            let Some(cell) = grid.cell_at(point) else {
                continue;
            };
            let (glyph, fg) = cell_glyph(cell, level, facing);
            let glowing = cell == item && session.item_nearby();
            let bg = if glowing { glow } else { RGB::named(BLACK) };
            let screen = screen_point(point);
            if cell == Cell::Wall || glowing {
                let fill = if glowing { to_cp437(' ') } else { glyph };
                for dx in 0..CELL_W {
                    ctx.set(screen.x - CELL_W / 2 + dx, screen.y, fg, bg, fill);
                }
            }
            ctx.set(screen.x, screen.y, fg, bg, glyph);
        }
    }
}

fn draw_speech(ctx: &mut BTerm, text: &str, player: Point) {
    let width = (text.chars().count() as i32 + 2).min(78);
    let anchor = screen_point(player);
    let x = (anchor.x - width / 2).clamp(0, 79 - width);
    let y = (anchor.y - 3).max(0);
    ctx.draw_box(x, y, width, 2, RGB::named(LIGHT_CYAN), RGB::named(BLACK));
    let shown: String = text.chars().take((width - 2).max(0) as usize).collect();
    ctx.print_color(x + 1, y + 1, RGB::named(WHITE), RGB::named(BLACK), shown);
}

pub fn draw_log(ctx: &mut BTerm, narrative: &Narrative, start_y: i32) {
    let (width, height) = ctx.get_char_size();
    let width = width as i32;
    let bottom = height as i32 - 1;
    ctx.draw_box(
        0,
        start_y,
        width - 1,
        bottom - start_y,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, start_y, RGB::named(WHITE), RGB::named(BLACK), " Chronicle ");
    let recent: Vec<_> = narrative.entries().rev().take(LOG_ROWS).collect();
    for (row, entry) in recent.iter().rev().enumerate() {
        let line = format!("[{}] {}", entry.at.format("%H:%M:%S"), entry.text);
        let line: String = line.chars().take((width - 4) as usize).collect();
        ctx.print(2, start_y + 1 + row as i32, line);
    }
}

fn draw_menu(ctx: &mut BTerm, has_save: bool) {
    ctx.print_color_centered(12, RGB::named(GOLD), RGB::named(BLACK), "THE CURSED LABYRINTH");
    ctx.print_color_centered(
        14,
        RGB::named(GRAY),
        RGB::named(BLACK),
        "Lift the curse. Escape the Warden.",
    );
    ctx.print_color_centered(20, RGB::named(WHITE), RGB::named(BLACK), "[N] New Game");
    let resume = if has_save {
        RGB::named(WHITE)
    } else {
        RGB::named(DARK_GRAY)
    };
    ctx.print_color_centered(22, resume, RGB::named(BLACK), "[R] Continue");
    ctx.print_color_centered(24, RGB::named(WHITE), RGB::named(BLACK), "[Q] Quit");
}

fn draw_pause(ctx: &mut BTerm) {
    ctx.draw_box(28, 14, 24, 6, RGB::named(YELLOW), RGB::named(BLACK));
    ctx.print_color_centered(16, RGB::named(YELLOW), RGB::named(BLACK), "PAUSED");
    ctx.print_color_centered(18, RGB::named(WHITE), RGB::named(BLACK), "[P] Resume  [Q] Menu");
}

fn draw_win(ctx: &mut BTerm) {
    ctx.print_color_centered(16, RGB::named(GOLD), RGB::named(BLACK), "CURSE SHATTERED!");
    ctx.print_color_centered(
        19,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "You defeated the Warden and saved the realm!",
    );
    ctx.print_color_centered(24, RGB::named(GRAY), RGB::named(BLACK), "[Enter] Return to menu");
}

fn draw_notice(ctx: &mut BTerm, notice: &Notice) {
    let body = notice.body();
    let lines: Vec<&str> = body.lines().collect();
    let inner = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(24) as i32;
    let width = (inner + 4).min(78);
    let height = lines.len() as i32 + 4;
    let x = (80 - width) / 2;
    let y = 18;
    ctx.draw_box_double(x, y, width, height, RGB::named(WHITE), RGB::named(BLACK));
    ctx.print_color(x + 2, y, RGB::named(YELLOW), RGB::named(BLACK), format!(" {} ", notice.title()));
    for (row, line) in lines.iter().enumerate() {
        ctx.print(x + 2, y + 1 + row as i32, *line);
    }
    ctx.print_color(
        x + 2,
        y + height - 1,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
        " any key ",
    );
}
