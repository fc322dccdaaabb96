use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use flappy_term::{GameConfig, Phase, SessionState, Snapshot};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rgb(u8, u8, u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn halve(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

/// Sky and hill colours; everything else is shared between day and night.
#[derive(Clone, Copy)]
pub struct Palette {
    sky_top: Rgb,
    sky_bot: Rgb,
    hill: Rgb,
}

impl Palette {
    pub const DAY: Palette = Palette {
        sky_top: Rgb(70, 180, 200),
        sky_bot: Rgb(190, 232, 245),
        hill: Rgb(120, 195, 75),
    };
    pub const NIGHT: Palette = Palette {
        sky_top: Rgb(12, 20, 48),
        sky_bot: Rgb(40, 70, 110),
        hill: Rgb(40, 90, 50),
    };
}

const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const PANEL: Rgb = Rgb(239, 228, 150);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SHADOW; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SHADOW);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn dim(&mut self) {
        for c in &mut self.px {
            *c = c.halve();
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = None;
        let mut prev_bg = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap glyphs ───────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Only the letters the start and game-over screens use.
#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    Some(match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'K' => [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'X' => [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1],
        _ => return None,
    })
}

fn glyph(ch: char) -> Option<[u8; 15]> {
    match ch.to_digit(10) {
        Some(d) => Some(DIGITS[d as usize]),
        None => letter(ch.to_ascii_uppercase()),
    }
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, g: &[u8; 15], fg: Rgb) {
    for row in 0..5 {
        for col in 0..3 {
            if g[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Centered on `cx`; unknown characters leave a blank cell.
fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let total_w = text.chars().count() as i32 * 4 - 1; // 3px per glyph + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            draw_glyph(buf, start_x + i as i32 * 4, y, &g, fg);
        }
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Maps the fixed game field onto whatever the terminal offers.
struct Viewport {
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn x(&self, v: f64) -> i32 {
        (v * self.sx).floor() as i32
    }

    fn y(&self, v: f64) -> i32 {
        (v * self.sy).floor() as i32
    }

    fn w(&self, v: f64) -> i32 {
        ((v * self.sx).round() as i32).max(1)
    }

    fn h(&self, v: f64) -> i32 {
        ((v * self.sy).round() as i32).max(1)
    }
}

/// What to lay over the playfield besides the score.
pub enum Overlay {
    None,
    StartPrompt,
    GameOver { score: u32, best: u32 },
}

pub struct Scene {
    config: GameConfig,
    palette: Palette,
}

impl Scene {
    pub fn new(config: &GameConfig, palette: Palette) -> Self {
        Self {
            config: config.clone(),
            palette,
        }
    }

    pub fn draw(&self, buf: &mut PixelBuf, snap: &Snapshot<'_>, overlay: &Overlay) {
        let vp = Viewport {
            sx: buf.w as f64 / self.config.width,
            sy: buf.h as f64 / self.config.height,
        };
        let ground_y = vp.y(snap.ground_line);

        self.draw_sky(buf, ground_y);
        self.draw_hills(buf, ground_y, snap.ground_offset);
        self.draw_pipes(buf, &vp, snap, ground_y);
        self.draw_ground(buf, &vp, snap.ground_offset, ground_y);
        draw_bird(buf, &vp, snap);

        let cx = buf.w as i32 / 2;
        match overlay {
            Overlay::None => {
                if snap.state != SessionState::Ended {
                    draw_text(buf, cx, 4, &snap.score.to_string(), WHITE);
                }
            }
            Overlay::StartPrompt => {
                draw_text(buf, cx, vp.y(285.0), "CLICK TO START", WHITE);
            }
            Overlay::GameOver { score, best } => self.draw_game_over(buf, &vp, *score, *best),
        }
    }

    fn draw_sky(&self, buf: &mut PixelBuf, ground_y: i32) {
        let sky_h = ground_y.max(1);
        for y in 0..sky_h {
            let t = (y as u32 * 256 / sky_h as u32) as u16;
            let c = Rgb::lerp(self.palette.sky_top, self.palette.sky_bot, t);
            for x in 0..buf.w as i32 {
                buf.set(x, y, c);
            }
        }
    }

    fn draw_hills(&self, buf: &mut PixelBuf, base: i32, offset: f64) {
        let amp = (buf.h as f64 / 48.0).max(1.0);
        for x in 0..buf.w as i32 {
            let fx = (x as f64 - offset * 0.2) * 0.05;
            let h = (fx.sin() * 4.0 + (fx * 1.7).sin() * 2.0 + 6.0) * amp;
            for y in (base - h as i32)..base {
                buf.set(x, y, self.palette.hill);
            }
        }
    }

    fn draw_pipes(&self, buf: &mut PixelBuf, vp: &Viewport, snap: &Snapshot<'_>, ground_y: i32) {
        let cap_extra = vp.w(3.0);
        let cap_h = vp.h(12.0).max(2);

        for pipe in snap.obstacles {
            let px = vp.x(pipe.x());
            let pw = vp.w(pipe.width());
            let opening_top = vp.y(pipe.opening_top());
            let opening_bot = vp.y(pipe.gap_bottom());

            // Top pipe body
            for x in 0..pw {
                let c = pipe_shade(x, pw);
                for y in vp.y(pipe.gap_top())..opening_top - cap_h {
                    buf.set(px + x, y, c);
                }
            }
            // Top pipe cap
            for x in -cap_extra..(pw + cap_extra) {
                let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
                for y in (opening_top - cap_h)..opening_top {
                    buf.set(px + x, y, c);
                }
                buf.set(px + x, opening_top - 1, CAP_DARK);
            }

            // Bottom pipe cap
            for x in -cap_extra..(pw + cap_extra) {
                let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
                for y in opening_bot..(opening_bot + cap_h) {
                    buf.set(px + x, y, c);
                }
                buf.set(px + x, opening_bot, CAP_DARK);
            }
            // Bottom pipe body
            for x in 0..pw {
                let c = pipe_shade(x, pw);
                for y in (opening_bot + cap_h)..ground_y {
                    buf.set(px + x, y, c);
                }
            }
        }
    }

    fn draw_ground(&self, buf: &mut PixelBuf, vp: &Viewport, offset: f64, gy: i32) {
        let shift = -vp.x(offset);
        for x in 0..buf.w as i32 {
            let alt = ((x + shift) / 3) % 2 == 0;
            buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
            buf.set(x, gy + 1, GRASS);
        }
        for y in (gy + 2)..buf.h as i32 {
            for x in 0..buf.w as i32 {
                let stripe = (x + shift + (y - gy) * 2) % 12 < 6;
                buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }

    fn draw_game_over(&self, buf: &mut PixelBuf, vp: &Viewport, score: u32, best: u32) {
        buf.dim();

        let cx = buf.w as i32 / 2;
        let px = vp.x(25.0);
        let py = vp.y(self.config.height / 2.0 - 75.0);
        let pw = vp.w(250.0);
        let ph = vp.h(150.0).max(30);

        buf.fill_rect(px - 1, py - 1, pw + 2, ph + 2, SHADOW);
        buf.fill_rect(px, py, pw, ph, PANEL);

        draw_text(buf, cx, py + 3, "SCORE", WHITE);
        draw_text(buf, cx, py + 9, &score.to_string(), WHITE);
        draw_text(buf, cx, py + 16, "BEST", BIRD_Y);
        draw_text(buf, cx, py + 22, &best.to_string(), BIRD_Y);

        let hints_y = py + ph + 3;
        draw_text(buf, cx, hints_y, "SPACE TO RESTART", WHITE);
        draw_text(buf, cx, hints_y + 7, "ESC TO EXIT", WHITE);
    }
}

fn draw_bird(buf: &mut PixelBuf, vp: &Viewport, snap: &Snapshot<'_>) {
    let b = snap.avatar;
    let x = vp.x(b.x);
    let y = vp.y(b.y);
    let w = vp.w(b.w).max(4);
    let h = vp.h(b.h).max(3);

    // Nose down by up to a body height while falling dead, else slightly by phase.
    let tilt: f64 = if snap.tilt != 0.0 {
        (-snap.tilt / 45.0).clamp(-1.0, 1.0) * (h / 2) as f64
    } else if snap.phase == Phase::Rising {
        -1.0
    } else {
        0.0
    };
    let tilt = tilt as i32;

    // Body
    buf.fill_rect(x, y, w, h, BIRD_Y);
    buf.fill_rect(x + 1, y, w - 2, 1, BIRD_HI);

    // Wing
    let wing_y = if snap.wing_up { y + h / 4 } else { y + h / 2 };
    buf.fill_rect(x + 1, wing_y, (w / 3).max(1), (h / 3).max(1), BIRD_WING);

    // Eye
    let ex = x + w - (w / 3).max(2);
    let ey = y + (h / 5).max(1);
    buf.fill_rect(ex, ey, (w / 6).max(1) + 1, (h / 5).max(1), BIRD_EYE);
    buf.set(ex + (w / 6).max(1), ey, BIRD_PUPIL);

    // Beak
    let beak_h = (h / 4).max(1);
    buf.fill_rect(x + w, y + h / 2 + tilt, (w / 4).max(2), beak_h, BIRD_BEAK);

    // Tail
    buf.fill_rect(x - (w / 6).max(1), y + h / 3 - tilt, (w / 6).max(1), 2, BIRD_WING);
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}
