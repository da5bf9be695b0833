//! Browser implementations: LocalStorage high scores and a Canvas 2D renderer

use web_sys::{CanvasRenderingContext2d, Storage};

use super::{Renderer, ScoreStore, now_ms};
use crate::error::{Error, Result};
use crate::highscores::HighScores;
use crate::sim::{RenderSnapshot, WordView};

const GREEN: &str = "#33ff33";
const WHITE: &str = "#ffffff";
const YELLOW: &str = "#ffff00";
const AMBER: &str = "#ffcc00";

/// Pixel jitter for the shaking character
const SHAKE_INTENSITY: f64 = 5.0;

fn local_storage() -> Result<Storage> {
    web_sys::window()
        .ok_or_else(|| Error::StorageUnavailable("no window".into()))?
        .local_storage()
        .map_err(|_| Error::StorageUnavailable("access denied".into()))?
        .ok_or_else(|| Error::StorageUnavailable("no localStorage".into()))
}

/// High scores persisted in LocalStorage
pub struct LocalStorageScores {
    cache: HighScores,
}

impl LocalStorageScores {
    const STORAGE_KEY: &'static str = "combo_typer_highscores";

    pub fn load() -> Self {
        let cache = match Self::read() {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::info!("No high scores found, starting fresh ({})", e);
                HighScores::new()
            }
        };
        Self { cache }
    }

    fn read() -> Result<HighScores> {
        let json = local_storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| Error::StorageUnavailable("read failed".into()))?
            .ok_or_else(|| Error::StorageUnavailable("nothing stored".into()))?;
        HighScores::from_json(&json)
    }

    fn write(&self) -> Result<()> {
        let json = self.cache.to_json()?;
        local_storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| Error::StorageUnavailable("write failed".into()))?;
        log::info!("High scores saved ({} entries)", self.cache.entries.len());
        Ok(())
    }
}

impl ScoreStore for LocalStorageScores {
    fn best(&self) -> Result<u64> {
        Ok(self.cache.top_score().unwrap_or(0))
    }

    fn submit(&mut self, score: u64, words_typed: u32) -> Result<bool> {
        let record = self.cache.submit(score, words_typed, now_ms());
        self.write()?;
        Ok(record)
    }
}

/// Draws snapshots onto a 2D canvas context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn draw_hud(&self, snap: &RenderSnapshot) {
        let ctx = &self.ctx;
        ctx.set_font("20px Courier New");
        ctx.set_fill_style_str(GREEN);
        ctx.set_text_align("left");
        let _ = ctx.fill_text(&snap.score_label(), 20.0, 30.0);

        ctx.set_fill_style_str(AMBER);
        ctx.set_text_align("right");
        let _ = ctx.fill_text(&snap.high_score_label(), snap.width as f64 - 20.0, 30.0);

        let banner = match snap.target_label() {
            Some(label) => Some(label),
            None if !snap.typed.is_empty() => Some(format!("> {}", snap.typed.to_uppercase())),
            None => None,
        };
        if let Some(banner) = banner {
            ctx.set_fill_style_str(WHITE);
            ctx.set_text_align("center");
            let _ = ctx.fill_text(&banner, snap.width as f64 / 2.0, snap.height as f64 - 30.0);
        }
        ctx.set_text_align("left");
    }

    fn draw_word(&self, word: &WordView) {
        let ctx = &self.ctx;
        ctx.set_font("bold 24px Courier New");
        let mut x = word.x as f64;
        let y = word.y as f64;

        for (i, c) in word.text.chars().enumerate() {
            let (dx, dy) = if word.shaking_char == Some(i) {
                (
                    (js_sys::Math::random() - 0.5) * SHAKE_INTENSITY,
                    (js_sys::Math::random() - 0.5) * SHAKE_INTENSITY,
                )
            } else {
                (0.0, 0.0)
            };

            let typed = word.is_dead || i < word.highlight_up_to;
            ctx.set_fill_style_str(if typed { GREEN } else { WHITE });

            let glyph = c.to_string();
            let _ = ctx.fill_text(&glyph, x + dx, y + dy);
            x += ctx.measure_text(&glyph).map(|m| m.width()).unwrap_or(14.0);
        }

        if word.is_part_of_combo {
            ctx.set_fill_style_str(YELLOW);
            let _ = ctx.fill_text("<<", x + 5.0, y);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self.ctx
            .clear_rect(0.0, 0.0, snapshot.width as f64, snapshot.height as f64);
        self.draw_hud(snapshot);
        for word in snapshot.words.iter().rev() {
            self.draw_word(word);
        }
    }
}
