//! Cellular automaton mode: the grid lives across ticks and resizes (with a
//! reseed) whenever the cell size or surface size changes.

use crate::core::amplitude::{self, ResponseMode};
use crate::life::automaton::{AutomatonParams, CellGrid};
use crate::render::surface::DrawSurface;
use crate::render::{afterglow, RenderInput};

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput, grid: &mut Option<CellGrid>) {
    let lcfg = &input.cfg.life;
    let cell = lcfg.cell_size.max(1);
    let rows = surface.height() / cell;
    let cols = surface.width() / cell;
    if rows == 0 || cols == 0 {
        return;
    }

    let grid = grid.get_or_insert_with(|| CellGrid::seeded(rows, cols, 0x6C69_6665));
    grid.ensure_size(rows, cols);

    let avg = amplitude::measure(input.frame, ResponseMode::Signal).average;
    grid.step(
        avg,
        &AutomatonParams {
            reseed_base: lcfg.reseed,
            birth_boost: lcfg.birth_boost,
            survival_boost: lcfg.survival_boost,
        },
    );

    afterglow(surface, input.cfg.afterglow);
    let px = (cell as i32 - 1).max(1);
    for r in 0..rows {
        for c in 0..cols {
            if grid.alive(r, c) {
                surface.fill_rect(
                    (c * cell) as i32,
                    (r * cell) as i32,
                    px,
                    px,
                    input.theme.glow,
                );
            }
        }
    }
}
