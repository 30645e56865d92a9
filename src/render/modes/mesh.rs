//! Parametric wireframe/filled mesh over a (res+1)² vertex grid.

use crate::core::amplitude;
use crate::core::expr::EquationSet;
use crate::core::transform::{perspective_scale, Rotation3};
use crate::render::surface::DrawSurface;
use crate::render::{afterglow, RenderInput};

const PERSPECTIVE: f32 = 500.0;
const VIEW_RADIUS: f32 = 200.0;

struct MeshVertex {
    x: f32,
    y: f32,
    z: f32,
    amp: f32,
}

pub fn render(surface: &mut dyn DrawSurface, input: &RenderInput, eqs: &mut EquationSet) {
    let mcfg = &input.cfg.mesh;
    eqs.refresh(&mcfg.eq_x, &mcfg.eq_y, &mcfg.eq_z);

    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let res = mcfg.resolution;

    let amps = amplitude::measure(input.frame, mcfg.response);
    afterglow(surface, input.cfg.afterglow);

    let rot = Rotation3::from_axes(&mcfg.rotation, input.elapsed, 0.0);
    let verts_per_side = res + 1;
    let total = verts_per_side * verts_per_side;

    // Vertices are derived per frame, never persisted.
    let mut vertices: Vec<MeshVertex> = Vec::with_capacity(total);
    for i in 0..verts_per_side {
        for j in 0..verts_per_side {
            let u = i as f32 / res as f32;
            let v = j as f32 / res as f32;
            let amp = amps.bin_for(i * verts_per_side + j, total);

            let r = rot.apply(eqs.eval(u, v, input.elapsed, amps.average));
            let scale = perspective_scale(PERSPECTIVE, r.z * VIEW_RADIUS);
            vertices.push(MeshVertex {
                x: cx + r.x * VIEW_RADIUS * scale,
                y: cy + r.y * VIEW_RADIUS * scale,
                z: r.z,
                amp,
            });
        }
    }
    let at = |i: usize, j: usize| &vertices[i * verts_per_side + j];

    if mcfg.filled {
        for i in 0..res {
            for j in 0..res {
                let quad = [at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)];
                let avg_z = quad.iter().map(|v| v.z).sum::<f32>() / 4.0;
                if avg_z < -0.5 {
                    continue;
                }
                let avg_amp = quad.iter().map(|v| v.amp).sum::<f32>() / 4.0;
                let color = input
                    .theme
                    .glow
                    .scaled(0.3 + avg_amp * 0.7)
                    .with_alpha(0.7 + avg_amp * 0.3);
                let poly: Vec<[f32; 2]> = quad.iter().map(|v| [v.x, v.y]).collect();
                surface.fill_polygon(&poly, color);
            }
        }
    }

    if mcfg.wireframe {
        let mut line: Vec<[f32; 2]> = Vec::with_capacity(verts_per_side);
        for i in 0..verts_per_side {
            line.clear();
            for j in 0..verts_per_side {
                let v = at(i, j);
                line.push([v.x, v.y]);
            }
            surface.stroke_polyline(&line, input.cfg.line_width, input.theme.glow);
        }
        for j in 0..verts_per_side {
            line.clear();
            for i in 0..verts_per_side {
                let v = at(i, j);
                line.push([v.x, v.y]);
            }
            surface.stroke_polyline(&line, input.cfg.line_width, input.theme.glow);
        }
    }
}
