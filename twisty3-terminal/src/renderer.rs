/// ASCII rasterizer drawing cubelets with their sticker colors
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use twisty3_core::{Color, Cube};

use crate::camera::Camera;
use crate::mesh::{Mesh, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%'];

/// Stickers of the highlighted center are drawn with this instead of the ramp.
const HIGHLIGHT_CHAR: char = '@';

/// Lowest ramp entry used for lit faces, so dim faces stay visible.
const MIN_RAMP_INDEX: usize = 3;

/// Terminal color for a sticker. Empty slots and plastic are grey.
pub fn sticker_color(color: Color) -> TermColor {
    match color {
        Color::White => TermColor::White,
        Color::Red => TermColor::Red,
        Color::Yellow => TermColor::Yellow,
        Color::Orange => TermColor::Rgb {
            r: 255,
            g: 140,
            b: 0,
        },
        Color::Green => TermColor::Green,
        Color::Blue => TermColor::Blue,
        Color::None => TermColor::DarkGrey,
    }
}

/// One rasterized fragment source: a shade character and its color.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fill {
    character: char,
    color: TermColor,
}

/// Renders the cube into a character grid with a depth buffer.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<TermColor>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![TermColor::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(TermColor::Reset);
    }

    /// Draw every cubelet of `cube` with the shared `mesh`, after applying
    /// the `orbit` matrix to the whole puzzle.
    pub fn render_cube(&mut self, cube: &Cube, mesh: &Mesh, orbit: &Matrix4<f32>, camera: &Camera) {
        let view_projection = camera.view_projection();
        for cubelet in cube {
            let model = orbit * cubelet.model_matrix();
            let highlighted = cube.is_on_highlighted_face(cubelet);
            for triangle in &mesh.triangles {
                let sticker = triangle.slot().map_or(Color::None, |s| cubelet.sticker(s));
                self.render_triangle(triangle, &model, &view_projection, sticker, highlighted);
            }
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        sticker: Color,
        highlighted: bool,
    ) {
        // Faces turned away from the camera are hidden by the rest of the cube.
        let normal = model.transform_vector(&triangle.normal());
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let brightness = normal.dot(&light_dir);
        if brightness <= 0.0 {
            return;
        }

        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match Camera::project_to_screen(
                view_projection,
                vertex,
                model,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        let character = if highlighted && sticker.is_face() {
            HIGHLIGHT_CHAR
        } else {
            let top = LUMINOSITY_RAMP.len() - 1;
            let index = (brightness * top as f32) as usize;
            LUMINOSITY_RAMP[index.clamp(MIN_RAMP_INDEX, top)]
        };
        let fill = Fill {
            character,
            color: sticker_color(sticker),
        };
        self.rasterize_triangle(&screen_coords, fill);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], fill: Fill) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = fill.character;
                    self.color_buffer[idx] = fill.color;
                }
            }
        }
    }

    /// Character and color at a cell, for inspection.
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, TermColor)> {
        let idx = y * self.width + x;
        (x < self.width && y < self.height).then(|| (self.char_buffer[idx], self.color_buffer[idx]))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
