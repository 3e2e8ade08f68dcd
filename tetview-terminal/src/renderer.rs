/// Wireframe rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use tetview_core::{Camera, DrawBuffers};

/// Line glyphs from nearest to farthest
const DEPTH_RAMP: &[char] = &['@', '%', '#', '*', '+', '=', '-', ':', '.'];

/// Screen-space position and normalized depth of a projected point
type Projected = (f32, f32, f32);

/// Character framebuffer that draws index buffers as line lists
pub struct WireframeRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    projected: Vec<Option<Projected>>,
}

impl WireframeRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            projected: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            projected: std::mem::take(&mut self.projected),
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at column `x`, row `y`
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Number of cells covered by a line
    pub fn lit_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    /// Draw every index pair of `buffers` as a depth-tested line.
    /// Returns the number of segments that were drawn.
    pub fn render_lines(
        &mut self,
        buffers: &DrawBuffers,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) -> usize {
        let (width, height) = (self.width as u32, self.height as u32);
        self.projected.clear();
        self.projected.extend(buffers.positions.chunks_exact(3).map(|xyz| {
            let point = Point3::new(xyz[0] as f32, xyz[1] as f32, xyz[2] as f32);
            camera.project_to_screen(&point, model_matrix, width, height)
        }));

        let (near, far) = self
            .projected
            .iter()
            .flatten()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(near, far), p| {
                (near.min(p.2), far.max(p.2))
            });

        let mut drawn = 0;
        for (a, b) in buffers.line_segments() {
            let endpoints = (
                self.projected.get(a as usize).copied().flatten(),
                self.projected.get(b as usize).copied().flatten(),
            );
            if let (Some(start), Some(end)) = endpoints {
                if self.draw_line(start, end, (near, far)) {
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn draw_line(&mut self, start: Projected, end: Projected, depth_range: (f32, f32)) -> bool {
        let Some((start, end)) = clip_segment(start, end, self.width as f32, self.height as f32)
        else {
            return false;
        };

        let (dx, dy, dz) = (end.0 - start.0, end.1 - start.1, end.2 - start.2);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let depth = start.2 + t * dz;
            self.plot(start.0 + t * dx, start.1 + t * dy, depth, depth_range);
        }
        true
    }

    fn plot(&mut self, x: f32, y: f32, depth: f32, (near, far): (f32, f32)) {
        let (x, y) = (x.floor(), y.floor());
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth >= self.depth_buffer[idx] {
            return;
        }

        let span = far - near;
        let shade = if span > f32::EPSILON {
            ((depth - near) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let ramp_index = (shade * (DEPTH_RAMP.len() - 1) as f32).round() as usize;

        self.depth_buffer[idx] = depth;
        self.char_buffer[idx] = DEPTH_RAMP[ramp_index.min(DEPTH_RAMP.len() - 1)];
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on depth glyph
                let color = match c {
                    '@' | '%' | '#' => Color::Cyan,
                    '*' | '+' => Color::White,
                    '=' | '-' => Color::Grey,
                    _ => Color::DarkGrey,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Liang-Barsky clip of a screen-space segment against `[0, width) x [0, height)`
fn clip_segment(
    start: Projected,
    end: Projected,
    width: f32,
    height: f32,
) -> Option<(Projected, Projected)> {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, start.0),
        (dx, width - start.0),
        (-dy, start.1),
        (dy, height - start.1),
    ] {
        if p.abs() < f32::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let lerp = |t: f32| {
        (
            start.0 + t * dx,
            start.1 + t * dy,
            start.2 + t * (end.2 - start.2),
        )
    };
    Some((lerp(t0), lerp(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use tetview_core::{FaceOrder, TetMesh};

    #[test]
    fn test_cube_draws_lines() {
        let buffers = TetMesh::cube(4.0, Vector3::zeros()).draw_buffers(FaceOrder::Legacy);
        let camera = Camera::new(80, 40);
        let mut renderer = WireframeRenderer::new(80, 40);

        let drawn = renderer.render_lines(&buffers, &Matrix4::identity(), &camera);
        assert_eq!(drawn, 30);
        assert!(renderer.lit_cells() > 0);
        // The nearest corner gets the brightest glyph.
        assert!(renderer.char_buffer.contains(&DEPTH_RAMP[0]));

        renderer.clear();
        assert_eq!(renderer.lit_cells(), 0);
    }

    #[test]
    fn test_empty_buffers_draw_nothing() {
        let mut renderer = WireframeRenderer::new(20, 10);
        let drawn =
            renderer.render_lines(&DrawBuffers::default(), &Matrix4::identity(), &Camera::default());
        assert_eq!(drawn, 0);
        assert_eq!(renderer.lit_cells(), 0);
    }

    #[test]
    fn test_clip_segment() {
        let clipped = clip_segment((-10.0, 5.0, 0.0), (30.0, 5.0, 1.0), 20.0, 10.0).unwrap();
        assert!((clipped.0 .0 - 0.0).abs() < 1e-5);
        assert!((clipped.1 .0 - 20.0).abs() < 1e-5);
        assert!((clipped.0 .2 - 0.25).abs() < 1e-5);

        assert!(clip_segment((-5.0, -5.0, 0.0), (-1.0, 20.0, 0.0), 20.0, 10.0).is_none());
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let mut renderer = WireframeRenderer::new(4, 2);
        renderer.plot(1.5, 0.5, 0.0, (0.0, 1.0));
        assert_eq!(renderer.cell(1, 0), Some('@'));
        assert_eq!(renderer.cell(4, 0), None);

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('@'));
    }

    #[test]
    fn test_resize_resets_buffers() {
        let mut renderer = WireframeRenderer::new(4, 2);
        renderer.plot(0.0, 0.0, 0.0, (0.0, 1.0));
        renderer.resize(8, 3);
        assert_eq!((renderer.width(), renderer.height()), (8, 3));
        assert_eq!(renderer.lit_cells(), 0);
    }
}
