/// Terminal wireframe viewer for tetrahedral meshes

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tetview_core::{Camera, DrawBuffers, RotationState, Transform};

pub mod config;
pub mod error;
pub mod renderer;

pub use config::{CameraConfig, FaceOrderSetting, ViewerConfig};
pub use error::ViewerError;
pub use renderer::WireframeRenderer;

/// Manual rotation step for the arrow keys, in radians
const NUDGE: f32 = 0.1;

/// Everything a frame needs: the uploaded buffers, camera, spin state and
/// the framebuffer they are drawn into.
pub struct RenderContext {
    buffers: DrawBuffers,
    camera: Camera,
    rotation: RotationState,
    degrees_per_second: f32,
    paused: bool,
    renderer: WireframeRenderer,
}

impl RenderContext {
    /// Takes ownership of the draw buffers for the lifetime of the context.
    pub fn new(
        buffers: DrawBuffers,
        camera: Camera,
        degrees_per_second: f32,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            buffers,
            camera,
            rotation: RotationState::zero(),
            degrees_per_second,
            paused: false,
            renderer: WireframeRenderer::new(width, height),
        }
    }

    pub fn buffers(&self) -> &DrawBuffers {
        &self.buffers
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn renderer(&self) -> &WireframeRenderer {
        &self.renderer
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_projection(&mut self) {
        self.camera.mode = self.camera.mode.toggled();
    }

    pub fn nudge(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.camera.set_viewport(width as u32, height as u32);
        self.renderer.resize(width, height);
    }

    /// Advance the spin by the time elapsed since the last update
    pub fn update(&mut self, seconds: f32) {
        if !self.paused {
            self.rotation.advance(seconds, self.degrees_per_second);
        }
    }

    /// Clear the framebuffer and draw the buffers; returns the segments drawn
    pub fn render(&mut self) -> usize {
        let model = Transform::rotation_matrix(&self.rotation);
        self.renderer.clear();
        self.renderer.render_lines(&self.buffers, &model, &self.camera)
    }
}

/// Interactive terminal application around a [`RenderContext`]
pub struct Viewer {
    context: RenderContext,
    title: String,
    running: bool,
    target_frame_time: Duration,
    last_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl Viewer {
    pub fn new(buffers: DrawBuffers, config: &ViewerConfig, title: impl Into<String>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let camera = config.camera.to_camera(width as u32, height as u32);

        Ok(Self {
            context: RenderContext::new(
                buffers,
                camera,
                config.degrees_per_second,
                width as usize,
                height as usize,
            ),
            title: title.into(),
            running: true,
            target_frame_time: Duration::from_secs(1) / config.target_fps.max(1),
            last_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Run until the user quits, restoring the terminal afterwards
    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut last_update = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.context.update((frame_start - last_update).as_secs_f32());
            last_update = frame_start;

            self.draw_frame()?;

            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            self.frame_count += 1;
            let now = Instant::now();
            if (now - self.last_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => self.context.resize(width as usize, height as usize),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char(' ') => self.context.toggle_pause(),
            KeyCode::Char('p') => self.context.toggle_projection(),
            KeyCode::Char('w') | KeyCode::Up => self.context.nudge(NUDGE, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.context.nudge(-NUDGE, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.context.nudge(0.0, -NUDGE, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.context.nudge(0.0, NUDGE, 0.0),
            _ => {}
        }
    }

    fn draw_frame(&mut self) -> io::Result<()> {
        self.context.render();

        let mut stdout = stdout();
        self.context.renderer().draw(&mut stdout)?;

        let status = if self.context.is_paused() { " [paused]" } else { "" };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | {} pts, {} idx | FPS: {:.1}{} | Arrows/WASD=Rotate Space=Pause P=Projection Q=Quit",
                self.title,
                self.context.buffers().num_points(),
                self.context.buffers().num_indices(),
                self.fps,
                status
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}
