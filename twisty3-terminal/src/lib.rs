/// Terminal front end for the twisty3 cube: input, frame loop and rendering
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use std::collections::VecDeque;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use twisty3_core::{Color, Cube, CubeResult, Direction, RotationEngine, TurnCommand};

pub mod camera;
pub mod input;
pub mod mesh;
pub mod renderer;

pub use camera::{Camera, Orbit};
pub use input::{action_for_key, Action};
pub use mesh::Mesh;
pub use renderer::AsciiRenderer;

/// Edge length of a drawn cubelet; the gap shows the layers.
const CUBELET_SIZE: f32 = 0.9;

/// Turn bookkeeping shared by the interactive and headless front ends.
///
/// Queued commands are issued one at a time, each only once the engine is
/// ready again.
pub struct Session {
    pub cube: Cube,
    pub engine: RotationEngine,
    pending: VecDeque<TurnCommand>,
    history: Vec<TurnCommand>,
}

impl Session {
    pub fn new(cube: Cube, engine: RotationEngine) -> Self {
        Self {
            cube,
            engine,
            pending: VecDeque::new(),
            history: Vec::new(),
        }
    }

    pub fn queue(&mut self, commands: impl IntoIterator<Item = TurnCommand>) {
        self.pending.extend(commands);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn history(&self) -> &[TurnCommand] {
        &self.history
    }

    /// Start `command` now if the engine is free.
    pub fn try_turn(&mut self, command: TurnCommand) -> CubeResult<()> {
        self.engine.begin(&self.cube, command)?;
        self.history.push(command);
        Ok(())
    }

    /// Start the inverse of the most recent turn, dropping it from history.
    pub fn undo(&mut self) -> CubeResult<Option<TurnCommand>> {
        let Some(&last) = self.history.last() else {
            return Ok(None);
        };
        self.engine.begin(&self.cube, last.inverse())?;
        self.history.pop();
        Ok(Some(last.inverse()))
    }

    /// One frame: issue the next queued command if possible, then tick.
    pub fn step(&mut self) -> CubeResult<()> {
        if self.engine.is_ready() {
            if let Some(&command) = self.pending.front() {
                // A rejected command stays queued.
                self.try_turn(command)?;
                self.pending.pop_front();
            }
        }
        self.engine.tick(&mut self.cube);
        Ok(())
    }

    /// Step until the queue is drained and the last turn has finished.
    /// Returns the number of frames taken.
    pub fn run_to_end(&mut self) -> CubeResult<u32> {
        let mut frames = 0;
        while !self.pending.is_empty() || !self.engine.is_ready() {
            self.step()?;
            frames += 1;
        }
        Ok(frames)
    }
}

/// Letter used for a sticker in text output.
pub fn color_letter(color: Color) -> char {
    match color {
        Color::White => 'W',
        Color::Red => 'R',
        Color::Yellow => 'Y',
        Color::Orange => 'O',
        Color::Green => 'G',
        Color::Blue => 'B',
        Color::None => '.',
    }
}

/// The six faces as text, one line per face: `PosZ: WWW/WWW/WWW`.
pub fn format_faces(cube: &Cube) -> String {
    let mut out = String::new();
    for face in Direction::ALL {
        let rows: Vec<String> = cube
            .face_colors(face)
            .iter()
            .map(|row| row.iter().copied().map(color_letter).collect())
            .collect();
        out.push_str(&format!("{face}: {}\n", rows.join("/")));
    }
    out
}

/// Main application struct for the interactive terminal puzzle
pub struct TerminalApp {
    session: Session,
    mesh: Mesh,
    orbit: Orbit,
    camera: Camera,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    status: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(session: Session, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // Bottom row is the status line.
        let height = height.saturating_sub(1).max(1);

        Ok(Self {
            session,
            mesh: Mesh::cubelet(CUBELET_SIZE),
            orbit: Orbit::default(),
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_millis(1000 / u64::from(target_fps.max(1))),
            running: true,
            status: String::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if let Err(e) = self.session.step() {
                self.report(&e.to_string());
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("leaving after {} turns", self.session.history().len());
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                if let Some(action) = action_for_key(&key) {
                    self.apply(action);
                }
            }
            Event::Resize(width, height) => {
                let height = height.saturating_sub(1).max(1);
                self.camera = Camera::new(width as u32, height as u32);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Turn(command) => {
                // Turns requested mid-animation are dropped, not queued.
                if !self.session.engine.is_ready() {
                    debug!("busy, dropping {command}");
                    return;
                }
                match self.session.try_turn(command) {
                    Ok(()) => self.status = format!("turning {command}"),
                    Err(e) => self.report(&e.to_string()),
                }
            }
            Action::Undo => {
                if !self.session.engine.is_ready() {
                    return;
                }
                match self.session.undo() {
                    Ok(Some(command)) => self.status = format!("undo with {command}"),
                    Ok(None) => self.status = "nothing to undo".to_string(),
                    Err(e) => self.report(&e.to_string()),
                }
            }
            Action::Highlight(color) => match self.session.cube.set_highlighted_face(color) {
                Ok(()) => self.status = format!("highlighting {color}"),
                Err(e) => self.report(&e.to_string()),
            },
            Action::Orbit { d_pitch, d_yaw } => self.orbit.rotate(d_pitch, d_yaw),
        }
    }

    fn report(&mut self, message: &str) {
        log::warn!("{message}");
        self.status = message.to_string();
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_cube(
            &self.session.cube,
            &self.mesh,
            &self.orbit.matrix(),
            &self.camera,
        );

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Status line
        let state = match self.session.engine.current_turn() {
            Some(turn) => format!("{turn} {:>4.0}°", self.session.engine.remaining_angle()),
            None => "ready".to_string(),
        };
        let (_, height) = terminal::size()?;
        queue!(
            stdout,
            cursor::MoveTo(0, height.saturating_sub(1)),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "twisty3 | FPS: {:.1} | {state} | {} | f/r/u=Turn (shift reverses) 1-6=Highlight WASD=Orbit Bksp=Undo Q=Quit",
                self.fps, self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
