/// twisty3 Terminal - interactive 3×3×3 cube
///
/// Controls:
///   - f/r/u: Turn the front, right or up layer (shift turns backward)
///   - 1-6: Highlight a face by its center color
///   - WASD / Arrow Keys: Orbit the view
///   - Backspace: Undo the last turn
///   - Q/ESC: Quit
use clap::Parser;
use log::info;
use std::io;
use twisty3_core::{parse_script, Cube, CubeError, EngineConfig, RotationEngine};
use twisty3_terminal::{format_faces, Session, TerminalApp};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Degrees turned per frame; must divide 90
    #[arg(long, default_value_t = 5.0)]
    step_degrees: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Turns to play on start, e.g. "F R' U2"
    #[arg(long)]
    script: Option<String>,

    /// Apply the script without a terminal UI and print the faces
    #[arg(long)]
    headless: bool,
}

fn invalid_input(error: CubeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = EngineConfig {
        step_degrees: args.step_degrees,
        ..EngineConfig::default()
    };
    let engine = RotationEngine::new(config).map_err(invalid_input)?;
    let mut session = Session::new(Cube::solved(), engine);

    if let Some(script) = &args.script {
        let commands = parse_script(script).map_err(invalid_input)?;
        info!("queued {} turns", commands.len());
        session.queue(commands);
    }

    if args.headless {
        let frames = session.run_to_end().map_err(invalid_input)?;
        info!("script finished after {frames} frames");
        print!("{}", format_faces(&session.cube));
        println!("solved: {}", session.cube.is_solved());
        return Ok(());
    }

    let mut app = TerminalApp::new(session, args.fps)?;
    app.run()?;

    println!("{} turns played", app.session().history().len());
    Ok(())
}
