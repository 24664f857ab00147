/// Tick-driven animation of quarter turns
use std::fmt;

use log::{debug, trace, warn};
use nalgebra::Isometry3;
use strum::{Display, EnumIter};

use crate::cube::Cube;
use crate::error::{CubeError, CubeResult};
use crate::lattice::Axis;

/// Cubelets in one face layer: 1 center, 4 edges, 4 corners.
pub const LAYER_SIZE: usize = 9;

/// Angle of one turn.
pub const QUARTER_TURN_DEGREES: f32 = 90.0;

/// Allowed gap between `steps * step_degrees` and a quarter turn.
const STEP_TOLERANCE: f32 = QUARTER_TURN_DEGREES * 4.0 * f32::EPSILON;

/// A face turn the engine knows how to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Motion {
    Front,
    Right,
    Up,
}

/// Rotation axis and turned layer coordinate, indexed by `Motion as usize`.
///
/// Every motion turns the layer at +1 on its axis. The opposite layers have no
/// motion of their own.
const MOTION_TABLE: [(Axis, f32); 3] = [(Axis::Z, 1.0), (Axis::X, 1.0), (Axis::Y, 1.0)];

impl Motion {
    pub fn axis(self) -> Axis {
        MOTION_TABLE[self as usize].0
    }

    /// Coordinate along [`Motion::axis`] of the layer this motion turns.
    pub fn layer(self) -> f32 {
        MOTION_TABLE[self as usize].1
    }

    /// Single-letter notation.
    pub fn letter(self) -> char {
        match self {
            Motion::Front => 'F',
            Motion::Right => 'R',
            Motion::Up => 'U',
        }
    }
}

/// A motion plus its direction. `forward` is a positive (right-hand rule)
/// rotation about the motion's axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnCommand {
    pub motion: Motion,
    pub forward: bool,
}

impl TurnCommand {
    pub fn new(motion: Motion, forward: bool) -> Self {
        Self { motion, forward }
    }

    pub fn inverse(self) -> Self {
        Self {
            forward: !self.forward,
            ..self
        }
    }
}

impl fmt::Display for TurnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.motion.letter())?;
        if !self.forward {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Angle applied per tick. Must divide 90 into whole steps.
    pub step_degrees: f32,
    /// Tolerance for layer membership and lattice checks.
    pub tolerance: f32,
    /// Round turned cubelets back onto the lattice when a turn completes.
    pub snap_on_completion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_degrees: 5.0,
            tolerance: 1e-3,
            snap_on_completion: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> CubeResult<()> {
        // n * step lands near 90 for any exact divisor, so the rounding error
        // is bounded relative to 90 regardless of n.
        let steps = (QUARTER_TURN_DEGREES / self.step_degrees).round();
        let divides = steps.is_finite()
            && steps >= 1.0
            && steps <= u32::MAX as f32
            && (steps * self.step_degrees - QUARTER_TURN_DEGREES).abs() <= STEP_TOLERANCE;
        if !divides {
            return Err(CubeError::InvalidStepAngle(self.step_degrees));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 0.5) {
            return Err(CubeError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    /// Ticks needed for one quarter turn.
    pub fn steps_per_turn(&self) -> u32 {
        (QUARTER_TURN_DEGREES / self.step_degrees).round() as u32
    }
}

/// The turn currently animating.
#[derive(Debug, Clone, PartialEq)]
struct Turn {
    command: TurnCommand,
    affected: [usize; LAYER_SIZE],
    remaining_steps: u32,
    step: Isometry3<f32>,
}

/// Animates one layer turn at a time, one fixed step per [`RotationEngine::tick`].
///
/// The engine does not own the cube: callers pass it in for every operation.
#[derive(Debug, Clone)]
pub struct RotationEngine {
    config: EngineConfig,
    turn: Option<Turn>,
}

impl Default for RotationEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            turn: None,
        }
    }
}

impl RotationEngine {
    pub fn new(config: EngineConfig) -> CubeResult<Self> {
        config.validate()?;
        Ok(Self { config, turn: None })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True when no turn is animating and a new one may start.
    pub fn is_ready(&self) -> bool {
        self.turn.is_none()
    }

    pub fn current_turn(&self) -> Option<TurnCommand> {
        self.turn.as_ref().map(|t| t.command)
    }

    /// Indices of the cubelets being turned.
    pub fn affected_indices(&self) -> Option<&[usize]> {
        self.turn.as_ref().map(|t| &t.affected[..])
    }

    /// Degrees left in the current turn, zero when idle.
    pub fn remaining_angle(&self) -> f32 {
        self.turn
            .as_ref()
            .map_or(0.0, |t| t.remaining_steps as f32 * self.config.step_degrees)
    }

    /// Rotation applied to each affected cubelet per tick.
    pub fn step_transform(&self) -> Option<&Isometry3<f32>> {
        self.turn.as_ref().map(|t| &t.step)
    }

    /// Start a turn.
    ///
    /// The layer is chosen from the cubelets' current positions and stays fixed
    /// until the turn completes. Fails without changing any state if a turn is
    /// already running or if the layer does not hold exactly nine cubelets.
    pub fn begin_turn(&mut self, cube: &Cube, motion: Motion, forward: bool) -> CubeResult<()> {
        if let Some(active) = self.current_turn() {
            warn!("ignoring {motion} turn, {} is still running", active);
            return Err(CubeError::TurnInProgress {
                active: active.motion,
            });
        }

        let axis = motion.axis();
        let layer = motion.layer();
        let radians = self.config.step_degrees.to_radians();
        let step = Isometry3::rotation(axis.unit() * if forward { radians } else { -radians });

        let selected: Vec<usize> = cube
            .iter()
            .enumerate()
            .filter(|(_, c)| (axis.component(&c.position()) - layer).abs() < self.config.tolerance)
            .map(|(i, _)| i)
            .collect();
        let affected: [usize; LAYER_SIZE] =
            selected
                .try_into()
                .map_err(|selected: Vec<usize>| CubeError::LayerSelection {
                    motion,
                    expected: LAYER_SIZE,
                    found: selected.len(),
                })?;

        let command = TurnCommand::new(motion, forward);
        debug!("starting {command} on cubelets {affected:?}");
        self.turn = Some(Turn {
            command,
            affected,
            remaining_steps: self.config.steps_per_turn(),
            step,
        });
        Ok(())
    }

    pub fn begin(&mut self, cube: &Cube, command: TurnCommand) -> CubeResult<()> {
        self.begin_turn(cube, command.motion, command.forward)
    }

    /// Advance the running turn by one step. Does nothing when idle.
    pub fn tick(&mut self, cube: &mut Cube) {
        let Some(turn) = self.turn.as_mut() else {
            return;
        };

        for &index in &turn.affected {
            cube.cubelet_mut(index).apply(&turn.step);
        }
        turn.remaining_steps = turn.remaining_steps.saturating_sub(1);
        trace!("{} step, {} left", turn.command, turn.remaining_steps);

        if turn.remaining_steps == 0 {
            if let Some(turn) = self.turn.take() {
                self.complete(cube, &turn);
            }
        }
    }

    fn complete(&self, cube: &mut Cube, turn: &Turn) {
        if self.config.snap_on_completion {
            for &index in &turn.affected {
                let cubelet = cube.cubelet_mut(index);
                let drift = cubelet.lattice_drift();
                if drift > self.config.tolerance {
                    warn!("cubelet {index} drifted {drift} off the lattice");
                }
                if !cubelet.snap_to_lattice() {
                    warn!("cubelet {index} is not near a lattice pose, left unsnapped");
                }
            }
        }
        debug!("finished {}", turn.command);
    }

    /// Tick until the running turn completes. Returns the number of ticks.
    pub fn finish(&mut self, cube: &mut Cube) -> u32 {
        let mut ticks = 0;
        while !self.is_ready() {
            self.tick(cube);
            ticks += 1;
        }
        ticks
    }

    /// Run a whole turn at once.
    pub fn perform(&mut self, cube: &mut Cube, command: TurnCommand) -> CubeResult<u32> {
        self.begin(cube, command)?;
        Ok(self.finish(cube))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::lattice::Direction;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    fn assert_poses_close(a: &Cube, b: &Cube) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x.model_matrix(), y.model_matrix(), epsilon = 1e-3);
        }
    }

    fn index_of(cube: &Cube, cell: [i8; 3]) -> usize {
        cube.iter().position(|c| c.cell() == cell).unwrap()
    }

    #[test]
    fn test_motion_table() {
        assert_eq!(Motion::Front.axis(), Axis::Z);
        assert_eq!(Motion::Right.axis(), Axis::X);
        assert_eq!(Motion::Up.axis(), Axis::Y);
        for motion in Motion::iter() {
            assert_eq!(motion.layer(), 1.0);
        }
        assert_eq!(TurnCommand::new(Motion::Right, false).to_string(), "R'");
        assert_eq!(TurnCommand::new(Motion::Up, true).inverse().to_string(), "U'");
    }

    #[test]
    fn test_begin_turn_selects_nine() {
        let cube = Cube::solved();
        for motion in Motion::iter() {
            let mut engine = RotationEngine::default();
            engine.begin_turn(&cube, motion, true).unwrap();

            let affected = engine.affected_indices().unwrap();
            assert_eq!(affected.len(), LAYER_SIZE);
            for &i in affected {
                let position = cube.get(i).unwrap().position();
                assert!((motion.axis().component(&position) - 1.0).abs() < 1e-3);
            }
            let centers = affected.iter().filter(|&&i| cube.get(i).unwrap().is_center()).count();
            assert_eq!(centers, 1);
            assert!(!engine.is_ready());
            assert_eq!(engine.remaining_angle(), 90.0);
        }
    }

    #[test]
    fn test_turn_takes_exact_tick_count() {
        let mut cube = Cube::solved();
        let mut engine = RotationEngine::default();
        engine.begin_turn(&cube, Motion::Front, true).unwrap();

        for _ in 0..17 {
            engine.tick(&mut cube);
            assert!(!engine.is_ready());
        }
        assert_eq!(engine.remaining_angle(), 5.0);
        engine.tick(&mut cube);
        assert!(engine.is_ready());
        assert_eq!(engine.remaining_angle(), 0.0);
        assert!(engine.affected_indices().is_none());

        let config = EngineConfig {
            step_degrees: 10.0,
            ..EngineConfig::default()
        };
        let mut engine = RotationEngine::new(config).unwrap();
        let ticks = engine.perform(&mut cube, TurnCommand::new(Motion::Up, false)).unwrap();
        assert_eq!(ticks, 9);
    }

    #[test]
    fn test_tick_when_idle_is_noop() {
        let mut cube = Cube::solved();
        let mut engine = RotationEngine::default();
        engine.tick(&mut cube);
        assert!(engine.is_ready());
        assert_eq!(cube, Cube::solved());
    }

    #[test]
    fn test_four_turns_are_identity() {
        for motion in Motion::iter() {
            for forward in [true, false] {
                let mut cube = Cube::solved();
                let mut engine = RotationEngine::default();
                for _ in 0..4 {
                    engine.perform(&mut cube, TurnCommand::new(motion, forward)).unwrap();
                }
                assert_poses_close(&cube, &Cube::solved());
            }
        }
    }

    #[test]
    fn test_turn_then_inverse_is_identity() {
        for motion in Motion::iter() {
            let mut cube = Cube::solved();
            let mut engine = RotationEngine::default();
            let command = TurnCommand::new(motion, true);
            engine.perform(&mut cube, command).unwrap();
            assert!(!cube.is_solved());
            engine.perform(&mut cube, command.inverse()).unwrap();
            assert_poses_close(&cube, &Cube::solved());
            assert!(cube.is_solved());
        }
    }

    #[test]
    fn test_begin_turn_is_exclusive() {
        let mut cube = Cube::solved();
        let mut engine = RotationEngine::default();
        engine.begin_turn(&cube, Motion::Front, true).unwrap();
        for _ in 0..3 {
            engine.tick(&mut cube);
        }

        let affected = engine.affected_indices().unwrap().to_vec();
        let remaining = engine.remaining_angle();
        let step = *engine.step_transform().unwrap();

        assert_eq!(
            engine.begin_turn(&cube, Motion::Right, false),
            Err(CubeError::TurnInProgress {
                active: Motion::Front
            })
        );
        assert!(!engine.is_ready());
        assert_eq!(engine.affected_indices().unwrap(), &affected[..]);
        assert_eq!(engine.remaining_angle(), remaining);
        assert_eq!(engine.step_transform(), Some(&step));
        assert_eq!(engine.current_turn(), Some(TurnCommand::new(Motion::Front, true)));
    }

    #[test]
    fn test_front_turn_moves_right_stickers_up() {
        let before = Cube::solved();
        let mut cube = before.clone();
        let mut engine = RotationEngine::default();
        engine.begin_turn(&cube, Motion::Front, true).unwrap();
        for _ in 0..18 {
            engine.tick(&mut cube);
        }
        assert!(engine.is_ready());

        let quarter = Isometry3::rotation(Vector3::z() * 90f32.to_radians());
        for (old, new) in before.iter().zip(cube.iter()) {
            if old.home_cell()[2] == 1 {
                assert_eq!(new.color_facing(Direction::PosY), old.color_facing(Direction::PosX));
                assert_eq!(new.color_facing(Direction::PosZ), old.color_facing(Direction::PosZ));
                assert_abs_diff_eq!(new.position(), quarter * old.position(), epsilon = 1e-3);
            } else {
                assert_eq!(new, old);
            }
        }

        let front = cube.face_colors(Direction::PosZ);
        assert_eq!(front, [[Color::White; 3]; 3]);
        assert_eq!(cube.face_colors(Direction::PosY)[2], [Color::Blue; 3]);
        assert_eq!(cube.face_colors(Direction::NegX)[0][2], Color::Orange);
    }

    #[test]
    fn test_forward_direction_is_right_handed() {
        let mut engine = RotationEngine::default();

        let mut cube = Cube::solved();
        let edge = index_of(&cube, [1, 1, 0]);
        engine.perform(&mut cube, TurnCommand::new(Motion::Right, true)).unwrap();
        assert_eq!(cube.get(edge).unwrap().cell(), [1, 0, 1]);

        let mut cube = Cube::solved();
        let edge = index_of(&cube, [0, 1, 1]);
        engine.perform(&mut cube, TurnCommand::new(Motion::Up, true)).unwrap();
        assert_eq!(cube.get(edge).unwrap().cell(), [1, 1, 0]);

        let mut cube = Cube::solved();
        let edge = index_of(&cube, [1, 0, 1]);
        engine.perform(&mut cube, TurnCommand::new(Motion::Front, false)).unwrap();
        assert_eq!(cube.get(edge).unwrap().cell(), [0, -1, 1]);
    }

    #[test]
    fn test_broken_layer_is_reported() {
        let mut cube = Cube::solved();
        cube.cubelet_mut(0).apply(&Isometry3::translation(0.0, 0.0, 0.01));

        let mut engine = RotationEngine::default();
        assert_eq!(
            engine.begin_turn(&cube, Motion::Front, true),
            Err(CubeError::LayerSelection {
                motion: Motion::Front,
                expected: LAYER_SIZE,
                found: 8
            })
        );
        assert!(engine.is_ready());
        engine.begin_turn(&cube, Motion::Up, true).unwrap();
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());
        for step in [0.001, 0.0001, 0.009, 0.3, 2.25, 7.5, 45.0, 90.0] {
            let config = EngineConfig {
                step_degrees: step,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_ok(), "{step}");
        }
        let fine = EngineConfig {
            step_degrees: 0.001,
            ..EngineConfig::default()
        };
        assert_eq!(fine.steps_per_turn(), 90_000);

        for step in [7.0, 0.0, -5.0, 120.0, f32::NAN, 5.00001, 4.9999, 0.007] {
            let config = EngineConfig {
                step_degrees: step,
                ..EngineConfig::default()
            };
            assert!(matches!(
                RotationEngine::new(config),
                Err(CubeError::InvalidStepAngle(_))
            ), "{step}");
        }
        let config = EngineConfig {
            tolerance: 0.0,
            ..EngineConfig::default()
        };
        assert_eq!(
            RotationEngine::new(config).unwrap_err(),
            CubeError::InvalidTolerance(0.0)
        );
        assert_eq!(EngineConfig::default().steps_per_turn(), 18);
    }

    #[test]
    fn test_drift_stays_bounded_without_snapping() {
        let config = EngineConfig {
            snap_on_completion: false,
            ..EngineConfig::default()
        };
        let mut engine = RotationEngine::new(config).unwrap();
        let mut cube = Cube::solved();
        for i in 0..40 {
            let motion = [Motion::Front, Motion::Right, Motion::Up][i % 3];
            engine.perform(&mut cube, TurnCommand::new(motion, i % 2 == 0)).unwrap();
        }
        assert!(cube.max_drift() < 1e-3);
    }

    fn turn_sequence(config: EngineConfig) -> (Cube, Vec<usize>) {
        let mut engine = RotationEngine::new(config).unwrap();
        let mut cube = Cube::solved();
        let mut turned = Vec::new();
        for i in 0..12 {
            let motion = [Motion::Front, Motion::Right, Motion::Up][i % 3];
            engine.begin(&cube, TurnCommand::new(motion, i % 4 != 0)).unwrap();
            turned.extend_from_slice(engine.affected_indices().unwrap());
            engine.finish(&mut cube);
        }
        turned.sort_unstable();
        turned.dedup();
        (cube, turned)
    }

    #[test]
    fn test_completed_turns_snap_to_lattice() {
        let (cube, turned) = turn_sequence(EngineConfig::default());
        assert!(cube.max_drift() < 1e-6);
        for &i in &turned {
            let cubelet = cube.get(i).unwrap();
            // Translations are rounded outright.
            assert_eq!(cubelet.position(), cubelet.position().map(f32::round));
            // Rotations go back through a quaternion, so allow its rounding.
            let m = cubelet.orientation().to_rotation_matrix().into_inner();
            for x in m.iter() {
                assert!((x - x.round()).abs() < 1e-6, "{m}");
                assert!([-1.0, 0.0, 1.0].contains(&x.round()));
            }
        }

        let config = EngineConfig {
            snap_on_completion: false,
            ..EngineConfig::default()
        };
        let (drifted, turned) = turn_sequence(config);
        assert!(drifted.max_drift() > 0.0);
        assert!(turned.iter().any(|&i| {
            let position = drifted.get(i).unwrap().position();
            position != position.map(f32::round)
        }));
    }

    fn command_strategy() -> impl Strategy<Value = TurnCommand> {
        (0..3usize, any::<bool>()).prop_map(|(m, forward)| {
            let motion = [Motion::Front, Motion::Right, Motion::Up][m];
            TurnCommand::new(motion, forward)
        })
    }

    proptest! {
        #[test]
        fn proptest_sequence_then_inverse_restores(
            commands in prop::collection::vec(command_strategy(), 0..12)
        ) {
            let mut cube = Cube::solved();
            let mut engine = RotationEngine::default();
            for &command in &commands {
                engine.perform(&mut cube, command).unwrap();
                prop_assert!(cube.max_drift() < 1e-3);
            }
            for &command in commands.iter().rev() {
                engine.perform(&mut cube, command.inverse()).unwrap();
            }
            prop_assert!(cube.is_solved());
            for (x, y) in cube.iter().zip(Cube::solved().iter()) {
                prop_assert!((x.model_matrix() - y.model_matrix()).norm() < 1e-3);
            }
        }
    }
}
