/// Turn scripts such as `F R' U2`
use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{map, opt, value},
    multi::many0,
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::engine::{Motion, TurnCommand};
use crate::error::{CubeError, CubeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Forward,
    Backward,
    Double,
}

/// Parse a whitespace-separated turn script.
///
/// `F`, `R` and `U` are forward turns, a trailing `'` reverses one and a
/// trailing `2` repeats it.
pub fn parse_script(input: &str) -> CubeResult<Vec<TurnCommand>> {
    let (rest, turns) = parse_turns(input).map_err(|_| notation_error(input, input))?;
    if !rest.is_empty() {
        return Err(notation_error(input, rest));
    }

    let mut commands = Vec::with_capacity(turns.len());
    for (motion, modifier) in turns {
        match modifier {
            Modifier::Forward => commands.push(TurnCommand::new(motion, true)),
            Modifier::Backward => commands.push(TurnCommand::new(motion, false)),
            Modifier::Double => {
                commands.push(TurnCommand::new(motion, true));
                commands.push(TurnCommand::new(motion, true));
            }
        }
    }
    Ok(commands)
}

/// Write commands back as a script.
pub fn format_script(commands: &[TurnCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Commands that undo `commands`.
pub fn invert(commands: &[TurnCommand]) -> Vec<TurnCommand> {
    commands.iter().rev().map(|c| c.inverse()).collect()
}

fn notation_error(input: &str, rest: &str) -> CubeError {
    CubeError::Notation {
        offset: input.len() - rest.len(),
        token: rest.split_whitespace().next().unwrap_or(rest).to_string(),
    }
}

fn parse_turns(input: &str) -> IResult<&str, Vec<(Motion, Modifier)>> {
    preceded(multispace0, many0(terminated(parse_turn, multispace0)))(input)
}

fn parse_turn(input: &str) -> IResult<&str, (Motion, Modifier)> {
    pair(parse_motion, parse_modifier)(input)
}

fn parse_motion(input: &str) -> IResult<&str, Motion> {
    alt((
        value(Motion::Front, char('F')),
        value(Motion::Right, char('R')),
        value(Motion::Up, char('U')),
    ))(input)
}

fn parse_modifier(input: &str) -> IResult<&str, Modifier> {
    map(
        opt(alt((
            value(Modifier::Backward, char('\'')),
            value(Modifier::Double, char('2')),
        ))),
        |m| m.unwrap_or(Modifier::Forward),
    )(input)
}
