//! # Square pattern
//!
//! Built-in behaviour run when the executable is started without a script: drive forward for a
//! fixed time, turn left, and repeat until the requested number of legs have been driven.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use bot_lib::{
    params::BotExecParams,
    state_mgr::{Family, StateMgr, StateTag},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct SquarePattern {
    leg_s: f64,
    num_legs: u32,
    legs_done: u32,
    started: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum SquareStep {
    /// Keep going, entering the given state if there is one.
    Continue(Option<StateTag>),

    /// All legs have been driven and the robot is idle.
    Finished,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SquarePattern {
    pub fn new(params: &BotExecParams) -> Self {
        Self {
            leg_s: params.square_leg_s,
            num_legs: params.square_num_legs,
            legs_done: 0,
            started: false,
        }
    }

    /// Decide what the robot should do next based on the state manager's current state.
    pub fn next(&mut self, state_mgr: &StateMgr) -> SquareStep {
        if !self.started {
            self.started = true;

            if self.num_legs == 0 {
                return SquareStep::Continue(Some(StateTag::idle()));
            }
            return SquareStep::Continue(Some(self.leg_tag(StateTag::forward())));
        }

        match state_mgr.current_state().family {
            Family::Forward => {
                if state_mgr.time_in_current_state().as_secs_f64() >= self.leg_s {
                    SquareStep::Continue(Some(self.leg_tag(StateTag::rotate_left())))
                } else {
                    SquareStep::Continue(None)
                }
            }
            // A timed out rotation also ends the leg
            Family::RotateLeft if !state_mgr.is_rotating() => {
                self.legs_done += 1;
                info!("Square leg {} of {} complete", self.legs_done, self.num_legs);

                if self.legs_done >= self.num_legs {
                    SquareStep::Continue(Some(StateTag::idle()))
                } else {
                    SquareStep::Continue(Some(self.leg_tag(StateTag::forward())))
                }
            }
            Family::Idle => SquareStep::Finished,
            _ => SquareStep::Continue(None),
        }
    }

    fn leg_tag(&self, tag: StateTag) -> StateTag {
        tag.with_discriminator(format!("leg {}", self.legs_done + 1))
    }
}
