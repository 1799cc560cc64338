//! Non-local control flow and loops.

use crate::compiled::{Node, ScopedPath};
use crate::errors::BindingError;
use crate::Value;

use super::Interpreter;

/// Anything that unwinds evaluation past the current node.
#[derive(Debug)]
pub(crate) enum ControlAction {
    Break,
    Continue,
    Return(Value),
    Error(BindingError),
}

impl From<BindingError> for ControlAction {
    fn from(error: BindingError) -> Self {
        ControlAction::Error(error)
    }
}

pub(crate) type EvalResult = Result<Value, ControlAction>;

/// How a loop body iteration ended.
enum Flow {
    Next,
    Stop,
}

/// Number of iterations for a `loop` count: truncated toward zero, `0` for
/// negative or `NaN` counts, capped at `max`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn iteration_count(count: f64, max: u32) -> u32 {
    if count.is_nan() || count < 1.0 {
        return 0;
    }
    if count >= f64::from(max) {
        return max;
    }
    count as u32
}

impl Interpreter<'_, '_> {
    fn run_body(&mut self, body: &Node) -> Result<Flow, ControlAction> {
        match self.eval(body) {
            Ok(_) | Err(ControlAction::Continue) => Ok(Flow::Next),
            Err(ControlAction::Break) => Ok(Flow::Stop),
            Err(other) => Err(other),
        }
    }

    pub(super) fn eval_loop(&mut self, count: &Node, body: &Node) -> EvalResult {
        let count = self.eval(count)?.as_number();
        for _ in 0..iteration_count(count, self.max_loop_iterations) {
            if let Flow::Stop = self.run_body(body)? {
                break;
            }
        }
        Ok(Value::Void)
    }

    /// Iterate an array, writing each element to `variable` before the body
    /// runs. Anything other than an array iterates zero times.
    pub(super) fn eval_for_each(
        &mut self,
        variable: &ScopedPath,
        collection: &Node,
        body: &Node,
    ) -> EvalResult {
        let Value::Array(items) = self.eval(collection)? else {
            return Ok(Value::Void);
        };
        let cap = self.max_loop_iterations as usize;
        for item in items.iter().take(cap) {
            self.write(variable, item.clone())?;
            if let Flow::Stop = self.run_body(body)? {
                break;
            }
        }
        Ok(Value::Void)
    }
}
