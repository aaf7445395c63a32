//! Rhai engine creation and formula evaluation.
//!
//! Creates the Rhai scripting engine with the formula built-ins registered
//! against a shared grid, and evaluates emitted formulas after
//! preprocessing. Evaluation is pure: the grid is never mutated, so a
//! single engine can serve any number of callers.

use rhai::{Engine, EvalAltResult};

use super::{Dynamic, Grid};
use super::preprocess::preprocess_formula;

/// Create a Rhai engine with built-ins registered over `grid`.
pub fn create_engine(grid: Grid) -> Engine {
    let mut engine = Engine::new();
    crate::builtins::register_builtins(&mut engine, grid);
    engine
}

/// Evaluate one emitted formula (stored without the leading '=').
pub fn eval_formula(engine: &Engine, formula: &str) -> Result<Dynamic, Box<EvalAltResult>> {
    engine.eval(&preprocess_formula(formula))
}
