//! Expression evaluation over the closed Golog expression set, plus the value and state model.

mod expr;
mod state;
mod value;

pub use expr::{EvalError, EvalResult, eval_bool, eval_expr};
pub use state::State;
pub use value::Value;
