use golog_exec::{State, eval_bool};
use golog_types::{ControlKind, Program};

use crate::error::EngineError;

/// Whether `program` may legally stop in `state` without another transition.
pub fn is_final(program: &Program, state: &State) -> Result<bool, EngineError> {
    match program {
        Program::Block(block) => all_final(&block.statements, state),
        Program::If(branch) => {
            if eval_bool(&branch.test, state)? {
                is_final(&branch.consequent, state)
            } else {
                match &branch.alternate {
                    Some(alternate) => is_final(alternate, state),
                    None => Ok(true),
                }
            }
        }
        Program::Test(test) => Ok(eval_bool(&test.expr, state)?),
        Program::Call(_) | Program::Bind(_) => Ok(false),
        Program::Control(control) => match control.kind {
            ControlKind::Conc | ControlKind::Plan => all_final(&control.branches, state),
            ControlKind::Or | ControlKind::Either => any_final(&control.branches, state),
        },
        Program::Done => Ok(true),
        Program::Blocked => Ok(false),
    }
}

fn all_final(programs: &[Program], state: &State) -> Result<bool, EngineError> {
    for program in programs {
        if !is_final(program, state)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_final(programs: &[Program], state: &State) -> Result<bool, EngineError> {
    for program in programs {
        if is_final(program, state)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use golog_exec::Value;
    use golog_types::Expr;

    fn at(location: &str) -> State {
        State::from_facts([("location", Value::from(location))])
    }

    fn not_at(location: &str) -> Expr {
        Expr::ne(Expr::reference("state.location"), Expr::lit(location))
    }

    #[test]
    fn empty_block_is_final() {
        assert!(is_final(&Program::block([]), &State::new()).unwrap());
    }

    #[test]
    fn block_is_final_when_every_statement_is() {
        let program = Program::block([Program::test(not_at("l2")), Program::test(not_at("l3"))]);
        assert!(is_final(&program, &at("l1")).unwrap());
        assert!(!is_final(&program, &at("l3")).unwrap());
    }

    #[test]
    fn if_without_alternate_is_final_when_test_fails() {
        let program = Program::if_then(Expr::lit(false), Program::call("A", [("id", Expr::lit(1))]));
        assert!(is_final(&program, &State::new()).unwrap());
        let taken = Program::if_then(Expr::lit(true), Program::call("A", [("id", Expr::lit(1))]));
        assert!(!is_final(&taken, &State::new()).unwrap());
    }

    #[test]
    fn calls_and_bindings_are_never_final() {
        let call = Program::call("A", [("id", Expr::lit(1))]);
        assert!(!is_final(&call, &State::new()).unwrap());
        assert!(!is_final(&Program::bind("x", call), &State::new()).unwrap());
    }

    #[test]
    fn conc_needs_all_either_needs_any() {
        let branches = [Program::Done, Program::call("A", [("id", Expr::lit(1))])];
        assert!(!is_final(&Program::conc(branches.clone()), &State::new()).unwrap());
        assert!(is_final(&Program::either(branches), &State::new()).unwrap());
    }

    #[test]
    fn sentinels() {
        assert!(is_final(&Program::Done, &State::new()).unwrap());
        assert!(!is_final(&Program::Blocked, &State::new()).unwrap());
    }

    #[test]
    fn non_boolean_test_is_an_error() {
        let err = is_final(&Program::test(Expr::lit(3)), &State::new()).unwrap_err();
        assert!(matches!(err, EngineError::Eval(_)));
    }
}
