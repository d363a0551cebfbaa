use thiserror::Error;

use crate::{Control, ControlKind, Program};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} requires at least one branch")]
    EmptyControl { kind: ControlKind },
    #[error("plan takes exactly one branch, got {count}")]
    PlanArity { count: usize },
    #[error("binding '{var}' must be initialised by an action call or control construct, got {found}")]
    BindInit { var: String, found: &'static str },
    #[error("action call with empty name")]
    EmptyActionName,
    #[error("scheduler sentinel '{0}' is not valid in source programs")]
    Sentinel(&'static str),
}

/// Checks the structural rules the engine relies on before it steps a program.
pub fn validate_program(program: &Program) -> Result<(), ValidationError> {
    match program {
        Program::Block(block) => block.statements.iter().try_for_each(validate_program),
        Program::If(branch) => {
            validate_program(&branch.consequent)?;
            if let Some(alternate) = &branch.alternate {
                validate_program(alternate)?;
            }
            Ok(())
        }
        Program::Test(_) => Ok(()),
        Program::Call(call) => {
            if call.name.is_empty() {
                return Err(ValidationError::EmptyActionName);
            }
            Ok(())
        }
        Program::Bind(bind) => {
            match bind.init.as_ref() {
                Program::Call(_) | Program::Control(_) => {}
                other => {
                    return Err(ValidationError::BindInit {
                        var: bind.var.clone(),
                        found: other.kind(),
                    });
                }
            }
            validate_program(&bind.init)
        }
        Program::Control(control) => validate_control(control),
        Program::Done | Program::Blocked => Err(ValidationError::Sentinel(program.kind())),
    }
}

fn validate_control(control: &Control) -> Result<(), ValidationError> {
    match control.kind {
        ControlKind::Plan if control.branches.len() != 1 => {
            return Err(ValidationError::PlanArity {
                count: control.branches.len(),
            });
        }
        kind if control.branches.is_empty() => {
            return Err(ValidationError::EmptyControl { kind });
        }
        _ => {}
    }
    control.branches.iter().try_for_each(validate_program)
}
