use std::sync::Arc;

use futures::FutureExt;
use futures::future;
use golog_actions::BoundAction;
use golog_exec::{State, eval_bool};
use golog_types::{ActionCall, ControlKind, Program};
use tracing::{debug, info};

use super::{
    StateUpdate, StepFuture, Successor, bind_result, evaluate_args, first_pending, resequence,
};
use crate::engine::RunContext;
use crate::error::EngineError;
use crate::{planner, scheduler};

/// Takes one online transition of `program`.
///
/// Everything up to the first suspension happens before this returns: the
/// action is instantiated, its precondition checked and `execute` invoked. The
/// returned future resolves when that action (or, for `conc`, `either` and
/// `plan`, the whole construct) has completed.
pub fn step_online(program: Program, state: State, ctx: Arc<RunContext>) -> StepFuture {
    match dispatch(program, state, &ctx) {
        Ok(step) => step,
        Err(err) => future::ready(Err(err)).boxed(),
    }
}

fn dispatch(program: Program, state: State, ctx: &Arc<RunContext>) -> Result<StepFuture, EngineError> {
    match program {
        Program::Block(block) => {
            let Some(idx) = first_pending(&block.statements, &state)? else {
                return Ok(ready(Successor::finished(state)));
            };
            let mut statements = block.statements.into_iter().skip(idx);
            let Some(first) = statements.next() else {
                return Ok(ready(Successor::finished(state)));
            };
            let rest: Vec<Program> = statements.collect();
            let inner = dispatch(first, state, ctx)?;
            Ok(async move {
                let mut successor = inner.await?;
                successor.continuation = resequence(successor.continuation, rest);
                Ok(successor)
            }
            .boxed())
        }
        Program::If(branch) => {
            if eval_bool(&branch.test, &state)? {
                dispatch(*branch.consequent, state, ctx)
            } else if let Some(alternate) = branch.alternate {
                dispatch(*alternate, state, ctx)
            } else {
                Ok(ready(Successor::finished(state)))
            }
        }
        Program::Test(test) => {
            if eval_bool(&test.expr, &state)? {
                Ok(ready(Successor::finished(state)))
            } else {
                Err(EngineError::AssertionFailed {
                    expr: test.expr.to_string(),
                })
            }
        }
        Program::Call(call) => dispatch_call(call, state, ctx),
        Program::Bind(bind) => {
            let var = bind.var;
            let inner = dispatch(*bind.init, state, ctx)?;
            Ok(async move { Ok(bind_result(var, inner.await?)) }.boxed())
        }
        Program::Control(control) => match control.kind {
            // Online execution commits to the first alternative.
            ControlKind::Or => match control.branches.into_iter().next() {
                Some(first) => dispatch(first, state, ctx),
                None => Err(EngineError::NoTransition {
                    reason: "or without branches".into(),
                }),
            },
            ControlKind::Plan => {
                let Some(body) = control.branches.into_iter().next() else {
                    return Err(EngineError::Unsupported("plan without a body".into()));
                };
                let outcome = planner::plan(&body, &state, &ctx.registry, ctx.config.plan_depth_limit)?
                    .ok_or(EngineError::PlanNotFound)?;
                info!(trace_len = outcome.trace.len(), "executing plan");
                execute_trace(outcome.trace, state, ctx)
            }
            ControlKind::Conc | ControlKind::Either => Ok(scheduler::run_concurrent(
                control.kind,
                control.branches,
                state,
                ctx.clone(),
            )),
        },
        Program::Done => Ok(ready(Successor::finished(state))),
        Program::Blocked => Err(EngineError::Unsupported(
            "blocked slot outside of a scheduler".into(),
        )),
    }
}

fn dispatch_call(call: ActionCall, state: State, ctx: &Arc<RunContext>) -> Result<StepFuture, EngineError> {
    let args = evaluate_args(&call.args, &state)?;
    let bound = ctx.registry.instantiate(&call.name, args)?;
    dispatch_bound(bound, state, ctx)
}

/// Checks the precondition, records and invokes an instantiated action.
fn dispatch_bound(
    bound: BoundAction,
    state: State,
    ctx: &Arc<RunContext>,
) -> Result<StepFuture, EngineError> {
    if ctx.is_abandoned() {
        return Err(EngineError::Abandoned);
    }
    if !bound.action.is_possible(&state) {
        return Err(EngineError::NoTransition {
            reason: format!("{} is not possible", bound.record),
        });
    }
    let next = bound.action.effect(&state);
    if bound.action.recorded() {
        ctx.history.record(bound.record.clone());
    }
    debug!(action = %bound.record, "action dispatched");
    Ok(async move {
        let outcome = bound.action.execute().await;
        match outcome {
            Ok(result) => {
                debug!(action = %bound.record, "action completed");
                Ok(Successor {
                    continuation: None,
                    state: next,
                    result,
                    plan_step: Vec::new(),
                    updates: vec![StateUpdate::Effect(bound)],
                })
            }
            Err(err) => Err(EngineError::ActionFailed {
                action: bound.record,
                message: format!("{err:#}"),
            }),
        }
    }
    .boxed())
}

/// Executes a discovered plan in order; the first action is dispatched eagerly.
fn execute_trace(
    trace: Vec<BoundAction>,
    state: State,
    ctx: &Arc<RunContext>,
) -> Result<StepFuture, EngineError> {
    let mut trace = trace.into_iter();
    let Some(first) = trace.next() else {
        return Ok(ready(Successor::finished(state)));
    };
    let head = dispatch_bound(first, state, ctx)?;
    let ctx = ctx.clone();
    Ok(async move {
        let mut successor = head.await?;
        for bound in trace {
            let mut next = dispatch_bound(bound, successor.state, &ctx)?.await?;
            successor.updates.append(&mut next.updates);
            next.updates = successor.updates;
            successor = next;
        }
        Ok(successor)
    }
    .boxed())
}

fn ready(successor: Successor) -> StepFuture {
    future::ready(Ok(successor)).boxed()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use golog_actions::{ActionRegistry, BuiltinConfig, register_builtins};
    use golog_exec::Value;
    use golog_types::Expr;

    use super::*;
    use crate::config::EngineConfig;

    fn context() -> Arc<RunContext> {
        let mut registry = ActionRegistry::new();
        register_builtins(
            &mut registry,
            &BuiltinConfig {
                action_latency: Duration::from_millis(5),
            },
        );
        Arc::new(RunContext::new(registry, EngineConfig::default()))
    }

    fn action(id: i64) -> Program {
        Program::call("A", [("id", Expr::lit(id))])
    }

    #[tokio::test(start_paused = true)]
    async fn call_is_recorded_before_it_completes() {
        let ctx = context();
        let step = step_online(action(1), State::new(), ctx.clone());
        assert_eq!(ctx.history.len(), 1);
        let successor = step.await.unwrap();
        assert!(successor.continuation.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn block_steps_one_statement_at_a_time() {
        let ctx = context();
        let program = Program::block([action(1), action(2)]);
        let successor = step_online(program, State::new(), ctx.clone()).await.unwrap();
        assert_eq!(successor.continuation, Some(Program::block([action(2)])));
        assert_eq!(ctx.history.len(), 1);
    }

    #[tokio::test]
    async fn bind_writes_result_into_vars() {
        let program = Program::bind("x", Program::call("Identity", [("value", Expr::lit(1))]));
        let successor = step_online(program, State::new(), context()).await.unwrap();
        assert_eq!(successor.state.var("x"), Some(&Value::Int(1)));
    }

    #[tokio::test]
    async fn failed_test_is_an_assertion_failure() {
        let program = Program::test(Expr::lit(false));
        let err = step_online(program, State::new(), context()).await.unwrap_err();
        assert!(matches!(err, EngineError::AssertionFailed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn online_or_commits_to_first_branch() {
        let ctx = context();
        let program = Program::or([action(1), action(2)]);
        step_online(program, State::new(), ctx.clone()).await.unwrap();
        let ids: Vec<_> = ctx.history.snapshot().into_iter().map(|e| e.args["id"].clone()).collect();
        assert_eq!(ids, vec![Value::Int(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn action_failure_carries_the_action() {
        let program = Program::call("Fail", [("message", Expr::lit("boom"))]);
        let err = step_online(program, State::new(), context()).await.unwrap_err();
        match err {
            EngineError::ActionFailed { action, message } => {
                assert_eq!(action.name, "Fail");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
