//! Slot table behind `conc` and `either`.
//!
//! Each branch owns one slot. A live slot is stepped once per round and then
//! reads `Blocked` until its transition completes; a finished slot reads
//! `Done`. Every slot is dispatched against the shared state of the construct.
//! When it completes, its updates are replayed onto that state as it stands
//! then, so each effect sees what siblings folded before it. Completions that
//! become ready together are handled in dispatch order.

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{self, BoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use golog_exec::{State, Value};
use golog_types::{ControlKind, Program};
use tracing::{debug, warn};

use crate::engine::RunContext;
use crate::error::EngineError;
use crate::finality::is_final;
use crate::transition::{StateUpdate, StepFuture, Successor, step_online};

struct SlotCompletion {
    slot: usize,
    seq: u64,
    outcome: Result<Successor, EngineError>,
}

struct Scheduler {
    kind: ControlKind,
    slots: Vec<Program>,
    state: State,
    ctx: Arc<RunContext>,
    abandoned: Arc<AtomicBool>,
    in_flight: FuturesUnordered<BoxFuture<'static, SlotCompletion>>,
    next_seq: u64,
    result: Option<Value>,
    /// Everything folded into `state` so far, for an enclosing scheduler.
    applied: Vec<StateUpdate>,
}

/// Runs a `conc` or `either` construct to completion as one transition.
pub(crate) fn run_concurrent(
    kind: ControlKind,
    branches: Vec<Program>,
    state: State,
    ctx: Arc<RunContext>,
) -> StepFuture {
    match Scheduler::start(kind, branches, state, &ctx) {
        Ok(scheduler) => scheduler.drive().boxed(),
        Err(err) => future::ready(Err(err)).boxed(),
    }
}

impl Scheduler {
    /// Builds the slot table and dispatches the first round.
    fn start(
        kind: ControlKind,
        branches: Vec<Program>,
        state: State,
        parent: &RunContext,
    ) -> Result<Self, EngineError> {
        let (ctx, abandoned) = parent.scoped();
        let mut slots = Vec::with_capacity(branches.len());
        for branch in branches {
            if is_final(&branch, &state)? {
                slots.push(Program::Done);
            } else {
                slots.push(branch);
            }
        }
        let mut scheduler = Self {
            kind,
            slots,
            state,
            ctx,
            abandoned,
            in_flight: FuturesUnordered::new(),
            next_seq: 0,
            result: None,
            applied: Vec::new(),
        };
        if !scheduler.is_finished() {
            scheduler.dispatch_live();
        }
        Ok(scheduler)
    }

    fn is_finished(&self) -> bool {
        let mut done = self.slots.iter().map(|slot| matches!(slot, Program::Done));
        match self.kind {
            ControlKind::Either => done.any(|d| d),
            _ => done.all(|d| d),
        }
    }

    /// Steps every slot that is neither blocked nor done.
    fn dispatch_live(&mut self) {
        for (slot, program) in self.slots.iter_mut().enumerate() {
            if matches!(program, Program::Done | Program::Blocked) {
                continue;
            }
            let program = mem::replace(program, Program::Blocked);
            let seq = self.next_seq;
            self.next_seq += 1;
            debug!(construct = %self.kind, slot, "slot dispatched");
            let step = step_online(program, self.state.clone(), self.ctx.clone());
            self.in_flight.push(
                async move {
                    SlotCompletion {
                        slot,
                        seq,
                        outcome: step.await,
                    }
                }
                .boxed(),
            );
        }
    }

    async fn drive(mut self) -> Result<Successor, EngineError> {
        while !self.is_finished() {
            let Some(first) = self.in_flight.next().await else {
                return Err(EngineError::NoTransition {
                    reason: format!("{} has no runnable branch", self.kind),
                });
            };
            let mut batch = vec![first];
            while let Some(Some(completion)) = self.in_flight.next().now_or_never() {
                batch.push(completion);
            }
            batch.sort_by_key(|completion| completion.seq);

            for completion in batch {
                if self.is_finished() {
                    debug!(
                        construct = %self.kind,
                        slot = completion.slot,
                        "completion after decision discarded"
                    );
                    continue;
                }
                if let Err(err) = self.complete(completion) {
                    self.abandon();
                    return Err(err);
                }
            }
            if !self.is_finished() {
                self.dispatch_live();
            }
        }
        self.abandon();
        Ok(Successor {
            continuation: None,
            state: self.state,
            result: self.result,
            plan_step: Vec::new(),
            updates: self.applied,
        })
    }

    /// Folds one slot's transition into the shared state and updates its slot.
    fn complete(&mut self, completion: SlotCompletion) -> Result<(), EngineError> {
        let SlotCompletion { slot, outcome, .. } = completion;
        let successor = outcome?;
        for update in &successor.updates {
            update.apply(&mut self.state);
        }
        self.applied.extend(successor.updates);
        if successor.result.is_some() {
            self.result = successor.result;
        }
        let next = match successor.continuation {
            Some(program) if !is_final(&program, &self.state)? => program,
            _ => Program::Done,
        };
        debug!(
            construct = %self.kind,
            slot,
            done = matches!(next, Program::Done),
            "slot completed"
        );
        self.slots[slot] = next;
        Ok(())
    }

    /// Gives up on every transition still in flight.
    ///
    /// Abandoned branches never dispatch another action. The action each one
    /// already has in flight runs to completion on a detached task and its
    /// outcome is discarded.
    fn abandon(&mut self) {
        self.abandoned.store(true, Ordering::Release);
        let pending = mem::take(&mut self.in_flight);
        if pending.is_empty() {
            return;
        }
        debug!(construct = %self.kind, count = pending.len(), "abandoning branches");
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(
                construct = %self.kind,
                count = pending.len(),
                "no runtime to finish abandoned actions on"
            );
            return;
        };
        for step in pending {
            handle.spawn(async move {
                let completion = step.await;
                debug!(slot = completion.slot, "abandoned branch settled");
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use golog_actions::{Action, ActionArgs, ActionRegistry, BuiltinConfig, register_builtins};
    use golog_types::Expr;

    use super::*;
    use crate::config::EngineConfig;

    /// Bumps the `count` fact once its latency has passed.
    struct Increment {
        latency: Duration,
    }

    #[async_trait]
    impl Action for Increment {
        fn effect(&self, state: &State) -> State {
            let count = match state.fact("count") {
                Some(Value::Int(count)) => *count,
                _ => 0,
            };
            state.with_fact("count", count + 1)
        }

        async fn execute(&self) -> anyhow::Result<Option<Value>> {
            tokio::time::sleep(self.latency).await;
            Ok(None)
        }
    }

    /// Writes `slot = value` once its latency has passed.
    struct Put {
        value: Value,
        latency: Duration,
    }

    #[async_trait]
    impl Action for Put {
        fn effect(&self, state: &State) -> State {
            state.with_fact("slot", self.value.clone())
        }

        async fn execute(&self) -> anyhow::Result<Option<Value>> {
            tokio::time::sleep(self.latency).await;
            Ok(None)
        }
    }

    fn latency(args: &ActionArgs) -> Duration {
        Duration::from_millis(args.get("ms").and_then(Value::as_u64).unwrap_or(0))
    }

    fn context() -> Arc<RunContext> {
        let mut registry = ActionRegistry::new();
        register_builtins(&mut registry, &BuiltinConfig::default());
        registry.register("Inc", |args: &ActionArgs| {
            Ok(Arc::new(Increment {
                latency: latency(args),
            }) as Arc<dyn Action>)
        });
        registry.register("Put", |args: &ActionArgs| {
            Ok(Arc::new(Put {
                value: args.get("value").cloned().unwrap_or_default(),
                latency: latency(args),
            }) as Arc<dyn Action>)
        });
        Arc::new(RunContext::new(registry, EngineConfig::default()))
    }

    fn increment(ms: i64) -> Program {
        Program::call("Inc", [("ms", Expr::lit(ms))])
    }

    fn put(value: i64, ms: i64) -> Program {
        Program::call("Put", [("value", Expr::lit(value)), ("ms", Expr::lit(ms))])
    }

    fn action(id: f64) -> Program {
        Program::call("A", [("id", Expr::lit(id))])
    }

    fn sleep(ms: i64) -> Program {
        Program::call("Sleep", [("time", Expr::lit(ms))])
    }

    fn ids(ctx: &RunContext) -> Vec<Value> {
        ctx.history
            .snapshot()
            .into_iter()
            .map(|entry| entry.args["id"].clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn conc_interleaves_round_robin() {
        let ctx = context();
        let branches = vec![
            Program::block([action(1.1), action(1.2)]),
            Program::block([action(2.1), action(2.2)]),
        ];
        let successor = run_concurrent(ControlKind::Conc, branches, State::new(), ctx.clone())
            .await
            .unwrap();
        assert!(successor.continuation.is_none());
        assert_eq!(
            ids(&ctx),
            vec![Value::Float(1.1), Value::Float(2.1), Value::Float(1.2), Value::Float(2.2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn either_stops_at_first_finished_branch() {
        let ctx = context();
        let branches = vec![Program::block([action(1.0), action(2.0)]), sleep(10)];
        run_concurrent(ControlKind::Either, branches, State::new(), ctx.clone())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ids(&ctx), vec![Value::Float(1.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn either_keeps_winners_bindings() {
        let ctx = context();
        let branches = vec![
            Program::bind("x", Program::call("Identity", [("value", Expr::lit(7))])),
            action(1.0),
        ];
        let successor = run_concurrent(ControlKind::Either, branches, State::new(), ctx)
            .await
            .unwrap();
        assert_eq!(successor.state.var("x"), Some(&Value::Int(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn failing_slot_fails_the_construct() {
        let ctx = context();
        let branches = vec![
            Program::block([action(1.0), Program::test(Expr::lit(false))]),
            Program::block([action(2.0), action(2.1), action(2.2)]),
        ];
        let err = run_concurrent(ControlKind::Conc, branches, State::new(), ctx.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AssertionFailed { .. }));
        tokio::time::sleep(Duration::from_secs(1)).await;
        // The second round was already dispatched when the failed test resolved.
        assert_eq!(
            ids(&ctx),
            vec![Value::Float(1.0), Value::Float(2.0), Value::Float(2.1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn effects_fold_onto_sibling_updates() {
        let state = State::from_facts([("count", Value::Int(0))]);
        let branches = vec![increment(100), increment(300)];
        let successor = run_concurrent(ControlKind::Conc, branches, state, context())
            .await
            .unwrap();
        assert_eq!(successor.state.fact("count"), Some(&Value::Int(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn last_completion_writes_last() {
        // The slow branch restores the starting value after the fast one changed it.
        let state = State::from_facts([("slot", Value::Int(0))]);
        let branches = vec![put(0, 300), put(1, 100)];
        let successor = run_concurrent(ControlKind::Conc, branches, state, context())
            .await
            .unwrap();
        assert_eq!(successor.state.fact("slot"), Some(&Value::Int(0)));
    }

    #[tokio::test(start_paused = true)]
    async fn nested_construct_updates_reach_the_outer_state() {
        let state = State::from_facts([("count", Value::Int(0))]);
        let branches = vec![
            Program::conc([increment(100), increment(200)]),
            increment(150),
        ];
        let successor = run_concurrent(ControlKind::Conc, branches, state, context())
            .await
            .unwrap();
        assert_eq!(successor.state.fact("count"), Some(&Value::Int(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn either_ignores_loser_effects() {
        let state = State::from_facts([("slot", Value::Int(0))]);
        let branches = vec![put(1, 10), put(2, 100)];
        let successor = run_concurrent(ControlKind::Either, branches, state, context())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(successor.state.fact("slot"), Some(&Value::Int(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn finished_branches_start_done() {
        let ctx = context();
        let branches = vec![Program::test(Expr::lit(true)), action(1.0)];
        run_concurrent(ControlKind::Conc, branches, State::new(), ctx.clone())
            .await
            .unwrap();
        assert_eq!(ids(&ctx), vec![Value::Float(1.0)]);
    }
}
