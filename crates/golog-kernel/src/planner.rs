use golog_actions::{ActionRegistry, BoundAction};
use golog_exec::State;
use golog_types::Program;
use tracing::{debug, info};

use crate::engine::PlanOutcome;
use crate::error::EngineError;
use crate::finality::is_final;
use crate::transition::step_offline;

/// Depth-first search for an action sequence that takes `program` to a final
/// configuration. Alternatives are tried in the order the transition relation
/// produces them, so earlier `or` branches win.
///
/// `depth_limit` bounds the number of transitions along one branch; a branch
/// that reaches it is pruned. Without a limit a non-terminating program makes
/// the search non-terminating.
pub fn plan(
    program: &Program,
    state: &State,
    registry: &ActionRegistry,
    depth_limit: Option<usize>,
) -> Result<Option<PlanOutcome>, EngineError> {
    let mut search = Search {
        registry,
        depth_limit,
        trace: Vec::new(),
        explored: 0,
    };
    match search.visit(program, state, 0)? {
        Some(state) => {
            info!(trace_len = search.trace.len(), explored = search.explored, "plan found");
            Ok(Some(PlanOutcome {
                trace: search.trace,
                state,
            }))
        }
        None => {
            debug!(explored = search.explored, "plan search exhausted");
            Ok(None)
        }
    }
}

struct Search<'a> {
    registry: &'a ActionRegistry,
    depth_limit: Option<usize>,
    trace: Vec<BoundAction>,
    explored: usize,
}

impl Search<'_> {
    fn visit(&mut self, program: &Program, state: &State, depth: usize) -> Result<Option<State>, EngineError> {
        if is_final(program, state)? {
            return Ok(Some(state.clone()));
        }
        if self.depth_limit.is_some_and(|limit| depth >= limit) {
            return Ok(None);
        }
        for successor in step_offline(program, state, self.registry)? {
            self.explored += 1;
            let prefix_len = self.trace.len();
            let next = successor.remaining();
            self.trace.extend(successor.plan_step);
            if let Some(found) = self.visit(&next, &successor.state, depth + 1)? {
                return Ok(Some(found));
            }
            self.trace.truncate(prefix_len);
        }
        Ok(None)
    }
}
