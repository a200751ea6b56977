//! Drives a [`Workflow`] state machine step by step (spec §4.6).

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex as AsyncMutex;

// Layer 3: Internal module imports
use super::model::{pack_arguments, Workflow, END_STATE};
use super::vars::expand_value;
use crate::action::ActionResult;
use crate::kv::KvHandle;
use crate::system::ActorSystem;

/// Action method names that re-enter the interpreter on a sub-workflow
/// instead of dispatching to an actor (spec §4.6 "Sub-workflow invocation").
const SUB_WORKFLOW_METHODS: [&str; 2] = ["call", "runWorkflow"];

/// How concurrent sub-workflow invocations of the *same* [`Interpreter`]
/// share (or don't share) the nested interpreter instance (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubWorkflowMode {
    /// A fresh [`Interpreter`] per `call`/`runWorkflow` invocation.
    NonReusable,
    /// One nested [`Interpreter`] per sub-workflow name, its calls
    /// serialized behind an async mutex.
    Reusable,
}

/// Loads a named sub-workflow document, used only by the `call`/
/// `runWorkflow` pseudo-actions (spec §4.6).
///
/// Kept as a trait rather than a hard dependency on the filesystem so the
/// interpreter itself stays free of I/O; the CLI's directory-backed loader
/// is the normal implementation (see `bin/flowrt.rs`).
pub trait WorkflowLoader: Send + Sync {
    /// Resolve `name` to a parsed [`Workflow`], or an error message.
    fn load(&self, name: &str) -> Result<Workflow, String>;
}

/// Outcome of driving the workflow for one step (spec §4.6 "Single step
/// algorithm").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// `false` once the step could not complete (no matching transition,
    /// missing actor, a failed action, or iteration exhaustion).
    pub success: bool,
    /// New state token on success; a diagnostic message on failure.
    pub result: String,
}

impl StepOutcome {
    fn ok(result: impl Into<String>) -> Self {
        Self {
            success: true,
            result: result.into(),
        }
    }

    fn fail(result: impl Into<String>) -> Self {
        Self {
            success: false,
            result: result.into(),
        }
    }
}

/// Drives one workflow document's state machine against an
/// [`ActorSystem`], expanding `${...}` references and dispatching actions
/// as it goes (spec §3 "Interpreter", §4.6).
pub struct Interpreter {
    actors: Arc<ActorSystem>,
    workflow: Workflow,
    current_state: SyncMutex<String>,
    step_count: SyncMutex<usize>,
    variables: SyncMutex<HashMap<String, String>>,
    loader: Option<Arc<dyn WorkflowLoader>>,
    sub_mode: SubWorkflowMode,
    sub_workflows: AsyncMutex<HashMap<String, Arc<Interpreter>>>,
}

impl Interpreter {
    /// Build an interpreter for `workflow`, seeded with `variables` (spec
    /// §4.6 "initially seeded from external `-P` overrides").
    pub fn new(actors: Arc<ActorSystem>, workflow: Workflow, variables: HashMap<String, String>) -> Arc<Self> {
        Self::with_loader(actors, workflow, variables, None, SubWorkflowMode::NonReusable)
    }

    /// Build an interpreter that can also resolve `call`/`runWorkflow`
    /// sub-workflow actions via `loader`.
    pub fn with_loader(
        actors: Arc<ActorSystem>,
        workflow: Workflow,
        variables: HashMap<String, String>,
        loader: Option<Arc<dyn WorkflowLoader>>,
        sub_mode: SubWorkflowMode,
    ) -> Arc<Self> {
        let current_state = workflow.initial_state.clone();
        Arc::new(Self {
            actors,
            workflow,
            current_state: SyncMutex::new(current_state),
            step_count: SyncMutex::new(0),
            variables: SyncMutex::new(variables),
            loader,
            sub_mode,
            sub_workflows: AsyncMutex::new(HashMap::new()),
        })
    }

    /// This interpreter's workflow name.
    pub fn workflow_name(&self) -> &str {
        &self.workflow.name
    }

    /// Current state token.
    pub fn current_state(&self) -> String {
        self.current_state.lock().clone()
    }

    /// Number of steps successfully driven since construction or the last
    /// [`Interpreter::reset`].
    pub fn step_count(&self) -> usize {
        *self.step_count.lock()
    }

    /// A snapshot of the interpreter's variable scope.
    pub fn variables(&self) -> HashMap<String, String> {
        self.variables.lock().clone()
    }

    /// Set a single interpreter variable, overriding any seeded value.
    pub fn set_variable(&self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.lock().insert(name.into(), value.into());
    }

    /// Restore the initial state token and zero the step counter; variables
    /// are left untouched so a reusable interpreter keeps caller-set state
    /// across runs (spec §3 "Interpreter's cursor", §8 "Workflow reset").
    pub fn reset(&self) {
        *self.current_state.lock() = self.workflow.initial_state.clone();
        *self.step_count.lock() = 0;
    }

    /// Drive exactly one transition (spec §4.6 "Single step algorithm").
    pub async fn step(&self) -> StepOutcome {
        let state = self.current_state();
        if state == END_STATE {
            return StepOutcome::fail(END_STATE);
        }

        let Some(transition) = self.workflow.find_matching(&state) else {
            return StepOutcome::fail(END_STATE);
        };

        for action in &transition.actions {
            let variables = self.variables.lock().clone();

            if SUB_WORKFLOW_METHODS.contains(&action.method.as_str()) {
                let kv = self.local_kv_for(&action.actor);
                let expanded = expand_value(&action.arguments, &variables, &kv);
                let result = self.run_sub_workflow(&expanded).await;
                if !result.success {
                    return StepOutcome::fail(result.result);
                }
                self.store_result(&action.actor, &result.result);
                continue;
            }

            let Some(target) = self.actors.get(&action.actor) else {
                return StepOutcome::fail(format!("actor not found: {}", action.actor));
            };

            let expanded = expand_value(&action.arguments, &variables, &target.kv_state());
            let packed = pack_arguments(&expanded);
            let args = serde_json::to_string(&packed).unwrap_or_else(|_| "[]".to_string());

            let result = target.dispatch_action(&action.method, &args, action.mode).await;
            let _ = target.kv_state().put("result", result.result.as_str());
            if !result.success {
                return StepOutcome::fail(result.result);
            }
        }

        let Some(next) = transition.pick_to_state() else {
            return StepOutcome::fail(format!("transition '{}' has an empty to-set", transition.label));
        };
        *self.current_state.lock() = next.to_string();
        *self.step_count.lock() += 1;
        StepOutcome::ok(next.to_string())
    }

    /// Repeatedly [`Interpreter::step`] until failure or the terminal
    /// `"end"` state, bounded by `max_iterations` (spec §4.6 "Batch drive").
    pub async fn run_until_end(&self, max_iterations: usize) -> StepOutcome {
        for _ in 0..max_iterations {
            if self.current_state() == END_STATE {
                return StepOutcome::ok(END_STATE);
            }
            let outcome = self.step().await;
            if !outcome.success {
                return outcome;
            }
        }
        if self.current_state() == END_STATE {
            StepOutcome::ok(END_STATE)
        } else {
            StepOutcome::fail("max iterations exceeded")
        }
    }

    fn local_kv_for(&self, actor: &str) -> KvHandle {
        self.actors
            .get(actor)
            .map(|a| a.kv_state())
            .unwrap_or_default()
    }

    fn store_result(&self, actor: &str, result: &str) {
        match self.actors.get(actor) {
            Some(handle) => {
                let _ = handle.kv_state().put("result", result);
            }
            None => {
                self.variables.lock().insert("result".to_string(), result.to_string());
            }
        }
    }

    async fn run_sub_workflow(&self, expanded_args: &serde_json::Value) -> ActionResult {
        let Some(loader) = &self.loader else {
            return ActionResult::fail("no workflow loader configured for sub-workflow call");
        };
        let Some(name) = expanded_args.get("workflow").and_then(|v| v.as_str()) else {
            return ActionResult::fail("sub-workflow call missing 'workflow' argument");
        };
        let seed: HashMap<String, String> = expanded_args
            .get("vars")
            .and_then(|v| v.as_object())
            .map(|map| {
                map.iter()
                    .map(|(k, v)| (k.clone(), v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let sub = match self.sub_mode {
            SubWorkflowMode::NonReusable => {
                let workflow = match loader.load(name) {
                    Ok(wf) => wf,
                    Err(err) => return ActionResult::fail(err),
                };
                Interpreter::with_loader(
                    Arc::clone(&self.actors),
                    workflow,
                    seed,
                    Some(Arc::clone(loader)),
                    self.sub_mode,
                )
            }
            SubWorkflowMode::Reusable => {
                let mut cache = self.sub_workflows.lock().await;
                if let Some(existing) = cache.get(name) {
                    Arc::clone(existing)
                } else {
                    let workflow = match loader.load(name) {
                        Ok(wf) => wf,
                        Err(err) => return ActionResult::fail(err),
                    };
                    let interpreter = Interpreter::with_loader(
                        Arc::clone(&self.actors),
                        workflow,
                        seed,
                        Some(Arc::clone(loader)),
                        self.sub_mode,
                    );
                    cache.insert(name.to_string(), Arc::clone(&interpreter));
                    interpreter
                }
            }
        };

        let outcome = sub.run_until_end(crate::system::DEFAULT_MAX_ITERATIONS).await;
        ActionResult {
            success: outcome.success,
            result: outcome.result,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::action::{ActionDispatch, ActionResult as AR};
    use crate::system::SystemConfig;

    struct Math;

    impl ActionDispatch for Math {
        fn call_by_action_name(&mut self, action: &str, args: &str) -> AR {
            match action {
                "add" => {
                    let values: Vec<i64> = serde_json::from_str(args).unwrap_or_default();
                    AR::ok(values.iter().sum::<i64>().to_string())
                }
                "greet" => {
                    let values: Vec<String> = serde_json::from_str(args).unwrap_or_default();
                    AR::ok(format!("hello {}", values.first().cloned().unwrap_or_default()))
                }
                other => AR::unknown_action(other),
            }
        }
    }

    fn test_system() -> Arc<ActorSystem> {
        ActorSystem::new("test", SystemConfig::builder().with_pool_size(1).build().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn run_until_end_reaches_terminal_state_and_stores_result() {
        let system = test_system();
        system.actor_of("math", Math).unwrap();
        let doc = r#"
name: demo
transitions:
  - label: add
    states: { from: ["0"], to: ["end"] }
    actions:
      - actor: math
        method: add
        arguments: [5, 3]
"#;
        let workflow = Workflow::from_yaml(doc).unwrap();
        let interpreter = Interpreter::new(system.clone(), workflow, HashMap::new());
        let outcome = interpreter.run_until_end(10).await;
        assert!(outcome.success);
        assert_eq!(interpreter.current_state(), "end");

        let math = system.get("math").unwrap();
        assert_eq!(math.kv_state().get_string("result", ""), "8");
    }

    #[tokio::test]
    async fn step_at_terminal_state_reports_end() {
        let system = test_system();
        let workflow = Workflow::from_yaml("name: demo\ntransitions: []\ninitialState: end\n").unwrap();
        let interpreter = Interpreter::new(system, workflow, HashMap::new());
        let outcome = interpreter.step().await;
        assert!(!outcome.success);
        assert_eq!(outcome.result, "end");
    }

    #[tokio::test]
    async fn step_with_no_matching_transition_reports_end() {
        let system = test_system();
        let workflow = Workflow::from_yaml(
            r#"
name: demo
transitions:
  - label: only
    states: { from: ["1"], to: ["end"] }
"#,
        )
        .unwrap();
        let interpreter = Interpreter::new(system, workflow, HashMap::new());
        let outcome = interpreter.step().await;
        assert!(!outcome.success);
        assert_eq!(outcome.result, "end");
    }

    #[tokio::test]
    async fn missing_actor_aborts_step_with_diagnostic() {
        let system = test_system();
        let workflow = Workflow::from_yaml(
            r#"
name: demo
transitions:
  - label: t
    states: { from: ["0"], to: ["end"] }
    actions:
      - actor: nope
        method: whatever
        arguments: []
"#,
        )
        .unwrap();
        let interpreter = Interpreter::new(system, workflow, HashMap::new());
        let outcome = interpreter.step().await;
        assert!(!outcome.success);
        assert_eq!(outcome.result, "actor not found: nope");
    }

    #[tokio::test]
    async fn variable_expansion_reaches_action_arguments() {
        let system = test_system();
        system.actor_of("g", Math).unwrap();
        let workflow = Workflow::from_yaml(
            r#"
name: demo
transitions:
  - label: t
    states: { from: ["0"], to: ["end"] }
    actions:
      - actor: g
        method: greet
        arguments: "${name}"
"#,
        )
        .unwrap();
        let interpreter = Interpreter::new(system.clone(), workflow, HashMap::from([("name".to_string(), "Alice".to_string())]));
        let outcome = interpreter.run_until_end(10).await;
        assert!(outcome.success);
        let g = system.get("g").unwrap();
        assert_eq!(g.kv_state().get_string("result", ""), "hello Alice");
    }

    #[tokio::test]
    async fn run_until_end_bounds_non_terminating_workflow() {
        let system = test_system();
        let workflow = Workflow::from_yaml(
            r#"
name: loop
transitions:
  - label: spin
    states: { from: ["0"], to: ["0"] }
"#,
        )
        .unwrap();
        let interpreter = Interpreter::new(system, workflow, HashMap::new());
        let outcome = interpreter.run_until_end(5).await;
        assert!(!outcome.success);
        assert_eq!(outcome.result, "max iterations exceeded");
    }

    #[tokio::test]
    async fn reset_restores_initial_state_and_keeps_variables() {
        let system = test_system();
        system.actor_of("math", Math).unwrap();
        let workflow = Workflow::from_yaml(
            r#"
name: demo
transitions:
  - label: add
    states: { from: ["0"], to: ["end"] }
    actions:
      - actor: math
        method: add
        arguments: [1, 1]
"#,
        )
        .unwrap();
        let interpreter = Interpreter::new(system, workflow, HashMap::new());
        interpreter.set_variable("kept", "yes");
        interpreter.run_until_end(10).await;
        assert_eq!(interpreter.current_state(), "end");

        interpreter.reset();
        assert_eq!(interpreter.current_state(), "0");
        assert_eq!(interpreter.step_count(), 0);
        assert_eq!(interpreter.variables().get("kept"), Some(&"yes".to_string()));
    }

    struct MapLoader(HashMap<String, Workflow>);

    impl WorkflowLoader for MapLoader {
        fn load(&self, name: &str) -> Result<Workflow, String> {
            self.0.get(name).cloned().ok_or_else(|| format!("no such sub-workflow: {name}"))
        }
    }

    #[tokio::test]
    async fn call_action_re_enters_interpreter_on_sub_workflow() {
        let system = test_system();
        system.actor_of("math", Math).unwrap();

        let sub_doc = Workflow::from_yaml(
            r#"
name: child
transitions:
  - label: add
    states: { from: ["0"], to: ["end"] }
    actions:
      - actor: math
        method: add
        arguments: [2, 2]
"#,
        )
        .unwrap();
        let loader: Arc<dyn WorkflowLoader> =
            Arc::new(MapLoader(HashMap::from([("child".to_string(), sub_doc)])));

        let parent_doc = Workflow::from_yaml(
            r#"
name: parent
transitions:
  - label: invoke
    states: { from: ["0"], to: ["end"] }
    actions:
      - actor: math
        method: call
        arguments: { workflow: "child" }
"#,
        )
        .unwrap();
        let interpreter = Interpreter::with_loader(
            system.clone(),
            parent_doc,
            HashMap::new(),
            Some(loader),
            SubWorkflowMode::NonReusable,
        );
        let outcome = interpreter.run_until_end(10).await;
        assert!(outcome.success);

        let math = system.get("math").unwrap();
        assert_eq!(math.kv_state().get_string("result", ""), "end");
    }
}
