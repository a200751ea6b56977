//! Workflow interpreter benchmarks
//!
//! Measures single-step and full-run drive cost against a real
//! [`flowrt::ActorSystem`]:
//! - one `Interpreter::step` (variable expansion + dispatch + advance)
//! - a full `Interpreter::run_until_end` over a short linear chain

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use flowrt::action::{ActionDispatch, ActionResult};
use flowrt::{ActorSystem, Interpreter, SystemConfig, Workflow};

struct Counter {
    value: i64,
}

impl ActionDispatch for Counter {
    fn call_by_action_name(&mut self, action: &str, _args: &str) -> ActionResult {
        match action {
            "increment" => {
                self.value += 1;
                ActionResult::ok(self.value.to_string())
            }
            other => ActionResult::unknown_action(other),
        }
    }
}

fn linear_chain_workflow(steps: usize) -> Workflow {
    let mut doc = String::from("name: bench\ntransitions:\n");
    for i in 0..steps {
        let to = if i + 1 == steps { "end".to_string() } else { (i + 1).to_string() };
        doc.push_str(&format!(
            "  - label: s{i}\n    states: {{ from: [\"{i}\"], to: [\"{to}\"] }}\n    actions:\n      - actor: counter\n        method: increment\n        arguments: {{}}\n",
        ));
    }
    Workflow::from_yaml(&doc).unwrap()
}

fn interpreter_single_step(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("interpreter_single_step", |b| {
        b.to_async(&rt).iter(|| async {
            let system = ActorSystem::new("bench", SystemConfig::default()).unwrap();
            system.actor_of("counter", Counter { value: 0 }).unwrap();
            let workflow = linear_chain_workflow(1);
            let interpreter = Interpreter::new(system, workflow, HashMap::new());
            black_box(interpreter.step().await)
        });
    });
}

fn interpreter_run_until_end(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("interpreter_run_until_end", |b| {
        b.to_async(&rt).iter(|| async {
            let system = ActorSystem::new("bench", SystemConfig::default()).unwrap();
            system.actor_of("counter", Counter { value: 0 }).unwrap();
            let workflow = linear_chain_workflow(20);
            let interpreter = Interpreter::new(system, workflow, HashMap::new());
            black_box(interpreter.run_until_end(100).await)
        });
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        interpreter_single_step,
        interpreter_run_until_end
}

criterion_main!(benches);
