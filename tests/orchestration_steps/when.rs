//! When steps for orchestration BDD scenarios.

use super::world::{OrchestrationWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"the orchestrator assigns "{task_id}" to "{role}""#)]
fn orchestrator_assigns(world: &mut OrchestrationWorld, task_id: String, role: String) {
    let result = run_async(world.service.assign_task(&task_id, &role));
    world.record(result);
}

#[when(r#"the active role switches to "{role}""#)]
fn active_role_switches(world: &mut OrchestrationWorld, role: String) {
    let result = run_async(world.service.switch_role(&role, None));
    world.record(result);
}

#[when(r#"the active role completes "{task_id}" with notes "{notes}""#)]
fn active_role_completes(world: &mut OrchestrationWorld, task_id: String, notes: String) {
    let result = run_async(world.service.complete_task(&task_id, Some(&notes)));
    world.record(result);
}

#[when("the active role returns control to the orchestrator")]
fn active_role_returns(world: &mut OrchestrationWorld) {
    let result = run_async(world.service.return_to_orchestrator(None));
    world.record(result);
}
