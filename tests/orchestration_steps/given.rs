//! Given steps for orchestration BDD scenarios.

use super::world::{OrchestrationWorld, run_async};
use baton::task::services::CreateTaskRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn description_for(title: &str) -> String {
    format!("{title} for the scenario")
}

#[given(r#"a task {title:string} has been created"#)]
fn task_created(world: &mut OrchestrationWorld, title: String) -> Result<(), eyre::Report> {
    let description = description_for(&title);
    run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(title, description)),
    )
    .wrap_err("create task in scenario setup")?;
    Ok(())
}

#[given(r#"a task "{title}" depending on "{dependency}" has been created"#)]
fn dependent_task_created(
    world: &mut OrchestrationWorld,
    title: String,
    dependency: String,
) -> Result<(), eyre::Report> {
    let description = description_for(&title);
    run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(title, description).with_dependencies([dependency])),
    )
    .wrap_err("create dependent task in scenario setup")?;
    Ok(())
}

#[given(r#"task "{task_id}" has been assigned to "{role}""#)]
fn task_assigned(
    world: &mut OrchestrationWorld,
    task_id: String,
    role: String,
) -> Result<(), eyre::Report> {
    run_async(world.service.assign_task(&task_id, &role))
        .wrap_err("assign task in scenario setup")?;
    Ok(())
}

#[given(r#"the active role has been switched to "{role}""#)]
fn role_switched(world: &mut OrchestrationWorld, role: String) -> Result<(), eyre::Report> {
    run_async(world.service.switch_role(&role, None)).wrap_err("switch role in scenario setup")?;
    Ok(())
}
