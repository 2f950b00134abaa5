use multitest_core::RunPlan;

fn join(versions: &[String]) -> String {
    if versions.is_empty() {
        "none".to_string()
    } else {
        versions.join(", ")
    }
}

pub fn format_plan(plan: &RunPlan, skip_missing_versions: bool) -> String {
    let prerequisite = if plan.satisfies_prerequisite() {
        "satisfied"
    } else if skip_missing_versions {
        "skipped"
    } else {
        "failed"
    };

    let mut lines = vec![
        format!("Manager:      {}", plan.manager.display_name()),
        format!("Command:      {}", plan.script.command_line()),
        format!("Declared:     {}", join(&plan.declared)),
        format!("Runnable:     {}", join(&plan.runnable)),
        format!("Missing:      {}", join(&plan.missing_versions())),
        format!("Prerequisite: {prerequisite}"),
    ];

    // Mirrors the multi run, which sets the last runnable version aside
    if let Some((_, switched)) = plan.runnable.split_last().filter(|(_, rest)| !rest.is_empty()) {
        lines.push(format!("Switches:     {}", join(switched)));
    }

    lines.join("\n")
}

pub fn print_plan(plan: &RunPlan, skip_missing_versions: bool) {
    println!("{}", format_plan(plan, skip_missing_versions));
}
