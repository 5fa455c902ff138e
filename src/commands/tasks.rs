use clap::{Args, CommandFactory};
use std::fmt::Write;

use crate::cli::Cli;

#[derive(Debug, Clone, Args)]
pub struct TasksCommand {}

impl TasksCommand {
    pub fn execute(self) {
        print!("{}", render_task_list());
    }
}

/// One line per registered task: name and description
pub fn render_task_list() -> String {
    let cmd = Cli::command();
    let tasks: Vec<(String, String)> = cmd
        .get_subcommands()
        .filter(|sub| !sub.is_hide_set())
        .map(|sub| {
            let about = sub.get_about().map(ToString::to_string).unwrap_or_default();
            (sub.get_name().to_string(), about)
        })
        .collect();

    let width = tasks.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::from("Available tasks:\n\n");
    for (name, about) in &tasks {
        let _ = writeln!(out, "  {name:<width$}  {about}");
    }
    let _ = writeln!(
        out,
        "\nRun `{} <task> --help` for the options of a task.",
        cmd.get_name()
    );
    out
}
