//! Dismiss every task the host currently shows.
//!
//! Dismissing a task can shrink the host's live lists, so the stack list is
//! copied before the walk and each stack's task list is copied when the stack
//! is reached.

use crate::{log_debug, Component};
use serde::Serialize;

/// A rendered task card the host can dismiss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TaskView {
    pub stack: u64,
    pub task: u64,
}

/// Host-owned task stacks, in the host's own order.
pub trait TaskStackSource: Send {
    fn stack_ids(&self) -> Vec<u64>;
    fn task_ids(&self, stack: u64) -> Vec<u64>;
    /// The visual element for `task`, if one is currently rendered.
    fn task_view(&self, stack: u64, task: u64) -> Option<TaskView>;
    fn dismiss(&mut self, view: TaskView);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DismissReport {
    pub dismissed: Vec<TaskView>,
    pub skipped: usize,
}

pub fn dismiss_all(source: &mut dyn TaskStackSource) -> DismissReport {
    let mut report = DismissReport::default();
    for stack in source.stack_ids() {
        for task in source.task_ids(stack) {
            match source.task_view(stack, task) {
                Some(view) => {
                    source.dismiss(view);
                    report.dismissed.push(view);
                }
                None => report.skipped += 1,
            }
        }
    }
    log_debug(
        Component::Dismiss,
        &format!(
            "{} dismissed, {} without a view",
            report.dismissed.len(),
            report.skipped
        ),
    );
    report
}

/// In-memory stacks. Dismissing removes the task from its live list.
#[derive(Debug, Default, Clone)]
pub struct StaticStacks {
    stacks: Vec<(u64, Vec<u64>)>,
    hidden: Vec<u64>,
}

impl StaticStacks {
    /// Build stacks with the given task counts; task ids run on across stacks from 1.
    pub fn with_counts(counts: &[usize]) -> Self {
        let mut next_task = 1;
        let stacks = counts
            .iter()
            .enumerate()
            .map(|(index, &count)| {
                let tasks = (next_task..next_task + count as u64).collect();
                next_task += count as u64;
                (index as u64, tasks)
            })
            .collect();
        Self {
            stacks,
            hidden: Vec::new(),
        }
    }

    /// Mark a task as having no rendered view.
    pub fn hide_task(&mut self, task: u64) {
        self.hidden.push(task);
    }

    pub fn remaining(&self) -> usize {
        self.stacks.iter().map(|(_, tasks)| tasks.len()).sum()
    }
}

impl TaskStackSource for StaticStacks {
    fn stack_ids(&self) -> Vec<u64> {
        self.stacks.iter().map(|(id, _)| *id).collect()
    }

    fn task_ids(&self, stack: u64) -> Vec<u64> {
        self.stacks
            .iter()
            .find(|(id, _)| *id == stack)
            .map(|(_, tasks)| tasks.clone())
            .unwrap_or_default()
    }

    fn task_view(&self, stack: u64, task: u64) -> Option<TaskView> {
        if self.hidden.contains(&task) {
            return None;
        }
        let known = self
            .stacks
            .iter()
            .any(|(id, tasks)| *id == stack && tasks.contains(&task));
        known.then_some(TaskView { stack, task })
    }

    fn dismiss(&mut self, view: TaskView) {
        if let Some((_, tasks)) = self.stacks.iter_mut().find(|(id, _)| *id == view.stack) {
            tasks.retain(|task| *task != view.task);
        }
    }
}
