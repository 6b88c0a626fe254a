//! Hand-off of resolved binaries to a task graph.
//!
//! The model does not build anything. A [`BinaryConsumer`] receives every
//! binary once the binary container has been finalized, and turns it into
//! whatever its host needs. [`TaskPlan`] is the bundled consumer: it derives
//! the compile, link and lifecycle tasks of each binary.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::axis::Named;
use crate::core::binary::NativeBinary;

/// Receives finalized binaries.
pub trait BinaryConsumer {
    fn wire(&mut self, binary: &NativeBinary) -> Result<()>;
}

/// Kind of a planned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Compile,
    Link,
    /// Aggregates the other tasks of a binary.
    Lifecycle,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Compile => "compile",
            TaskKind::Link => "link",
            TaskKind::Lifecycle => "lifecycle",
        }
    }
}

/// A task derived from a binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTask {
    pub name: String,
    pub binary: String,
    pub kind: TaskKind,
    pub depends_on: Vec<String>,
}

/// Task graph plan for a set of binaries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPlan {
    tasks: Vec<PlannedTask>,
}

impl TaskPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[PlannedTask] {
        &self.tasks
    }

    pub fn get(&self, name: &str) -> Option<&PlannedTask> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Names of the lifecycle tasks, which an `assemble` task would depend on.
    pub fn assemble_dependencies(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| t.kind == TaskKind::Lifecycle)
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl BinaryConsumer for TaskPlan {
    fn wire(&mut self, binary: &NativeBinary) -> Result<()> {
        let name = binary.name();
        if self.get(name).is_some() {
            bail!("binary `{}` has already been wired", name);
        }

        let suffix = capitalize(name);
        let compile = format!("compile{}", suffix);
        let link = format!("link{}", suffix);

        self.tasks.push(PlannedTask {
            name: compile.clone(),
            binary: name.to_string(),
            kind: TaskKind::Compile,
            depends_on: Vec::new(),
        });
        self.tasks.push(PlannedTask {
            name: link.clone(),
            binary: name.to_string(),
            kind: TaskKind::Link,
            depends_on: vec![compile],
        });
        self.tasks.push(PlannedTask {
            name: name.to_string(),
            binary: name.to_string(),
            kind: TaskKind::Lifecycle,
            depends_on: vec![link],
        });
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
