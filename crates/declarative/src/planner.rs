//! Execution planner - ordered resource plans

use crate::resource::{BoxedResource, Resource};

/// An ordered execution plan
///
/// Resources are applied strictly in the order they were added.
/// Privileged and unprivileged resources are not batched separately
/// because a task's steps depend on each other.
#[derive(Debug, Default)]
pub struct ExecutionPlan {
    steps: Vec<BoxedResource>,
}

impl ExecutionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource to the end of the plan
    pub fn push(&mut self, resource: impl Resource + 'static) {
        self.steps.push(Box::new(resource));
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, resource: impl Resource + 'static) -> Self {
        self.push(resource);
        self
    }

    pub fn steps(&self) -> &[BoxedResource] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps that run privileged commands
    pub fn privileged_count(&self) -> usize {
        use crate::resource::ResourceExt;

        self.steps.iter().filter(|r| r.requires_sudo()).count()
    }
}

impl IntoIterator for ExecutionPlan {
    type Item = BoxedResource;
    type IntoIter = std::vec::IntoIter<BoxedResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}
