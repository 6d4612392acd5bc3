//! Dependency graph domain logic.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::domain::manifest::Manifest;
use crate::domain::{AppError, Role};

/// "Must exist before" relation between manifest resources.
///
/// An entry `A -> {B}` means A depends on B: B is created before A and
/// deleted after A.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: BTreeMap<Role, BTreeSet<Role>>,
}

impl DependencyGraph {
    pub fn new(dependencies: BTreeMap<Role, BTreeSet<Role>>) -> Self {
        let mut graph = Self { dependencies };
        let targets: Vec<Role> = graph.dependencies.values().flatten().cloned().collect();
        for target in targets {
            graph.dependencies.entry(target).or_default();
        }
        graph
    }

    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self::new(
            manifest
                .resources
                .iter()
                .map(|spec| (spec.role.clone(), spec.dependencies()))
                .collect(),
        )
    }

    /// Direct dependencies of `role`.
    pub fn dependencies_of<'a>(&'a self, role: &Role) -> impl Iterator<Item = &'a Role> + use<'a> {
        self.dependencies.get(role).into_iter().flatten()
    }

    /// Direct dependents of `role`, in role order.
    pub fn dependents_of<'a>(&'a self, role: &Role) -> Vec<&'a Role> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| deps.contains(role))
            .map(|(dependent, _)| dependent)
            .collect()
    }

    /// Resolve creation order: dependencies first.
    ///
    /// Uses Kahn's algorithm over the whole graph, with lexicographic
    /// tie-breaking for deterministic output, then keeps only `selection`.
    pub fn creation_order(&self, selection: Option<&BTreeSet<Role>>) -> Result<Vec<Role>, AppError> {
        // Edge dep -> dependent; in-degree counts unresolved dependencies.
        let mut in_degree: BTreeMap<&Role, usize> =
            self.dependencies.iter().map(|(role, deps)| (role, deps.len())).collect();
        let mut dependents: BTreeMap<&Role, Vec<&Role>> =
            self.dependencies.keys().map(|role| (role, Vec::new())).collect();
        for (role, deps) in &self.dependencies {
            for dep in deps {
                if let Some(list) = dependents.get_mut(dep) {
                    list.push(role);
                }
            }
        }

        // BTreeMap iteration is sorted, so the initial queue is already ordered.
        let mut queue: VecDeque<&Role> =
            in_degree.iter().filter(|&(_, deg)| *deg == 0).map(|(role, _)| *role).collect();
        let mut order: Vec<Role> = Vec::with_capacity(self.dependencies.len());

        while let Some(current) = queue.pop_front() {
            order.push(current.clone());

            let mut next_batch = Vec::new();
            for dependent in dependents.get(current).into_iter().flatten() {
                if let Some(deg) = in_degree.get_mut(dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        next_batch.push(*dependent);
                    }
                }
            }

            // Sort for deterministic ordering
            next_batch.sort();
            queue.extend(next_batch);
        }

        if order.len() != self.dependencies.len() {
            return Err(AppError::CircularDependency(self.describe_cycle()));
        }

        Ok(match selection {
            Some(selected) => order.into_iter().filter(|role| selected.contains(role)).collect(),
            None => order,
        })
    }

    /// Resolve teardown order: dependents first. Exact reverse of creation order.
    pub fn teardown_order(&self, selection: Option<&BTreeSet<Role>>) -> Result<Vec<Role>, AppError> {
        let mut order = self.creation_order(selection)?;
        order.reverse();
        Ok(order)
    }

    /// Render one cycle as `a -> b -> a`.
    fn describe_cycle(&self) -> String {
        let mut done: BTreeSet<&Role> = BTreeSet::new();
        for start in self.dependencies.keys() {
            let mut path = Vec::new();
            if let Some(cycle) = self.walk(start, &mut path, &mut done) {
                return cycle;
            }
        }
        "unknown cycle".to_string()
    }

    fn walk<'a>(
        &'a self,
        role: &'a Role,
        path: &mut Vec<&'a Role>,
        done: &mut BTreeSet<&'a Role>,
    ) -> Option<String> {
        if let Some(pos) = path.iter().position(|r| *r == role) {
            let mut cycle: Vec<&str> = path[pos..].iter().map(|r| r.as_str()).collect();
            cycle.push(role.as_str());
            return Some(cycle.join(" -> "));
        }
        if done.contains(role) {
            return None;
        }

        path.push(role);
        for dep in self.dependencies_of(role) {
            if let Some(cycle) = self.walk(dep, path, done) {
                return Some(cycle);
            }
        }
        path.pop();
        done.insert(role);
        None
    }
}
