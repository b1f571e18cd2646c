//! Deciding which component hosts a binding.

use crate::{GraphResolver, Violation};
use catalog::BindingIndex;
use declaration::{ComponentIndex, Key, Scope};
use tracing::debug;
use utility::HashSet;

impl GraphResolver<'_, '_> {
    /// The owner of a binding requested from the given component.
    ///
    /// The declarer is the component declaring an explicit binding or [`None`]
    /// for implicit bindings.
    pub(crate) fn owner(
        &mut self,
        requester: ComponentIndex,
        binding: BindingIndex,
        declarer: Option<ComponentIndex>,
    ) -> (ComponentIndex, Option<Violation>) {
        let scope = self.catalog.binding(binding).scope.clone();

        let (owner, violation) = match (declarer, scope) {
            (Some(declarer), Some(_)) => (declarer, None),
            (Some(declarer), None) => (self.float_target(requester, binding, declarer), None),
            (None, Some(scope)) => self.scoped_owner(requester, binding, scope),
            (None, None) => (self.implicit_owner(requester, binding), None),
        };

        debug!(
            binding = %self.catalog.binding(binding),
            owner = %self.session.model().component(owner).name,
            "decided owner"
        );

        (owner, violation)
    }

    /// The component an explicit unscoped binding floats down to.
    ///
    /// This is the deepest component below the declarer (in the lineage of the
    /// requester) that declares bindings for one of the transitive dependencies
    /// of the binding, provided the dependency is resolvable at the declarer.
    fn float_target(
        &mut self,
        requester: ComponentIndex,
        binding: BindingIndex,
        declarer: ComponentIndex,
    ) -> ComponentIndex {
        if requester == declarer {
            return declarer;
        }

        let model = self.session.model();
        let lineage = model.lineage(requester);
        let Some(position) = lineage.iter().position(|&component| component == declarer) else {
            return declarer;
        };
        let (above, below) = lineage.split_at(position + 1);

        let mut target = declarer;
        let mut target_depth = position;
        let mut visited = HashSet::default();
        let mut worklist: Vec<Key> = self
            .catalog
            .binding(binding)
            .dependencies
            .iter()
            .map(|dependency| dependency.key.clone())
            .collect();

        while let Some(key) = worklist.pop() {
            if !visited.insert(key.clone()) {
                continue;
            }

            let serving = self.serving_bindings(above, &key);
            if serving.is_empty() {
                continue;
            }

            for (offset, &component) in below.iter().enumerate() {
                let depth = position + 1 + offset;
                if depth > target_depth && self.catalog.declares(component, &key) {
                    target = component;
                    target_depth = depth;
                }
            }

            for serving in serving {
                let dependencies = &self.catalog.binding(serving).dependencies;
                worklist.extend(dependencies.iter().map(|dependency| dependency.key.clone()));

                // The contributions of aggregates are reached through their marked keys.
                if !key.is_contribution() && self.catalog.binding(serving).is_contribution() {
                    worklist.push(self.catalog.binding(serving).key.clone());
                }
            }
        }

        if target != declarer {
            debug!(
                from = %model.component(declarer).name,
                to = %model.component(target).name,
                "binding floats"
            );
        }

        target
    }

    /// The bindings serving a key in the given (upper) part of a lineage.
    fn serving_bindings(&mut self, lineage: &[ComponentIndex], key: &Key) -> Vec<BindingIndex> {
        let mut serving = Vec::new();

        for &component in lineage {
            serving.extend_from_slice(self.catalog.explicit(component, key));
            if !key.is_contribution() {
                serving.extend_from_slice(self.catalog.contributions(component, key));
                serving.extend_from_slice(self.catalog.declarations(component, key));
            }
        }

        if serving.is_empty()
            && let Some(binding) = self.catalog.implicit_binding(key)
        {
            serving.push(binding);
        }

        serving
    }

    /// The owner of a scoped implicit binding.
    ///
    /// If a direct dependency cannot be satisfied at the component with the scope
    /// but at the requester, the binding is hosted at the requester and the
    /// violation is recorded.
    fn scoped_owner(
        &mut self,
        requester: ComponentIndex,
        binding: BindingIndex,
        scope: Scope,
    ) -> (ComponentIndex, Option<Violation>) {
        let model = self.session.model();
        let scope_owner = model
            .lineage(requester)
            .into_iter()
            .rev()
            .find(|&component| model.component(component).is_scoped_with(&scope))
            .unwrap_or(requester);

        if scope_owner == requester {
            return (requester, None);
        }

        let dependencies = self.catalog.binding(binding).dependencies.clone();

        for dependency in dependencies {
            self.resolve(scope_owner, &dependency.key);
            if !self
                .resolution(scope_owner, &dependency.key)
                .is_some_and(|resolution| resolution.is_missing())
            {
                continue;
            }

            self.resolve(requester, &dependency.key);
            if self
                .resolution(requester, &dependency.key)
                .is_some_and(|resolution| !resolution.is_missing())
            {
                debug!(
                    %scope,
                    dependency = %dependency.key,
                    "scoped binding hosted by the requester"
                );
                return (requester, Some((scope, scope_owner, dependency)));
            }
        }

        (scope_owner, None)
    }

    /// The owner of an unscoped implicit binding: the deepest owner among its dependencies.
    fn implicit_owner(
        &mut self,
        requester: ComponentIndex,
        binding: BindingIndex,
    ) -> ComponentIndex {
        let model = self.session.model();
        let mut owner = model.root(requester);
        let mut owner_depth = 0;

        let dependencies = self.catalog.binding(binding).dependencies.clone();

        for dependency in dependencies {
            let Some(node) = self.resolve(requester, &dependency.key) else {
                continue;
            };

            if self
                .resolution(requester, &dependency.key)
                .is_some_and(|resolution| resolution.is_missing())
            {
                return requester;
            }

            let dependency_owner = self.nodes[node].owner;
            let depth = model.depth(dependency_owner);
            if depth > owner_depth {
                owner = dependency_owner;
                owner_depth = depth;
            }
        }

        owner
    }
}
