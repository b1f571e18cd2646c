//! Checks of the input contract of the declaration model.

use crate::{
    DeclarationModel, ModuleIndex,
    model::{Declaration, DeclarationKind, Installation},
};
use diagnostics::{Diagnostic, ErrorCode, Listing, Reporter, error::Health};
use index_map::Index as _;
use utility::{HashSet, Str, cycle::find_cycles, pluralize};

impl DeclarationModel {
    /// Check that the model is well-formed.
    ///
    /// Every violation is reported as an invalid declaration. Unlike graph errors,
    /// those make any further analysis meaningless.
    pub fn validate(&self, reporter: &Reporter) -> diagnostics::error::Result {
        let mut health = Health::Untainted;

        for (index, component) in &self.components {
            if let Some(parent) = component.parent
                && (parent.value() >= index.value() || !self.components.contains(parent))
            {
                health.absorb(
                    invalid_declaration(component.name.clone(), component.source.clone())
                        .message(format!(
                            "the parent of component {} is not a previously declared component",
                            component.name
                        ))
                        .report(reporter),
                );
            }

            for installation in &component.modules {
                health.absorb(self.check_installation(
                    installation,
                    &component.name,
                    &component.source,
                    reporter,
                ));
            }

            for declaration in component
                .bound_instances
                .iter()
                .chain(component.dependencies.iter().flat_map(|dependency| &dependency.provisions))
            {
                if declaration.key.is_contribution() || !declaration.dependencies.is_empty() {
                    health.absorb(
                        invalid_declaration(component.name.clone(), declaration.source.clone())
                            .message(format!(
                                "{}.{} may neither contribute to a multibinding \
                                 nor have dependencies",
                                component.name, declaration.member
                            ))
                            .report(reporter),
                    );
                }
            }
        }

        for module in self.modules.values() {
            for installation in &module.includes {
                health.absorb(self.check_installation(
                    installation,
                    &module.name,
                    &module.source,
                    reporter,
                ));
            }

            for declaration in &module.declarations {
                health.absorb(check_declaration(declaration, &module.name, reporter));
            }

            for &subcomponent in &module.subcomponents {
                let message = match self.components.get(subcomponent) {
                    None => format!("{} lists an unknown subcomponent", module.name),
                    Some(component) if component.creator.is_none() => format!(
                        "{} lists {} as a subcomponent but it does not declare a creator",
                        module.name, component.name
                    ),
                    Some(_) => continue,
                };

                health.absorb(
                    invalid_declaration(module.name.clone(), module.source.clone())
                        .message(message)
                        .report(reporter),
                );
            }
        }

        health.absorb(self.check_inclusion_cycles(reporter));

        let mut reported_paths = HashSet::default();
        for injectable in self.injectables.values() {
            let path = injectable.ty.to_string();

            if injectable.constructors.len() > 1 {
                health.absorb(
                    invalid_declaration(path.clone(), injectable.source.clone())
                        .message(format!(
                            "{path} has {} injectable constructors but at most one is allowed",
                            injectable.constructors.len()
                        ))
                        .report(reporter),
                );
            }

            let duplicated = injectable
                .ty
                .path()
                .and_then(|path| self.injectables_by_path.get(path))
                .is_some_and(|indices| indices.len() > 1);

            if duplicated && reported_paths.insert(path.clone()) {
                health.absorb(
                    invalid_declaration(path.clone(), injectable.source.clone())
                        .message(format!("{path} is declared injectable more than once"))
                        .report(reporter),
                );
            }
        }

        health.into()
    }

    fn check_installation(
        &self,
        installation: &Installation,
        owner: &Str,
        source: &Str,
        reporter: &Reporter,
    ) -> Health {
        let Some(module) = self.modules.get(installation.module) else {
            return invalid_declaration(owner.clone(), source.clone())
                .message(format!("{owner} installs an unknown module"))
                .report(reporter);
        };

        let expected = module.parameters.len();
        let actual = installation.arguments.len();

        if expected != actual {
            return invalid_declaration(owner.clone(), source.clone())
                .message(format!(
                    "{} expects {expected} type {} but {owner} supplies {actual}",
                    module.name,
                    pluralize!(expected, "argument"),
                ))
                .report(reporter);
        }

        Health::Untainted
    }

    fn check_inclusion_cycles(&self, reporter: &Reporter) -> Health {
        let includes = |module: ModuleIndex| {
            self.modules
                .get(module)
                .into_iter()
                .flat_map(|module| &module.includes)
                .map(|installation| installation.module)
                .filter(|&module| self.modules.contains(module))
        };

        let mut health = Health::Untainted;

        for cycle in find_cycles(self.modules.indices(), includes) {
            let Some(&first) = cycle.first() else {
                continue;
            };
            let module = &self.modules[first];

            health.absorb(
                invalid_declaration(module.name.clone(), module.source.clone())
                    .message(format!("{} includes itself", module.name))
                    .listing(
                        Listing::new(cycle.iter().chain([&first]).map(|&module| {
                            self.modules[module].name.clone()
                        }))
                        .heading("Inclusion chain:"),
                    )
                    .report(reporter),
            );
        }

        health
    }
}

fn check_declaration(declaration: &Declaration, module: &Str, reporter: &Reporter) -> Health {
    let signature = format!("{module}.{}", declaration.member);

    let message = match declaration.kind {
        DeclarationKind::Provides => return Health::Untainted,
        DeclarationKind::Binds => {
            let count = declaration.dependencies.len();
            if count == 1 {
                return Health::Untainted;
            }
            format!(
                "the delegation {signature} has {count} {} but has to have exactly one",
                pluralize!(count, "dependency", "dependencies")
            )
        }
        DeclarationKind::Multibinds(_) => {
            if !declaration.dependencies.is_empty() {
                format!("the multibinding declaration {signature} may not have dependencies")
            } else if declaration.scope.is_some() {
                format!("the multibinding declaration {signature} may not be scoped")
            } else if declaration.key.is_contribution() {
                format!(
                    "the multibinding declaration {signature} may not contribute to a multibinding"
                )
            } else {
                return Health::Untainted;
            }
        }
    };

    invalid_declaration(module.clone(), declaration.source.clone())
        .message(message)
        .report(reporter)
}

fn invalid_declaration(owner: impl Into<Str>, source: impl Into<Str>) -> Diagnostic {
    Diagnostic::error()
        .code(ErrorCode::E000)
        .anchor(owner, source)
}
