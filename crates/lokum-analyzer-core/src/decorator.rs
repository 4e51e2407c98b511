//! The closed set of framework decorators and their validation rules.
//!
//! Each decorator is one variant of [`DecoratorKind`]; the rule for a
//! variant is a composition of the shared predicates in [`crate::checks`].
//! The registry is the immutable [`DecoratorKind::ALL`] value, passed
//! explicitly wherever resolution needs it.

use serde::Serialize;

use crate::ast::{ClassDecl, MethodDecl};
use crate::checks;
use crate::diagnostics::{Location, Violation};
use crate::model::DecoratorApplication;

/// One of the five framework decorators.
///
/// Variant order is the alphabetical decorator-name order; binding maps
/// and registry iteration follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DecoratorKind {
    /// `@AppContext` - application context marker (class-level role).
    AppContext,
    /// `@Configuration` - configuration class (class-level role).
    Configuration,
    /// `@Lokum` - entry point method marker.
    Lokum,
    /// `@Provide` - provider class (class-level role).
    Provide,
    /// `@Service` - service class (class-level role).
    Service,
}

/// Declaration kind a decorator may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorTarget {
    /// Class declarations.
    Class,
    /// Class methods.
    Method,
}

impl DecoratorKind {
    /// The full decorator registry, in name order.
    pub const ALL: [DecoratorKind; 5] = [
        DecoratorKind::AppContext,
        DecoratorKind::Configuration,
        DecoratorKind::Lokum,
        DecoratorKind::Provide,
        DecoratorKind::Service,
    ];

    /// Framework-defined decorator name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AppContext => "AppContext",
            Self::Configuration => "Configuration",
            Self::Lokum => "Lokum",
            Self::Provide => "Provide",
            Self::Service => "Service",
        }
    }

    /// Looks up a decorator by its framework-defined name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Declaration kind this decorator targets.
    #[must_use]
    pub fn target(self) -> DecoratorTarget {
        match self {
            Self::Lokum => DecoratorTarget::Method,
            _ => DecoratorTarget::Class,
        }
    }

    /// Whether the decorator belongs to the mutually-exclusive role family.
    #[must_use]
    pub fn is_role(self) -> bool {
        self.target() == DecoratorTarget::Class
    }

    /// Whether a class carrying this decorator supports `@Lokum` methods.
    #[must_use]
    pub fn satisfies_lokum(self) -> bool {
        matches!(self, Self::Service | Self::Configuration)
    }

    /// Validates this decorator's usage on a class declaration.
    ///
    /// `siblings` holds the applications already resolved for the same
    /// class, so duplication and exclusivity can be checked against them.
    ///
    /// # Errors
    ///
    /// Returns the first unmet rule as a [`Violation`].
    pub fn validate_class(
        self,
        class: &ClassDecl,
        siblings: &[DecoratorApplication],
        location: &Location,
    ) -> Result<(), Violation> {
        debug_assert!(self.is_role());
        checks::exported_class(self, class, location)?;
        checks::used_at_most_once(self, siblings, class, location)?;
        checks::used_exclusively(self, siblings, class, location)?;
        checks::not_abstract_class(self, class, location)?;
        checks::at_most_one_constructor(self, class, location)?;
        Ok(())
    }

    /// Validates this decorator's usage on a method declaration.
    ///
    /// `class_applications` holds the already-resolved class-level
    /// applications of the enclosing class.
    ///
    /// # Errors
    ///
    /// Returns the first unmet rule as a [`Violation`].
    pub fn validate_method(
        self,
        method: &MethodDecl,
        class: &ClassDecl,
        class_applications: &[DecoratorApplication],
        location: &Location,
    ) -> Result<(), Violation> {
        debug_assert!(self.target() == DecoratorTarget::Method);
        checks::not_abstract_method(self, method, class, location)?;
        checks::not_static_method(self, method, class, location)?;
        checks::not_generator_method(self, method, class, location)?;
        checks::enclosing_class_has_role(self, method, class, class_applications, location)?;
        Ok(())
    }
}

impl std::fmt::Display for DecoratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
