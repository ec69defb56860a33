//! Component inclusion rules
//!
//! Inclusion is a pure function of the requested names and each component's
//! declared status. Precedence, per component:
//!
//! 1. `planned` is always excluded, even when explicitly requested
//! 2. anything else is included when nothing was requested, when it was
//!    requested by name, or when it is `stable`
//! 3. everything else is excluded
//!
//! Unknown statuses follow rules 2 and 3 like any non-stable status and are
//! reported back to the caller as warnings.

use super::manifest::{ComponentDescriptor, ComponentStatus, TemplateDescriptor};
use std::collections::BTreeSet;
use std::fmt;

/// Why a component was left out of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    Planned,
    NotRequested,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Planned => write!(f, "planned, not yet implementable"),
            ExclusionReason::NotRequested => write!(f, "not requested and not stable"),
        }
    }
}

/// Outcome of resolving a template's components against a request
#[derive(Debug, Clone, Default)]
pub struct Resolution<'a> {
    pub included: Vec<&'a ComponentDescriptor>,
    pub excluded: Vec<(&'a ComponentDescriptor, ExclusionReason)>,
    /// Components whose status string was not recognized
    pub unknown_status: Vec<&'a ComponentDescriptor>,
}

impl Resolution<'_> {
    pub fn included_names(&self) -> Vec<String> {
        self.included.iter().map(|c| c.name.clone()).collect()
    }

    pub fn is_included(&self, name: &str) -> bool {
        self.included.iter().any(|c| c.name == name)
    }
}

/// Decide whether a single component takes part in the build
pub fn decide(
    component: &ComponentDescriptor,
    requested: &BTreeSet<String>,
) -> Result<(), ExclusionReason> {
    let explicitly_requested = requested.is_empty() || requested.contains(&component.name);

    match &component.status {
        ComponentStatus::Planned => Err(ExclusionReason::Planned),
        ComponentStatus::Stable => Ok(()),
        ComponentStatus::Experimental
        | ComponentStatus::Deprecated
        | ComponentStatus::Unknown(_) => {
            if explicitly_requested {
                Ok(())
            } else {
                Err(ExclusionReason::NotRequested)
            }
        }
    }
}

/// Resolve which of a template's components are included
///
/// Order of `included` and `excluded` follows the template's declaration order.
pub fn resolve<'a>(template: &'a TemplateDescriptor, requested: &BTreeSet<String>) -> Resolution<'a> {
    let mut resolution = Resolution::default();

    for component in &template.components {
        if component.status.is_unknown() {
            resolution.unknown_status.push(component);
        }

        match decide(component, requested) {
            Ok(()) => resolution.included.push(component),
            Err(reason) => resolution.excluded.push((component, reason)),
        }
    }

    resolution
}
