//! Navigation port.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Destinations a user action can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// The guided tour landing page.
    Home,
    /// The team/about page.
    About,
    /// The free-navigation star field.
    FreeNavigation,
    /// Detail view for a host star.
    Star {
        /// Host star identifier.
        host: String,
    },
    /// Detail view for a single exoplanet record.
    Exoplanet {
        /// Catalog record id.
        id: u32,
    },
}

impl Route {
    /// Returns the path for this route. Host names are not percent-encoded;
    /// that is the navigator's job.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::About => "/about".to_owned(),
            Self::FreeNavigation => "/hwo".to_owned(),
            Self::Star { host } => format!("/hwo/{host}"),
            Self::Exoplanet { id } => format!("/exoplanet/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Opaque side channel that performs route transitions.
pub trait Navigator {
    /// Navigates to `route`.
    fn navigate(&self, route: &Route);
}
