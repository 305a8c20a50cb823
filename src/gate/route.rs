use super::identifier::Identifier;
use std::fmt;
use std::sync::Mutex;

/// Navigation targets produced by the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    CreatePin(Identifier),
    EnterPin(Identifier),
    /// Protected area reached after a successful login.
    Events(Identifier),
    Error,
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::CreatePin(id) => format!("/set-pin/{id}"),
            Self::EnterPin(id) => format!("/enter-pin/{id}"),
            Self::Events(id) => format!("/events/{id}"),
            Self::Error => "/error".to_string(),
        }
    }

    /// Route kind without the identifier, for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatePin(_) => "set-pin",
            Self::EnterPin(_) => "enter-pin",
            Self::Events(_) => "events",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.path())
    }
}

/// Performs the page transition. Fire-and-forget.
pub trait Navigator {
    fn navigate(&self, route: &Route);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, route: &Route) {
        (**self).navigate(route);
    }
}

/// Keeps every route it is asked to navigate to, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route.clone());
        }
    }
}
