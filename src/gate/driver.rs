use super::{
    backend::Backend,
    buffer::Key,
    controller::{Effect, GateController, GateEvent, GateState},
    http::HttpClient,
    resolver::PinStatusResolver,
    route::Navigator,
    verifier::SessionVerifier,
};
use std::collections::VecDeque;
use tracing::info;

/// Runs a [`GateController`] against real collaborators.
///
/// Effects are executed one at a time, so at most one request is in flight.
/// Dropping a future returned by [`Gate::press`] cancels its HTTP request;
/// call [`Gate::leave`] afterwards so a late outcome cannot touch the gate.
pub struct Gate<C, N> {
    client: C,
    backend: Backend,
    navigator: N,
    controller: GateController,
}

impl<C: HttpClient, N: Navigator> Gate<C, N> {
    pub fn new(client: C, backend: Backend, navigator: N) -> Self {
        Self {
            client,
            backend,
            navigator,
            controller: GateController::new(),
        }
    }

    pub fn controller(&self) -> &GateController {
        &self.controller
    }

    pub fn state(&self) -> GateState {
        self.controller.state()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub async fn enter(&mut self, raw_identifier: Option<&str>) -> GateState {
        let effects = self.controller.enter(raw_identifier);
        self.run(effects).await
    }

    pub async fn press(&mut self, key: Key) -> GateState {
        let effects = self.controller.handle(GateEvent::Key(key));
        self.run(effects).await
    }

    pub fn leave(&mut self) {
        self.controller.leave();
    }

    async fn run(&mut self, effects: Vec<Effect>) -> GateState {
        let mut queue = VecDeque::from(effects);

        while let Some(effect) = queue.pop_front() {
            let event = match effect {
                Effect::Navigate(route) => {
                    info!(route = route.name(), "Navigating");
                    self.navigator.navigate(&route);
                    continue;
                }
                Effect::ResolveStatus(identifier) => {
                    let resolver = PinStatusResolver::new(&self.client, &self.backend);
                    GateEvent::StatusResolved(resolver.resolve(&identifier).await)
                }
                Effect::Verify {
                    ticket,
                    identifier,
                    code,
                } => {
                    let verifier = SessionVerifier::new(&self.client, &self.backend);
                    GateEvent::Verified {
                        ticket,
                        outcome: verifier.verify(&identifier, &code).await,
                    }
                }
            };

            queue.extend(self.controller.handle(event));
        }

        self.controller.state()
    }
}
