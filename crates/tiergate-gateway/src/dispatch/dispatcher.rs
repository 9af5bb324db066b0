use std::sync::Arc;

use dashmap::DashMap;

use tiergate_core::Result;

use crate::context::CommandCtx;
use crate::transport::codec::ParsedCommand;

use super::outcome::Outcome;

/// A family of prefixed commands.
///
/// Services are synchronous: they only read the event and mutate the loaded
/// registry. Loading and persisting happen in the pipeline around them.
pub trait CommandService: Send + Sync {
    /// Command names this service answers to (already lower-cased).
    fn commands(&self) -> &'static [&'static str];

    /// `Err` becomes a temporary denial reply carrying the error's code.
    fn handle(&self, ctx: &mut CommandCtx<'_>, cmd: &ParsedCommand) -> Result<Outcome>;
}

/// Command name -> service registry.
#[derive(Default)]
pub struct Dispatcher {
    services: DashMap<&'static str, Arc<dyn CommandService>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    pub fn register(&self, svc: Arc<dyn CommandService>) {
        for name in svc.commands() {
            if self.services.insert(name, Arc::clone(&svc)).is_some() {
                tracing::warn!(command = %name, "command registered twice; last one wins");
            }
        }
    }

    pub fn registered_commands(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = self.services.iter().map(|e| *e.key()).collect();
        out.sort_unstable();
        out
    }

    pub fn knows(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// `None` when no service answers to `cmd.name`.
    pub fn dispatch(&self, ctx: &mut CommandCtx<'_>, cmd: &ParsedCommand) -> Option<Result<Outcome>> {
        let handler = self.services.get(cmd.name.as_str())?.value().clone();
        Some(handler.handle(ctx, cmd))
    }
}
