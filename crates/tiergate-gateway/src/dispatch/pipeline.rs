//! Prefixed message => `Outcome`.
//!
//! One message runs: parse, load + normalize (persisting upgrades), dispatch
//! on the loaded registry, persist when a service changed it, then attach the
//! audit event and the deletion of the invoking message.

use std::time::Instant;

use tiergate_core::{Result, TierError, TierRegistry};
use tracing::Instrument;

use crate::app_state::AppState;
use crate::context::{CommandCtx, MessageEvent};
use crate::transport::codec::{decode, ParsedCommand};

use super::outcome::{AuditEvent, Outcome, PlatformAction};

pub async fn handle_message(app: &AppState, event: &MessageEvent) -> Result<Outcome> {
    if event.author.bot {
        return Ok(Outcome::default());
    }
    let Some(space_id) = event.space_id.as_deref() else {
        return Ok(Outcome::default());
    };
    let prefix = app.prefix().get();
    let Some(cmd) = decode(&event.content, &prefix) else {
        return Ok(Outcome::default());
    };

    let span = tracing::info_span!("command", space_id, command = %cmd.name, actor = %event.author.id);
    run(app, event, space_id, &prefix, &cmd).instrument(span).await
}

async fn run(
    app: &AppState,
    event: &MessageEvent,
    space_id: &str,
    prefix: &str,
    cmd: &ParsedCommand,
) -> Result<Outcome> {
    let started = Instant::now();
    let record = app
        .store()
        .load(space_id)
        .await
        .map_err(|e| store_failure(app, "load", e))?;
    let (mut registry, migrated) = TierRegistry::load(record);
    if migrated {
        app.metrics().migrations.inc(&[]);
        tracing::info!("upgraded stored config");
        persist(app, space_id, &registry).await?;
    }

    let log_channel = registry.log_channel().map(str::to_string);
    let ttl = app.reply_ttl_ms();

    let mut ctx = CommandCtx::new(space_id, event, prefix, &mut registry, ttl);
    let mut outcome = match app.dispatcher().dispatch(&mut ctx, cmd) {
        None => Outcome::default(),
        Some(Ok(outcome)) => outcome,
        Some(Err(err)) => {
            app.metrics().denials.inc(&[("code", err.code().as_str())]);
            tracing::warn!(code = err.code().as_str(), error = %err, "command denied");
            Outcome::reply(ctx.deny(&err))
        }
    };
    let dirty = ctx.is_dirty();
    let audit = ctx.take_audit();
    drop(ctx);

    if dirty {
        persist(app, space_id, &registry).await?;
    }

    outcome.audit = match (log_channel, audit) {
        (Some(log_channel_id), Some(entry)) => Some(AuditEvent { log_channel_id, entry }),
        _ => None,
    };
    outcome.actions.insert(
        0,
        PlatformAction::DeleteMessage {
            channel_id: event.channel_id.clone(),
            message_id: event.message_id.clone(),
        },
    );

    if app.dispatcher().knows(&cmd.name) {
        let labels = [("command", cmd.name.as_str())];
        app.metrics().commands.inc(&labels);
        app.metrics().dispatch_duration.observe(&labels, started.elapsed());
    }
    Ok(outcome)
}

async fn persist(app: &AppState, space_id: &str, registry: &TierRegistry) -> Result<()> {
    app.store()
        .save(space_id, registry.record())
        .await
        .map_err(|e| store_failure(app, "save", e))
}

fn store_failure(app: &AppState, op: &'static str, err: TierError) -> TierError {
    app.metrics().store_errors.inc(&[("op", op)]);
    tracing::warn!(op, error = %err, "config store failure");
    err
}
