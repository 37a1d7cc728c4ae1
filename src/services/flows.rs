use chrono::{Duration, Utc};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Flow, FlowData, FlowStage};
use crate::state::AppState;

pub fn new_flow(ttl_minutes: i64) -> Flow {
    let now = Utc::now().naive_utc();
    Flow {
        token: uuid::Uuid::new_v4().to_string(),
        stage: FlowStage::Draft,
        data: FlowData::default(),
        last_activity: now,
        expires_at: now + Duration::minutes(ttl_minutes),
        stored_stage: None,
    }
}

pub fn load(state: &AppState, token: Option<&str>) -> Result<Option<Flow>, AppError> {
    let Some(token) = token else {
        return Ok(None);
    };
    let db = state.db()?;
    Ok(queries::get_flow(&db, token)?)
}

/// Loads the caller's flow, or starts a new one. The flag is true when the
/// flow was just created and the cookie needs setting.
pub fn load_or_create(state: &AppState, token: Option<&str>) -> Result<(Flow, bool), AppError> {
    match load(state, token)? {
        Some(flow) => Ok((flow, false)),
        None => {
            let mut flow = new_flow(state.config.flow_ttl_minutes);
            save(state, &mut flow)?;
            tracing::info!(token = %flow.token, "started booking flow");
            Ok((flow, true))
        }
    }
}

/// Persists the flow and pushes its expiry out by the configured TTL.
/// Fails with a conflict when the stored stage changed since `flow` was
/// loaded, so a stale copy never overwrites a newer stage.
pub fn save(state: &AppState, flow: &mut Flow) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    flow.last_activity = now;
    flow.expires_at = now + Duration::minutes(state.config.flow_ttl_minutes);

    let saved = {
        let db = state.db()?;
        queries::save_flow(&db, flow)?
    };
    if !saved {
        tracing::warn!(token = %flow.token, stage = flow.stage.as_str(), "discarded stale flow save");
        return Err(AppError::Conflict(
            "this booking changed in another window, please reload".to_string(),
        ));
    }
    flow.stored_stage = Some(flow.stage);
    Ok(())
}

pub fn transition(
    state: &AppState,
    token: &str,
    from: FlowStage,
    to: FlowStage,
) -> Result<bool, AppError> {
    let db = state.db()?;
    Ok(queries::transition_stage(&db, token, from, to)?)
}

pub fn prune_expired(state: &AppState) -> Result<usize, AppError> {
    let db = state.db()?;
    let removed = queries::expire_old_flows(&db)?;
    if removed > 0 {
        tracing::debug!(removed, "pruned expired flows");
    }
    Ok(removed)
}
