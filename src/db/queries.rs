use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Feedback, FeedbackCategory, Flow, FlowData, FlowStage, NewFeedback};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now_str() -> String {
    Utc::now().naive_utc().format(TS_FORMAT).to_string()
}

fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TS_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Flows ──

pub fn get_flow(conn: &Connection, token: &str) -> anyhow::Result<Option<Flow>> {
    let row = conn
        .query_row(
            "SELECT token, stage, data, last_activity, expires_at FROM flows WHERE token = ?1 AND expires_at > ?2",
            params![token, now_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((token, stage, data_json, last_activity, expires_at)) = row else {
        return Ok(None);
    };

    let data: FlowData = match serde_json::from_str(&data_json) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(token = %token, error = %e, "discarding unreadable flow data");
            FlowData::default()
        }
    };

    Ok(Some(Flow {
        token,
        stage: FlowStage::parse(&stage),
        data,
        last_activity: parse_ts(&last_activity),
        expires_at: parse_ts(&expires_at),
        stored_stage: Some(FlowStage::parse(&stage)),
    }))
}

/// Inserts a new flow, or updates one that is still in the stage it was
/// loaded in. Returns false when the stored stage moved on in the meantime,
/// in which case nothing is written.
pub fn save_flow(conn: &Connection, flow: &Flow) -> anyhow::Result<bool> {
    let data_json = serde_json::to_string(&flow.data)?;
    let last_activity = flow.last_activity.format(TS_FORMAT).to_string();
    let expires_at = flow.expires_at.format(TS_FORMAT).to_string();

    let written = match flow.stored_stage {
        None => conn.execute(
            "INSERT INTO flows (token, stage, data, last_activity, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![flow.token, flow.stage.as_str(), data_json, last_activity, expires_at],
        )?,
        Some(expected) => conn.execute(
            "UPDATE flows SET stage = ?2, data = ?3, last_activity = ?4, expires_at = ?5
             WHERE token = ?1 AND stage = ?6",
            params![
                flow.token,
                flow.stage.as_str(),
                data_json,
                last_activity,
                expires_at,
                expected.as_str()
            ],
        )?,
    };
    Ok(written == 1)
}

/// Moves a flow from `from` to `to` only if it is still in `from`.
/// Returns false when another request got there first.
pub fn transition_stage(
    conn: &Connection,
    token: &str,
    from: FlowStage,
    to: FlowStage,
) -> anyhow::Result<bool> {
    let updated = conn.execute(
        "UPDATE flows SET stage = ?1, last_activity = ?2
         WHERE token = ?3 AND stage = ?4 AND expires_at > ?2",
        params![to.as_str(), now_str(), token, from.as_str()],
    )?;
    Ok(updated == 1)
}

pub fn expire_old_flows(conn: &Connection) -> anyhow::Result<usize> {
    let count = conn.execute("DELETE FROM flows WHERE expires_at <= ?1", params![now_str()])?;
    Ok(count)
}

pub fn count_active_flows(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM flows WHERE expires_at > ?1",
        params![now_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Feedback ──

pub fn insert_feedback(conn: &Connection, entry: &NewFeedback) -> anyhow::Result<Feedback> {
    let created_at = now_str();
    conn.execute(
        "INSERT INTO feedback (name, email, message, category, rating, anonymous, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.name,
            entry.email,
            entry.message,
            entry.category.as_str(),
            entry.rating,
            entry.anonymous,
            created_at,
        ],
    )?;

    Ok(Feedback {
        id: conn.last_insert_rowid(),
        name: entry.name.clone(),
        email: entry.email.clone(),
        message: entry.message.clone(),
        category: entry.category,
        rating: entry.rating,
        anonymous: entry.anonymous,
        created_at,
    })
}

pub fn list_feedback(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Feedback>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, message, category, rating, anonymous, created_at
         FROM feedback ORDER BY id DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        let category: String = row.get(4)?;
        Ok(Feedback {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            message: row.get(3)?,
            category: FeedbackCategory::parse(&category),
            rating: row.get(5)?,
            anonymous: row.get(6)?,
            created_at: row.get(7)?,
        })
    })?;

    let mut entries = vec![];
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

pub fn delete_feedback(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let deleted = conn.execute("DELETE FROM feedback WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn count_feedback(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
    Ok(count)
}
