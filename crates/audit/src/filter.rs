//! Listing criteria for the audit trail.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use hrdesk_core::UserId;

use crate::AuditEntry;

/// Upper bound on a single listing.
pub const MAX_LIMIT: usize = 1000;

/// Resolved criteria handed to an [`AuditStore`](crate::AuditStore).
///
/// All bounds are inclusive. Results are ordered newest first and truncated
/// to `limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFilter {
    pub limit: usize,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub actor: Option<UserId>,
    pub action: Option<String>,
}

impl AuditFilter {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            from: None,
            to: None,
            actor: None,
            action: None,
        }
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if self.from.is_some_and(|from| entry.created_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| entry.created_at > to) {
            return false;
        }
        if self.actor.is_some() && entry.actor != self.actor {
            return false;
        }
        if let Some(action) = &self.action {
            if entry.action != *action {
                return false;
            }
        }
        true
    }
}

/// Caller-facing listing request, before defaults are applied.
///
/// Dates are calendar days in UTC: `from` starts at midnight, `to` runs to
/// the last instant of its day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub limit: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub actor: Option<UserId>,
    pub action: Option<String>,
}

impl AuditQuery {
    pub fn resolve(&self, default_limit: usize) -> AuditFilter {
        let limit = match self.limit {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(MAX_LIMIT),
            _ => default_limit,
        };

        AuditFilter {
            limit: limit.clamp(1, MAX_LIMIT),
            from: self.from.map(start_of_day),
            to: self.to.and_then(end_of_day),
            actor: self.actor,
            action: self.action.clone().filter(|a| !a.is_empty()),
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last instant of `date`; `None` for the last representable day, which
/// leaves the range open.
fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.succ_opt()
        .map(|next| start_of_day(next) - Duration::nanoseconds(1))
}
