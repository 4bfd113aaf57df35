use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::audit::{
    ACTION_ACCESS_APPROVED, ACTION_ACCESS_DENIED, ACTION_ACCESS_REQUEST, AuditLog,
};

/// An access request left unanswered for this long is reported as expired.
pub const REQUEST_TTL_SECONDS: i64 = 60 * 60;

pub const ACCESS_ACTIONS: [&str; 3] = [
    ACTION_ACCESS_REQUEST,
    ACTION_ACCESS_APPROVED,
    ACTION_ACCESS_DENIED,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    Approved,
    Pending,
    Denied,
    Expired,
}

/// Access state derived from the most recent access audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessDecision {
    pub status: AccessStatus,
    pub at: DateTime<Utc>,
    pub is_request: bool,
    pub detail: String,
}

pub fn is_access_action(action: &str) -> bool {
    ACCESS_ACTIONS.contains(&action)
}

pub fn request_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(REQUEST_TTL_SECONDS)
}

/// Interprets the latest access log entry; returns `None` for non-access actions.
pub fn decide(latest: &AuditLog, now: DateTime<Utc>) -> Option<AccessDecision> {
    let (status, is_request) = match latest.action.as_str() {
        ACTION_ACCESS_APPROVED => (AccessStatus::Approved, false),
        ACTION_ACCESS_DENIED => (AccessStatus::Denied, false),
        ACTION_ACCESS_REQUEST if latest.created_at < request_cutoff(now) => {
            (AccessStatus::Expired, true)
        }
        ACTION_ACCESS_REQUEST => (AccessStatus::Pending, true),
        _ => return None,
    };

    Some(AccessDecision {
        status,
        at: latest.created_at,
        is_request,
        detail: latest.detail.clone(),
    })
}

/// Keeps the newest access entry per user. Expects `logs` sorted newest first.
pub fn latest_by_user(logs: &[AuditLog]) -> HashMap<String, AuditLog> {
    let mut latest: HashMap<String, AuditLog> = HashMap::new();
    for log in logs.iter().filter(|log| is_access_action(&log.action)) {
        if let Some(user_id) = &log.user_id {
            latest.entry(user_id.clone()).or_insert_with(|| log.clone());
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_at(user_id: &str, action: &str, created_at: DateTime<Utc>) -> AuditLog {
        let mut log = AuditLog::new(Some(user_id.to_string()), action, "detail");
        log.created_at = created_at;
        log
    }

    #[test]
    fn request_older_than_ttl_is_expired() {
        let now = Utc::now();
        let fresh = log_at("u1", ACTION_ACCESS_REQUEST, now - Duration::minutes(10));
        let stale = log_at("u1", ACTION_ACCESS_REQUEST, now - Duration::minutes(61));

        assert_eq!(decide(&fresh, now).unwrap().status, AccessStatus::Pending);
        assert_eq!(decide(&stale, now).unwrap().status, AccessStatus::Expired);
    }

    #[test]
    fn approvals_and_denials_are_final() {
        let now = Utc::now();
        let old = now - Duration::days(3);
        assert_eq!(
            decide(&log_at("u1", ACTION_ACCESS_APPROVED, old), now).unwrap().status,
            AccessStatus::Approved
        );
        assert_eq!(
            decide(&log_at("u1", ACTION_ACCESS_DENIED, old), now).unwrap().status,
            AccessStatus::Denied
        );
        assert!(decide(&log_at("u1", "login", now), now).is_none());
    }

    #[test]
    fn latest_by_user_keeps_first_entry_and_skips_other_actions() {
        let now = Utc::now();
        let logs = vec![
            log_at("u1", "login", now),
            log_at("u1", ACTION_ACCESS_APPROVED, now - Duration::minutes(1)),
            log_at("u1", ACTION_ACCESS_REQUEST, now - Duration::minutes(5)),
            log_at("u2", ACTION_ACCESS_REQUEST, now - Duration::minutes(2)),
        ];

        let latest = latest_by_user(&logs);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest["u1"].action, ACTION_ACCESS_APPROVED);
        assert_eq!(latest["u2"].action, ACTION_ACCESS_REQUEST);
    }
}
