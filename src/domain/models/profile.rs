use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::licensure::{LetTrack, Licensure};

/// Default passing mark used when a stored profile predates thresholds.
pub const DEFAULT_PASSING_THRESHOLD: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub user_id: String,
    pub student_id_number: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: String,
    pub program_degree: String,
    pub year_level: String,
    pub section_class: Option<String>,
    pub status: String,
    pub target_licensure: Licensure,
    pub let_track: Option<LetTrack>,
    pub major_specialization: String,
    #[serde(default)]
    pub assigned_review_subjects: Vec<String>,
    #[serde(default = "default_threshold")]
    pub required_passing_threshold: u32,
    pub updated_at: DateTime<Utc>,
}

fn default_threshold() -> u32 {
    DEFAULT_PASSING_THRESHOLD
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorProfile {
    pub user_id: String,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub program: String,
    pub updated_at: DateTime<Utc>,
}
