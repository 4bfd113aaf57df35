use serde::{Deserialize, Serialize};

use crate::domain::models::profile::{InstructorProfile, StudentProfile};

/// Student profile as submitted by and returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfileDto {
    pub student_id_number: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: String,
    pub program_degree: String,
    pub year_level: String,
    #[serde(default)]
    pub section_class: Option<String>,
    pub status: String,
    pub target_licensure: String,
    #[serde(default)]
    pub let_track: Option<String>,
    #[serde(default)]
    pub major_specialization: String,
    #[serde(default)]
    pub assigned_review_subjects: Vec<String>,
    pub required_passing_threshold: u32,
}

impl From<StudentProfile> for StudentProfileDto {
    fn from(profile: StudentProfile) -> Self {
        Self {
            student_id_number: profile.student_id_number,
            first_name: profile.first_name,
            middle_name: profile.middle_name,
            last_name: profile.last_name,
            email_address: profile.email_address,
            username: profile.username,
            program_degree: profile.program_degree,
            year_level: profile.year_level,
            section_class: profile.section_class,
            status: profile.status,
            target_licensure: profile.target_licensure.to_string(),
            let_track: profile.let_track.map(|track| track.as_str().to_string()),
            major_specialization: profile.major_specialization,
            assigned_review_subjects: profile.assigned_review_subjects,
            required_passing_threshold: profile.required_passing_threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorProfileDto {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub program: String,
}

impl From<InstructorProfile> for InstructorProfileDto {
    fn from(profile: InstructorProfile) -> Self {
        Self {
            employee_id: profile.employee_id,
            name: profile.name,
            department: profile.department,
            position: profile.position,
            program: profile.program,
        }
    }
}
