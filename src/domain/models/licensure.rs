use std::fmt;

use serde::{Deserialize, Serialize};

/// Majors accepted for the LET secondary track.
pub const LET_SECONDARY_MAJORS: [&str; 4] = ["Mathematics", "Filipino", "Social Studies", "English"];

/// Subject bucket used for LET general-education items that are really professional education.
pub const PROFESSIONAL_ED_BUCKET: &str = "Professional Ed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Licensure {
    #[serde(rename = "LET")]
    Let,
    #[serde(rename = "CPA")]
    Cpa,
    #[serde(rename = "Internal Certification")]
    InternalCertification,
}

/// Subjects a candidate may review for, and the score needed to pass.
#[derive(Debug, Clone, Copy)]
pub struct LicensureRule {
    pub subjects: &'static [&'static str],
    pub passing_threshold: u32,
}

impl Licensure {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LET" => Some(Licensure::Let),
            "CPA" => Some(Licensure::Cpa),
            "Internal Certification" => Some(Licensure::InternalCertification),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Licensure::Let => "LET",
            Licensure::Cpa => "CPA",
            Licensure::InternalCertification => "Internal Certification",
        }
    }

    pub fn rule(&self) -> LicensureRule {
        match self {
            Licensure::Let => LicensureRule {
                subjects: &["GenEd", "ProfEd", "Specialization"],
                passing_threshold: 75,
            },
            Licensure::Cpa => LicensureRule {
                subjects: &["FAR", "AFAR", "Auditing", "MAS", "RFBT", "Taxation"],
                passing_threshold: 75,
            },
            Licensure::InternalCertification => LicensureRule {
                subjects: &["Core", "Applied", "Practicum"],
                passing_threshold: 80,
            },
        }
    }

    /// Subjects allowed for this licensure, taking the LET track into account.
    pub fn allowed_subjects(&self, let_track: Option<LetTrack>) -> Vec<&'static str> {
        let subjects = self.rule().subjects.iter().copied();
        match (self, let_track) {
            (Licensure::Let, Some(LetTrack::Elementary)) => {
                subjects.filter(|subject| *subject != "Specialization").collect()
            }
            _ => subjects.collect(),
        }
    }
}

impl fmt::Display for Licensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetTrack {
    Elementary,
    Secondary,
}

impl LetTrack {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Elementary" => Some(LetTrack::Elementary),
            "Secondary" => Some(LetTrack::Secondary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetTrack::Elementary => "Elementary",
            LetTrack::Secondary => "Secondary",
        }
    }
}

/// Picks the performance bucket a question counts toward.
pub fn performance_bucket(licensure: &str, subject: &str, topic: &str) -> String {
    if licensure == Licensure::Let.as_str()
        && subject == "GenEd"
        && topic.trim().to_lowercase().starts_with("professional education")
    {
        return PROFESSIONAL_ED_BUCKET.to_string();
    }
    subject.to_string()
}
