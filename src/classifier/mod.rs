//! Filename-keyword issue classifier.
//!
//! This is a heuristic placeholder standing in for a computer-vision model:
//! the uploaded photo is never decoded, only its filename is inspected
//! against a fixed, ordered keyword table. Callers go through the
//! [`IssueClassifier`] trait so a real model can be substituted without
//! touching any handler.

use serde::{Deserialize, Serialize};

use crate::tickets::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AsphaltDeterioration,
    WasteAccumulation,
    StreetlightFailure,
    WaterMainRupture,
    TrafficCongestion,
    Unclassified,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AsphaltDeterioration => "Major Asphalt Deterioration",
            Self::WasteAccumulation => "Illegal Waste Accumulation",
            Self::StreetlightFailure => "Streetlight Infrastructure Failure",
            Self::WaterMainRupture => "Potable Water Main Rupture",
            Self::TrafficCongestion => "High Density Congestion",
            Self::Unclassified => "Unclassified Civic Anomaly",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of classifying one upload: category, severity bucket and a
/// human-readable assessment line. Assigned once at ticket creation and
/// never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub priority: Priority,
    pub reason: String,
}

pub trait IssueClassifier: Send + Sync {
    fn classify(&self, filename: &str) -> Classification;
}

struct Rule {
    keywords: &'static [&'static str],
    category: Category,
    priority: Priority,
    reason: &'static str,
}

/// Ordered rule table; the first matching entry wins, so a filename
/// containing both "pothole" and "traffic" classifies as a pothole.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["pothole"],
        category: Category::AsphaltDeterioration,
        priority: Priority::High,
        reason: "Severity Level 4 crater; exposed aggregate base. Immediate risk to 2-wheelers.",
    },
    Rule {
        keywords: &["garbage", "dump"],
        category: Category::WasteAccumulation,
        priority: Priority::Medium,
        reason: "Mixed solid waste pile (>50kg). vector breeding risk. Requires sanitation crew.",
    },
    Rule {
        keywords: &["light", "pole"],
        category: Category::StreetlightFailure,
        priority: Priority::Medium,
        reason: "Pole #RV-402 luminaire broken. Electrical safety hazard & reduced visibility.",
    },
    Rule {
        keywords: &["pipe", "water"],
        category: Category::WaterMainRupture,
        priority: Priority::High,
        reason: "Significant treated water loss on main supply line. Risk of road undercut erosion.",
    },
    Rule {
        keywords: &["traffic"],
        category: Category::TrafficCongestion,
        priority: Priority::Low,
        reason: "V/C Ratio > 1.2 at junction. Signal cycle optimization recommended.",
    },
];

const DEFAULT_REASON: &str = "Non-critical issue detected. Queued for manual inspection.";

/// Keyword matcher over the fixed rule table. Pure and deterministic.
#[derive(Debug, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl IssueClassifier for KeywordClassifier {
    fn classify(&self, filename: &str) -> Classification {
        let name = filename.to_lowercase();
        for rule in RULES {
            if rule.keywords.iter().any(|kw| name.contains(kw)) {
                return Classification {
                    category: rule.category,
                    priority: rule.priority,
                    reason: rule.reason.to_string(),
                };
            }
        }
        Classification {
            category: Category::Unclassified,
            priority: Priority::Low,
            reason: DEFAULT_REASON.to_string(),
        }
    }
}
