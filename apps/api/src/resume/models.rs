use serde::{Deserialize, Deserializer, Serialize};

/// Structured resume data as requested from the LLM.
///
/// Every field is always present after parsing: scalars default to `None`,
/// lists to empty. Wire keys follow the extraction prompt exactly, including
/// its capitalised work-experience keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(rename = "Designation", default)]
    pub designation: Option<String>,
    #[serde(rename = "Company", default)]
    pub company: Option<String>,
    /// Free-form range, e.g. "Jul 2024 - Dec 2024".
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "Duration_years", default)]
    pub duration_years: Option<u32>,
    /// Months on top of `duration_years`.
    #[serde(rename = "Duration_months", default)]
    pub duration_months: Option<u32>,
    #[serde(rename = "Projects", default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

impl ResumeRecord {
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// Treats an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record_deserializes() {
        let json = r#"{
            "name": "Meghan Challa",
            "email": "meghan@email.com",
            "phone": "+91-1234567890",
            "skills": ["Python", "SQL"],
            "work_experience": [{
                "Designation": "Data Scientist",
                "Company": "Genpact",
                "Duration": "Jul 2024 - Dec 2024",
                "Duration_years": 0,
                "Duration_months": 6,
                "Projects": [{"Title": "HITL Pipeline", "Description": "Prompt tuning with feedback."}]
            }]
        }"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name.as_deref(), Some("Meghan Challa"));
        assert!(record.has_skill("SQL"));
        let job = &record.work_experience[0];
        assert_eq!(job.company.as_deref(), Some("Genpact"));
        assert_eq!(job.duration_years, Some(0));
        assert_eq!(job.duration_months, Some(6));
        assert_eq!(job.projects[0].title.as_deref(), Some("HITL Pipeline"));
    }

    #[test]
    fn test_missing_fields_default() {
        let record: ResumeRecord = serde_json::from_str(r#"{"name": "A", "skills": []}"#).unwrap();
        assert_eq!(record.name.as_deref(), Some("A"));
        assert!(record.email.is_none());
        assert!(record.skills.is_empty());
        assert!(record.work_experience.is_empty());
    }

    #[test]
    fn test_null_lists_become_empty() {
        let json = r#"{"skills": null, "work_experience": [{"Company": "X", "Projects": null}]}"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert!(record.skills.is_empty());
        assert!(record.work_experience[0].projects.is_empty());
        assert!(record.work_experience[0].designation.is_none());
    }

    #[test]
    fn test_wrong_types_fail() {
        assert!(serde_json::from_str::<ResumeRecord>(r#"{"skills": "Python"}"#).is_err());
        assert!(serde_json::from_str::<ResumeRecord>(
            r#"{"work_experience": [{"Duration_years": "two"}]}"#
        )
        .is_err());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let record: ResumeRecord =
            serde_json::from_str(r#"{"name": "A", "linkedin": "in/a"}"#).unwrap();
        assert_eq!(record.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_serialization_never_omits_fields() {
        let value = serde_json::to_value(ResumeRecord {
            work_experience: vec![WorkExperience::default()],
            ..Default::default()
        })
        .unwrap();
        assert!(value["name"].is_null());
        assert!(value["phone"].is_null());
        assert_eq!(value["skills"], serde_json::json!([]));
        let job = &value["work_experience"][0];
        for key in [
            "Designation",
            "Company",
            "Duration",
            "Duration_years",
            "Duration_months",
        ] {
            assert!(job.get(key).is_some(), "missing {key}");
        }
        assert_eq!(job["Projects"], serde_json::json!([]));
    }
}
