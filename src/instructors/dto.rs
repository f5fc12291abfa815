use serde::Deserialize;

/// Writable subset of the instructor profile; stats and approval flags are
/// not accepted here.
#[derive(Debug, Deserialize)]
pub struct UpdateInstructorProfileRequest {
    pub designation: Option<String>,
    pub short_bio: Option<String>,
    pub full_bio: Option<String>,
    pub teaching_languages: Option<Vec<String>>,
    pub organization: Option<String>,
    pub years_of_experience: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_body_leaves_other_fields_unset() {
        let req: UpdateInstructorProfileRequest =
            serde_json::from_str(r#"{"designation":"Lecturer"}"#).unwrap();
        assert_eq!(req.designation.as_deref(), Some("Lecturer"));
        assert!(req.short_bio.is_none());
        assert!(req.teaching_languages.is_none());
    }
}
