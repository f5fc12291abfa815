use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateSubjectTagRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLanguageRequest {
    pub language_name: String,
    pub language_name_in_native: Option<String>,
}
