use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub amount: String,
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeStep {
    pub number: u32,
    pub title: String,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(default)]
    pub appliance: Option<String>,
}

/// The recipe as the model is instructed to emit it. Field names follow the
/// wire schema, so `servings` stays a string here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub name: String,
    pub description: String,
    pub kosher_notes: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub difficulty: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
    pub plating: String,
    pub chef_note: String,
}

#[derive(Debug)]
pub enum ValidationError {
    /// The text was not syntactically valid, or required fields were missing
    /// or mistyped.
    Malformed(String),
    /// Parsed fine but violates the record's structural invariants.
    Shape(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Malformed(msg) => write!(f, "not a valid recipe object: {}", msg),
            ValidationError::Shape(msg) => write!(f, "recipe structure is invalid: {}", msg),
        }
    }
}

impl Error for ValidationError {}

/// Strips a leading/trailing triple-backtick fence, tolerating an optional
/// language tag. Models sometimes ignore the no-markdown instruction, so both
/// fenced and unfenced input must come out the same.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // An optional language tag occupies the remainder of the fence line.
        text = match rest.find('\n') {
            Some(idx) if rest[..idx].chars().all(|c| c.is_ascii_alphanumeric()) => &rest[idx + 1..],
            _ => rest,
        };
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.strip_suffix('\n').unwrap_or(rest);
    }
    text.trim()
}

/// Parses raw model output into a `RecipeRecord`. All-or-nothing: a failure
/// never yields a partial recipe, and the caller decides whether to redo the
/// whole round trip.
pub fn validate_response(raw: &str) -> Result<RecipeRecord, ValidationError> {
    let text = strip_code_fences(raw);
    let recipe: RecipeRecord =
        serde_json::from_str(text).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    check_shape(&recipe)?;
    Ok(recipe)
}

fn check_shape(recipe: &RecipeRecord) -> Result<(), ValidationError> {
    if recipe.ingredients.is_empty() {
        return Err(ValidationError::Shape("ingredients list is empty".to_string()));
    }
    if recipe.steps.is_empty() {
        return Err(ValidationError::Shape("steps list is empty".to_string()));
    }
    for (idx, step) in recipe.steps.iter().enumerate() {
        let expected = idx as u32 + 1;
        if step.number != expected {
            return Err(ValidationError::Shape(format!(
                "step at position {} is numbered {}, expected {}",
                idx + 1,
                step.number,
                expected
            )));
        }
    }
    Ok(())
}

/// Best-effort check that step appliances stay inside the owned list. The
/// model is only instructed textually, so mismatches are flagged for the
/// caller rather than treated as a hard failure.
pub fn unlisted_appliances(recipe: &RecipeRecord, owned_appliances: &[String]) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for step in &recipe.steps {
        let appliance = match step.appliance.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => continue,
        };
        let listed = owned_appliances
            .iter()
            .any(|owned| owned.eq_ignore_ascii_case(appliance));
        if !listed && !unknown.iter().any(|u| u.eq_ignore_ascii_case(appliance)) {
            unknown.push(appliance.to_string());
        }
    }
    unknown
}
