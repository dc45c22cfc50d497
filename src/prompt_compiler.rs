use std::error::Error;
use std::fmt;

use crate::wizard::{DietaryCategory, WizardAnswers};

/// The two-part payload sent to the model: system-level instructions and the
/// user-level task. Both are pure functions of the compile inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPrompt {
    pub instructions: String,
    pub task: String,
}

#[derive(Debug)]
pub enum CompileError {
    NoAppliancesConfigured,
    InvalidAnswers(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::NoAppliancesConfigured => {
                write!(f, "No appliances configured. Please set up your kitchen first.")
            }
            CompileError::InvalidAnswers(msg) => write!(f, "Invalid recipe request: {}", msg),
        }
    }
}

impl Error for CompileError {}

impl DietaryCategory {
    /// The kosher rule paragraph embedded verbatim into the system prompt.
    pub fn rule_text(self) -> &'static str {
        match self {
            DietaryCategory::Meat => {
                "FLEISHIG (meat): Use only kosher-certified meat or poultry. No dairy of any kind — no butter, milk, cream, or cheese. No pork or shellfish ever."
            }
            DietaryCategory::Dairy => {
                "MILCHIG (dairy): May include dairy. No meat or poultry. No pork or shellfish ever."
            }
            DietaryCategory::Pareve => {
                "PAREVE (neutral): No meat, poultry, or dairy whatsoever. Fish (with fins and scales only) is permitted. This dish can be eaten with either a meat or dairy meal."
            }
        }
    }
}

/// Renders the system/user prompt pair for a finalized request.
///
/// Preconditions: at least one owned appliance, and answers that already
/// passed the wizard's gates. A violation of the latter means the caller
/// bypassed the state machine, so it is reported rather than papered over.
pub fn compile(
    answers: &WizardAnswers,
    owned_appliances: &[String],
) -> Result<CompiledPrompt, CompileError> {
    if owned_appliances.is_empty() {
        return Err(CompileError::NoAppliancesConfigured);
    }
    if answers.ingredients.trim().is_empty() {
        return Err(CompileError::InvalidAnswers(
            "ingredients must not be empty".to_string(),
        ));
    }
    if answers.servings == 0 {
        return Err(CompileError::InvalidAnswers(
            "servings must be positive".to_string(),
        ));
    }

    let instructions = format!(
        r#"You are a world-class Michelin-star chef who also deeply understands Jewish kosher dietary laws.
Your mission is to create elegant, impressive recipes that are:
1. Strictly Kosher - you never make mistakes on this
2. Achievable by a complete beginner home cook
3. Written with crystal-clear instructions that assume zero culinary knowledge

When you write steps, explain WHY each step matters (e.g. "We sear the meat first to lock in flavor and create a beautiful brown crust - this process is called the Maillard reaction").
Define any culinary terms immediately after using them.
Warn about common beginner mistakes before they happen.
Give visual/sensory cues so the cook knows when something is done (e.g. "The onions are ready when they are completely soft and translucent with golden edges").

KOSHER LAW TO FOLLOW: {rule}

Available kitchen appliances: {appliances}
You MUST only use these appliances in your recipe. If an appliance is not on this list, do not use it."#,
        rule = answers.dietary_category.rule_text(),
        appliances = owned_appliances.join(", "),
    );

    let plural = if answers.servings == 1 { "" } else { "s" };
    let task = format!(
        r#"Create a {meal} recipe for {servings} serving{plural} built around these ingredients: {ingredients}.
Kosher category: {category}
Scale every ingredient quantity to exactly {servings} serving{plural}.

Respond with ONLY a valid JSON object. No markdown, no explanation outside the JSON. Use this exact structure:

{{
  "name": "Recipe name",
  "description": "2-3 sentence description of the dish and why it is special",
  "kosherNotes": "Specific kosher considerations for this recipe (certifications to look for, substitutions, etc.)",
  "prepTime": "e.g. 20 minutes",
  "cookTime": "e.g. 35 minutes",
  "servings": "{servings}",
  "difficulty": "Beginner-friendly",
  "ingredients": [
    {{ "amount": "2 tbsp", "item": "extra-virgin olive oil", "note": "look for the kosher certification symbol" }}
  ],
  "steps": [
    {{
      "number": 1,
      "title": "Short step title",
      "instruction": "Detailed, beginner-friendly instruction. Explain what to do, how to do it, and what it should look, smell, or feel like when done correctly.",
      "tip": "A beginner tip - a common mistake to avoid or a helpful trick",
      "appliance": "Name of appliance used in this step, or null if none"
    }}
  ],
  "plating": "Simple but elegant plating instructions a beginner can follow",
  "chefNote": "An inspiring chef's note about the dish, its origins, or how to make it your own"
}}"#,
        meal = answers.meal_type,
        servings = answers.servings,
        plural = plural,
        ingredients = answers.ingredients,
        category = answers.dietary_category,
    );

    Ok(CompiledPrompt { instructions, task })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::MealType;

    fn answers() -> WizardAnswers {
        WizardAnswers {
            ingredients: "chicken, lemon".to_string(),
            meal_type: MealType::Dinner,
            dietary_category: DietaryCategory::Meat,
            servings: 4,
        }
    }

    fn kitchen() -> Vec<String> {
        vec!["Oven".to_string(), "Stovetop".to_string()]
    }

    #[test]
    fn compile_is_deterministic() {
        let first = compile(&answers(), &kitchen()).unwrap();
        let second = compile(&answers(), &kitchen()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn changing_servings_leaves_the_rule_block_alone() {
        let four = compile(&answers(), &kitchen()).unwrap();
        let mut seven_answers = answers();
        seven_answers.servings = 7;
        let seven = compile(&seven_answers, &kitchen()).unwrap();

        assert_eq!(four.instructions, seven.instructions);
        assert_ne!(four.task, seven.task);
        assert!(seven.task.contains("for 7 servings"));
        assert!(seven.task.contains(r#""servings": "7""#));
    }

    #[test]
    fn empty_kitchen_always_fails_the_precondition() {
        for category in [
            DietaryCategory::Meat,
            DietaryCategory::Dairy,
            DietaryCategory::Pareve,
        ] {
            let mut request = answers();
            request.dietary_category = category;
            let err = compile(&request, &[]).unwrap_err();
            assert!(matches!(err, CompileError::NoAppliancesConfigured));
        }
    }

    #[test]
    fn gate_bypass_is_reported_as_invalid_answers() {
        let mut blank = answers();
        blank.ingredients = "  ".to_string();
        assert!(matches!(
            compile(&blank, &kitchen()),
            Err(CompileError::InvalidAnswers(_))
        ));

        let mut zero = answers();
        zero.servings = 0;
        assert!(matches!(
            compile(&zero, &kitchen()),
            Err(CompileError::InvalidAnswers(_))
        ));
    }

    #[test]
    fn scenario_dinner_for_four() {
        let prompt = compile(&answers(), &kitchen()).unwrap();

        assert!(prompt.instructions.contains(DietaryCategory::Meat.rule_text()));
        assert!(prompt
            .instructions
            .contains("Available kitchen appliances: Oven, Stovetop"));
        assert!(prompt
            .instructions
            .contains("You MUST only use these appliances"));

        assert!(prompt.task.contains("dinner"));
        assert!(prompt.task.contains("4"));
        assert!(prompt.task.contains("chicken, lemon"));
        // No appliance outside the owned list shows up in the user text.
        assert!(!prompt.task.contains("Microwave"));
        assert!(!prompt.task.contains("Blender"));
    }

    #[test]
    fn single_serving_reads_singular() {
        let mut one = answers();
        one.servings = 1;
        let prompt = compile(&one, &kitchen()).unwrap();
        assert!(prompt.task.contains("for 1 serving built around"));
        assert!(!prompt.task.contains("1 servings"));
    }

    #[test]
    fn each_category_embeds_its_own_rule() {
        for category in [
            DietaryCategory::Meat,
            DietaryCategory::Dairy,
            DietaryCategory::Pareve,
        ] {
            let mut request = answers();
            request.dietary_category = category;
            let prompt = compile(&request, &kitchen()).unwrap();
            assert!(prompt.instructions.contains(category.rule_text()));
        }
    }
}
