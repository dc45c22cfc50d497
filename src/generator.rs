use std::error::Error;
use std::fmt;

use crate::api_connection::connection::{ApiConnectionError, Provider};
use crate::api_connection::endpoints::{ChatMessage, MessagesRequest, DEFAULT_MAX_TOKENS};
use crate::prompt_compiler::{compile, CompileError};
use crate::recipe_validator::{unlisted_appliances, validate_response, RecipeRecord};
use crate::wizard::WizardAnswers;

/// Everything that can go wrong between a finalized request and a recipe.
/// Each kind is terminal where it is detected; nothing here retries.
#[derive(Debug)]
pub enum GenerationError {
    /// User-correctable: the kitchen has no owned appliances to ground a
    /// recipe in.
    NoAppliancesConfigured,
    /// The model call itself failed (network, auth, rate limit).
    UpstreamUnavailable(ApiConnectionError),
    /// The model's text could not be turned into a recipe record.
    MalformedResponse(String),
    /// A wizard field reached the compiler invalid. The state machine gates
    /// submission, so this indicates a caller bug, not bad user input.
    InvalidInput(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NoAppliancesConfigured => {
                write!(f, "No appliances configured. Please set up your kitchen first.")
            }
            GenerationError::UpstreamUnavailable(err) => {
                write!(f, "Failed to generate recipe: {}. Please try again.", err)
            }
            GenerationError::MalformedResponse(msg) => {
                write!(f, "Failed to parse recipe ({}). Please try again.", msg)
            }
            GenerationError::InvalidInput(msg) => write!(f, "Invalid recipe request: {}", msg),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GenerationError::UpstreamUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CompileError> for GenerationError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::NoAppliancesConfigured => GenerationError::NoAppliancesConfigured,
            CompileError::InvalidAnswers(msg) => GenerationError::InvalidInput(msg),
        }
    }
}

/// A validated recipe plus any appliance names the model used despite them
/// not being in the kitchen. The flags are advisory; the recipe itself is
/// complete.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub recipe: RecipeRecord,
    pub unlisted_appliances: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RecipeGenerator {
    provider: Provider,
}

impl RecipeGenerator {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    /// One compile-dispatch-parse round trip. No retry, no caching: a failed
    /// attempt is discarded and the caller may resubmit the whole request.
    pub async fn generate(
        &self,
        answers: &WizardAnswers,
        owned_appliances: &[String],
    ) -> Result<GenerationOutcome, GenerationError> {
        let prompt = compile(answers, owned_appliances)?;

        let request = MessagesRequest {
            model: self.provider.model().to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system: Some(prompt.instructions),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.task,
            }],
            temperature: None,
        };

        let response = self
            .provider
            .call_messages(request)
            .await
            .map_err(GenerationError::UpstreamUnavailable)?;

        let text = match response.first_text() {
            Some(text) => text,
            None => {
                return Err(GenerationError::MalformedResponse(
                    "no text content in response".to_string(),
                ))
            }
        };

        let recipe =
            validate_response(text).map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        let unlisted = unlisted_appliances(&recipe, owned_appliances);

        Ok(GenerationOutcome {
            recipe,
            unlisted_appliances: unlisted,
        })
    }
}
