use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Appetizer,
    Dessert,
    Snack,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Appetizer => "appetizer",
            MealType::Dessert => "dessert",
            MealType::Snack => "snack",
        };
        write!(f, "{}", label)
    }
}

/// The three mutually exclusive kosher classifications. Closed on purpose:
/// the rule lookup in the prompt compiler matches exhaustively over this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DietaryCategory {
    Meat,
    Dairy,
    Pareve,
}

impl fmt::Display for DietaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DietaryCategory::Meat => "meat",
            DietaryCategory::Dairy => "dairy",
            DietaryCategory::Pareve => "pareve",
        };
        write!(f, "{}", label)
    }
}

// Ord follows declaration order, which is the step order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Ingredients,
    MealType,
    DietaryCategory,
    Servings,
    Confirm,
}

impl WizardStep {
    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Ingredients => Some(WizardStep::MealType),
            WizardStep::MealType => Some(WizardStep::DietaryCategory),
            WizardStep::DietaryCategory => Some(WizardStep::Servings),
            WizardStep::Servings => Some(WizardStep::Confirm),
            WizardStep::Confirm => None,
        }
    }

    fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Ingredients => None,
            WizardStep::MealType => Some(WizardStep::Ingredients),
            WizardStep::DietaryCategory => Some(WizardStep::MealType),
            WizardStep::Servings => Some(WizardStep::DietaryCategory),
            WizardStep::Confirm => Some(WizardStep::Servings),
        }
    }
}

/// A fully valid recipe request. Only ever produced by `Wizard::submit`, so
/// holders can rely on the field constraints having been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardAnswers {
    pub ingredients: String,
    pub meal_type: MealType,
    pub dietary_category: DietaryCategory,
    pub servings: u32,
}

/// Linear question flow: each step must be answered before moving past it,
/// and submission is only possible from the confirmation step.
#[derive(Debug)]
pub struct Wizard {
    current: WizardStep,
    highest_reached: WizardStep,
    ingredients: String,
    meal_type: Option<MealType>,
    dietary_category: Option<DietaryCategory>,
    servings: Option<u32>,
    busy: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            current: WizardStep::Ingredients,
            highest_reached: WizardStep::Ingredients,
            ingredients: String::new(),
            meal_type: None,
            dietary_category: None,
            servings: None,
            busy: false,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn set_ingredients(&mut self, text: &str) {
        self.ingredients = text.to_string();
    }

    pub fn set_meal_type(&mut self, meal_type: MealType) {
        self.meal_type = Some(meal_type);
    }

    pub fn set_dietary_category(&mut self, category: DietaryCategory) {
        self.dietary_category = Some(category);
    }

    pub fn set_servings(&mut self, servings: u32) {
        self.servings = Some(servings);
    }

    fn step_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Ingredients => !self.ingredients.trim().is_empty(),
            WizardStep::MealType => self.meal_type.is_some(),
            WizardStep::DietaryCategory => self.dietary_category.is_some(),
            WizardStep::Servings => self.servings.map_or(false, |s| s > 0),
            WizardStep::Confirm => {
                self.step_complete(WizardStep::Ingredients)
                    && self.step_complete(WizardStep::MealType)
                    && self.step_complete(WizardStep::DietaryCategory)
                    && self.step_complete(WizardStep::Servings)
            }
        }
    }

    /// Moves one step forward, but only when the current step's answer is
    /// valid. Returns false (state unchanged) otherwise.
    pub fn advance(&mut self) -> bool {
        if !self.step_complete(self.current) {
            return false;
        }
        match self.current.next() {
            Some(next) => {
                self.current = next;
                if next > self.highest_reached {
                    self.highest_reached = next;
                }
                true
            }
            None => false,
        }
    }

    /// Moves one step back. Always succeeds except on the first step.
    pub fn back(&mut self) -> bool {
        match self.current.prev() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    /// Jumps to an already-visited step (the edit affordance from the
    /// confirmation screen). Skipping ahead of unanswered steps is refused.
    pub fn jump_to(&mut self, step: WizardStep) -> bool {
        if step <= self.highest_reached {
            self.current = step;
            true
        } else {
            false
        }
    }

    /// Emits the finalized answers. Only possible from the confirmation step
    /// with every field valid, and not while a generation is in flight. Does
    /// not change state; the caller decides whether to reset afterwards.
    pub fn submit(&self) -> Option<WizardAnswers> {
        if self.busy {
            return None;
        }
        if self.current != WizardStep::Confirm || !self.step_complete(WizardStep::Confirm) {
            return None;
        }
        Some(WizardAnswers {
            ingredients: self.ingredients.trim().to_string(),
            meal_type: self.meal_type?,
            dietary_category: self.dietary_category?,
            servings: self.servings?,
        })
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
