use clap::{Args, Parser, Subcommand};

use crate::wizard::{DietaryCategory, MealType};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the appliances available in your kitchen
    Appliances {
        #[command(subcommand)]
        action: ApplianceAction,
    },
    /// Generate a kosher recipe from your answers and owned appliances
    Generate(GenerateArgs),
}

#[derive(Subcommand, Debug)]
pub enum ApplianceAction {
    /// List all appliances grouped by category
    List,
    /// Flip the owned flag on one appliance
    Toggle { id: String },
    /// Add a custom appliance (owned by default)
    Add {
        name: String,
        #[arg(long, default_value = "Other")]
        category: String,
    },
    /// Remove an appliance by id
    Remove { id: String },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Ingredients to build the recipe around, e.g. "chicken, lemon"
    #[arg(short, long)]
    pub ingredients: String,

    #[arg(short, long, value_enum)]
    pub meal_type: MealType,

    /// Kosher category of the dish
    #[arg(short, long, value_enum)]
    pub category: DietaryCategory,

    /// Number of servings
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub servings: u32,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
