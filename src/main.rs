use anyhow::{Context, Result};
use kosher_chef::api_connection::connection::Provider;
use kosher_chef::appliance_store::{self, ApplianceStore, FileStore};
use kosher_chef::cli::{parse_args, ApplianceAction, Command, GenerateArgs};
use kosher_chef::generator::RecipeGenerator;
use kosher_chef::wizard::Wizard;

const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";
const APPLIANCE_DATA_DIR: &str = "kosher_chef_data";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // .env may hold the API key

    let cli = parse_args();
    let mut store = ApplianceStore::new(FileStore::new(APPLIANCE_DATA_DIR));

    match cli.command {
        Command::Appliances { action } => run_appliances(&mut store, action),
        Command::Generate(args) => run_generate(&store, args).await,
    }
}

fn run_appliances(store: &mut ApplianceStore<FileStore>, action: ApplianceAction) -> Result<()> {
    let mut appliances = store.load();

    match action {
        ApplianceAction::List => {
            let mut categories: Vec<&str> = Vec::new();
            for appliance in &appliances {
                if !categories.contains(&appliance.category.as_str()) {
                    categories.push(appliance.category.as_str());
                }
            }
            for category in categories {
                println!("{}:", category);
                for appliance in appliances.iter().filter(|a| a.category == category) {
                    let marker = if appliance.owned { "x" } else { " " };
                    println!("  [{}] {} ({})", marker, appliance.name, appliance.id);
                }
            }
            let owned = appliance_store::owned_names(&appliances);
            println!("\n{} of {} appliances owned", owned.len(), appliances.len());
            return Ok(());
        }
        ApplianceAction::Toggle { id } => {
            appliance_store::toggle(&mut appliances, &id);
        }
        ApplianceAction::Add { name, category } => {
            match appliance_store::add_custom(&mut appliances, &name, &category) {
                Some(id) => println!("Added appliance ({})", id),
                None => anyhow::bail!("Appliance name must not be empty"),
            }
        }
        ApplianceAction::Remove { id } => {
            appliance_store::remove(&mut appliances, &id);
        }
    }

    store.save(&appliances);
    println!("Saved.");
    Ok(())
}

async fn run_generate(store: &ApplianceStore<FileStore>, args: GenerateArgs) -> Result<()> {
    let appliances = store.load();
    let owned = appliance_store::owned_names(&appliances);

    // Drive the wizard through its steps; every gate is checked the same way
    // the interactive flow would check it.
    let mut wizard = Wizard::new();
    wizard.set_ingredients(&args.ingredients);
    anyhow::ensure!(wizard.advance(), "Please list at least one ingredient");
    wizard.set_meal_type(args.meal_type);
    anyhow::ensure!(wizard.advance(), "Please choose a meal type");
    wizard.set_dietary_category(args.category);
    anyhow::ensure!(wizard.advance(), "Please choose a kosher category");
    wizard.set_servings(args.servings);
    anyhow::ensure!(wizard.advance(), "Servings must be at least 1");

    let answers = wizard.submit().context("Recipe request is incomplete")?;

    println!(
        "Our chef is crafting your {} recipe... this usually takes 10-20 seconds.",
        answers.meal_type
    );

    wizard.set_busy(true);
    let generator = RecipeGenerator::new(Provider::anthropic(API_KEY_ENV_VAR));
    let result = generator.generate(&answers, &owned).await;
    wizard.set_busy(false);

    let outcome = result?;
    if !outcome.unlisted_appliances.is_empty() {
        eprintln!(
            "Warning: recipe references appliances outside your kitchen: {}",
            outcome.unlisted_appliances.join(", ")
        );
    }

    let rendered =
        serde_json::to_string_pretty(&outcome.recipe).context("Failed to render recipe")?;
    println!("{}", rendered);
    Ok(())
}
