use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mealplanner::Session;
use mealplanner::config::Config;
use mealplanner_db::SqliteStorage;
use mealplanner_mealplan::{plan_table, shopping_list};
use mealplanner_recipe::{SourceFilter, TypeFilter};
use mealplanner_shared::mealplan::Day;
use mealplanner_shared::recipe::{MealType, RawIngredient, RawRecipe};
use serde::Serialize;
use sqlx::migrate::MigrateDatabase;

/// mealplanner - weekly meal planning from a shared recipe catalog
#[derive(Parser)]
#[command(name = "mealplanner")]
#[command(about = "Plan a week of meals from default and personal recipes", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Sign in, loading that user's recipes and plan
    Login { username: String },
    /// Sign out, keeping the stored data
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse and edit recipes
    #[command(subcommand)]
    Recipes(RecipeCommands),
    /// Edit the weekly plan
    #[command(subcommand)]
    Plan(PlanCommands),
}

#[derive(Subcommand)]
enum RecipeCommands {
    List {
        #[arg(long, default_value = "all")]
        source: SourceFilter,
        #[arg(long = "type", default_value = "all")]
        meal_type: TypeFilter,
        #[arg(long, default_value = "")]
        search: String,
    },
    Add(AddRecipe),
    Delete { id: String },
    /// Print personal recipes as a cookbook, sorted by name
    Cookbook {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct AddRecipe {
    #[arg(long)]
    name: String,
    #[arg(long = "type")]
    meal_type: MealType,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    prep_time: Option<u32>,
    #[arg(long)]
    cook_time: Option<u32>,
    #[arg(long)]
    servings: Option<u32>,
    #[arg(long)]
    calories: Option<u32>,
    /// Repeat for each ingredient line
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,
    /// Repeat for each step
    #[arg(long = "step")]
    steps: Vec<String>,
}

#[derive(Subcommand)]
enum PlanCommands {
    Show {
        #[arg(long)]
        json: bool,
    },
    Assign {
        day: Day,
        meal_type: MealType,
        recipe_id: String,
    },
    Remove {
        day: Day,
        meal_type: MealType,
        recipe_id: Option<String>,
    },
    Generate {
        #[arg(long, default_value = "all")]
        source: SourceFilter,
    },
    Clear,
    ShoppingList {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealplanner::observability::init_observability(
        "mealplanner",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Login { username } => login_command(config, username).await,
        Commands::Logout => logout_command(config).await,
        Commands::Whoami => whoami_command(config).await,
        Commands::Recipes(command) => recipes_command(config, command).await,
        Commands::Plan(command) => plan_command(config, command).await,
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool =
        mealplanner::db::create_pool(&config.database.url, config.database.max_connections)
            .await?;
    mealplanner_db::migrate(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: Config) -> Result<()> {
    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await
}

#[tracing::instrument(skip(config))]
async fn login_command(config: Config, username: String) -> Result<()> {
    let mut session = mealplanner::open_session(&config).await?;
    let user = session.login(&username).await?;

    println!("Logged in as {}", user.username);

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn logout_command(config: Config) -> Result<()> {
    let mut session = mealplanner::open_session(&config).await?;
    session.logout().await?;

    println!("Logged out");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn whoami_command(config: Config) -> Result<()> {
    let session = mealplanner::open_session(&config).await?;

    match session.current_user() {
        Some(user) => println!("{} (since {})", user.username, user.created_at),
        None => println!("Not logged in"),
    }

    Ok(())
}

#[tracing::instrument(skip_all)]
async fn recipes_command(config: Config, command: RecipeCommands) -> Result<()> {
    let mut session = mealplanner::open_session(&config).await?;

    match command {
        RecipeCommands::List {
            source,
            meal_type,
            search,
        } => {
            for recipe in session.query(source, meal_type, &search) {
                let origin = if recipe.is_default { "default" } else { "personal" };
                println!(
                    "{}\t{}\t{}\t{} min\t{}",
                    recipe.id,
                    recipe.meal_type,
                    origin,
                    recipe.total_time(),
                    recipe.name
                );
            }
        }
        RecipeCommands::Add(input) => {
            let recipe = session.add_meal(input.into()).await?;
            println!("Added {} ({})", recipe.name, recipe.id);
        }
        RecipeCommands::Delete { id } => {
            if session.delete_meal(&id).await? {
                println!("Deleted {id}");
            } else {
                println!("No personal recipe {id}");
            }
        }
        RecipeCommands::Cookbook { json } => {
            let entries = session.cookbook()?;

            if json {
                return print_json(&entries);
            }

            if entries.is_empty() {
                println!("No personal recipes yet, add your own recipes first");
            }

            for entry in entries {
                println!("{}", entry.name);
                println!(
                    "  {} | {} kcal | {} min",
                    entry.meal_type,
                    entry.calories.map_or("-".to_owned(), |c| c.to_string()),
                    entry.prep_time.map_or("-".to_owned(), |t| t.to_string())
                );
                println!("  {}", entry.description.as_deref().unwrap_or("No description"));
                for ingredient in entry.ingredients {
                    println!("    - {ingredient}");
                }
                for (index, step) in entry.steps.iter().enumerate() {
                    println!("    {}. {step}", index + 1);
                }
            }
        }
    }

    Ok(())
}

#[tracing::instrument(skip_all)]
async fn plan_command(config: Config, command: PlanCommands) -> Result<()> {
    let mut session = mealplanner::open_session(&config).await?;

    match command {
        PlanCommands::Show { json: true } => print_json(&plan_table(&session.plan_snapshot()?))?,
        PlanCommands::Show { json: false } => print_plan(&session)?,
        PlanCommands::Assign {
            day,
            meal_type,
            recipe_id,
        } => {
            if !session.update_meal_plan(day, meal_type, &recipe_id).await? {
                println!("{recipe_id} is already planned for {day} {meal_type}");
            }
            print_plan(&session)?;
        }
        PlanCommands::Remove {
            day,
            meal_type,
            recipe_id,
        } => {
            session
                .remove_meal_from_plan(day, meal_type, recipe_id.as_deref())
                .await?;
            print_plan(&session)?;
        }
        PlanCommands::Generate { source } => {
            session.generate_random_plan(source).await?;
            print_plan(&session)?;
        }
        PlanCommands::Clear => {
            session.clear_plan().await?;
            println!("Meal plan cleared");
        }
        PlanCommands::ShoppingList { json: true } => {
            print_json(&shopping_list(&session.plan_snapshot()?))?
        }
        PlanCommands::ShoppingList { json: false } => {
            for day in shopping_list(&session.plan_snapshot()?) {
                println!("{}", day.day);
                for recipe in day.recipes {
                    println!("  {}", recipe.name);
                    for ingredient in recipe.ingredients {
                        println!("    - {ingredient}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_plan(session: &Session<SqliteStorage>) -> Result<()> {
    let rows = plan_table(&session.plan_snapshot()?);

    if rows.is_empty() {
        println!("Meal plan is empty");
    }

    for row in rows {
        println!("{}", row.day);
        for (meal_type, names) in row.meals {
            println!("  {meal_type:<10} {names}");
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

impl From<AddRecipe> for RawRecipe {
    fn from(value: AddRecipe) -> Self {
        let mut raw = RawRecipe::new(value.name, value.meal_type);
        raw.description = value.description;
        raw.prep_time = value.prep_time;
        raw.cook_time = value.cook_time;
        raw.servings = value.servings;
        raw.calories = value.calories;
        raw.ingredients = Some(
            value
                .ingredients
                .into_iter()
                .map(RawIngredient::Text)
                .collect(),
        );
        raw.steps = Some(value.steps);
        raw
    }
}
