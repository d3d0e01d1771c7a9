use mealplanner::config::{
    CatalogConfig, Config, DatabaseConfig, GeneratorConfig, ObservabilityConfig,
};
use mealplanner_recipe::SourceFilter;
use mealplanner_shared::mealplan::Day;
use mealplanner_shared::recipe::MealType;
use temp_dir::TempDir;

fn config(dir: &TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("db.sqlite3").display()),
            max_connections: 1,
        },
        observability: ObservabilityConfig::default(),
        catalog: CatalogConfig::default(),
        generator: GeneratorConfig { seed: Some(7) },
    }
}

#[tokio::test]
async fn test_session_survives_reopen() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);

    let plan = {
        let mut session = mealplanner::open_session(&config).await?;
        session.login("john").await?;
        session.generate_random_plan(SourceFilter::Default).await?
    };

    let session = mealplanner::open_session(&config).await?;

    assert_eq!(session.current_user().map(|u| u.username.as_str()), Some("john"));
    assert_eq!(session.plan_snapshot()?, plan);
    assert_eq!(plan.slot(Day::Sunday, MealType::Dinner).len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_fixed_seed_gives_same_plan() -> anyhow::Result<()> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;

    let mut a = mealplanner::open_session(&config(&first)).await?;
    a.login("john").await?;
    let mut b = mealplanner::open_session(&config(&second)).await?;
    b.login("john").await?;

    assert_eq!(
        a.generate_random_plan(SourceFilter::All).await?,
        b.generate_random_plan(SourceFilter::All).await?
    );

    Ok(())
}

#[tokio::test]
async fn test_custom_seed_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let seed_path = dir.child("seed.json");
    std::fs::write(
        &seed_path,
        r#"[{"name": "Porridge", "type": "kahvaltı", "duration": 10, "instructions": ["Boil oats."]}]"#,
    )?;

    let mut config = config(&dir);
    config.catalog.seed_path = Some(seed_path.to_string_lossy().into_owned());

    let session = mealplanner::open_session(&config).await?;

    assert_eq!(session.defaults().len(), 1);
    assert_eq!(session.defaults()[0].id, "default-1");
    assert_eq!(session.defaults()[0].steps, vec!["Boil oats."]);

    Ok(())
}
