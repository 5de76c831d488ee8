use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use resource_catalog::filter::{BenefitKey, CostFilter, DateFilter, TypeFilter};
use resource_catalog::presentation::{
    self, ResourceCard, EMPTY_BROWSE_TEXT, EMPTY_RESULTS_HINT, EMPTY_RESULTS_TITLE,
};
use resource_catalog::{
    lint_bundle, sources, AppState, CatalogConfig, CatalogLoader, DataLocation, FilterUpdate,
    ResourceRecord, ResourceType, SortPolicy, University,
};
use tracing::{debug, info};

/// University admission resources catalog
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Data directory or base URL (overrides CATALOG_DATA)
    #[arg(short, long)]
    data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the universities in the catalog
    Universities,

    /// Show one university's description and contacts
    Info { id: String },

    /// Show a university's resources through the filter panel
    List {
        id: String,

        /// Resource type, or "all"
        #[arg(short = 't', long = "type", default_value = "all")]
        resource_type: TypeFilter,

        /// Benefit to require; repeat to accept any of several
        #[arg(short, long = "benefit")]
        benefits: Vec<BenefitKey>,

        /// all, free or paid
        #[arg(short, long, default_value = "all")]
        cost: CostFilter,

        /// all, upcoming or active-registration
        #[arg(long, default_value = "all")]
        date: DateFilter,

        /// Evaluate date filters as of this day (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every resource of one type across all universities, by name
    Browse {
        resource_type: ResourceType,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report data problems in every university's files
    Lint,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = CatalogConfig::from_env();
    if let Some(data) = &args.data {
        config.data = DataLocation::parse(data);
    }
    debug!("Using data location {:?}", config.data);

    let source = sources::from_config(&config)?;
    let loader = CatalogLoader::new(source);
    let universities = loader
        .load_universities()
        .await
        .context("Failed to load the university list")?;

    match args.command {
        Command::Universities => {
            for university in &universities {
                println!("{:<12} {}", university.id, university.name);
            }
        }
        Command::Info { id } => {
            let university = universities
                .iter()
                .find(|u| u.id == id)
                .with_context(|| format!("University not found: {}", id))?;
            print_university(university);
        }
        Command::List {
            id,
            resource_type,
            benefits,
            cost,
            date,
            today,
            json,
        } => {
            let bundle = loader.load_bundle(&id).await;
            let mut state = AppState::new(universities);
            let title = presentation::results_title(state.show_results(&id, &bundle)?);

            state.update_filter(FilterUpdate::Type(resource_type));
            state.update_filter(FilterUpdate::Benefits(benefits.into_iter().collect()));
            state.update_filter(FilterUpdate::Cost(cost));
            state.update_filter(FilterUpdate::Date(date));

            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let visible = state.visible_resources(today);
            info!("{} of {} resources match", visible.len(), state.resources().len());

            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else if visible.is_empty() {
                println!("{}\n\n{}\n{}", title, EMPTY_RESULTS_TITLE, EMPTY_RESULTS_HINT);
            } else {
                println!("{}\n", title);
                print_cards(&visible);
            }
        }
        Command::Browse { resource_type, json } => {
            let resources = loader.load_resources_by_type(resource_type, &universities).await;
            let mut sorted = Vec::clone(&resources);
            SortPolicy::NameAlphabetical.sort(&mut sorted);

            if json {
                println!("{}", serde_json::to_string_pretty(&sorted)?);
            } else {
                println!(
                    "{}\n{}\n",
                    presentation::type_label(resource_type),
                    presentation::type_description(resource_type)
                );
                if sorted.is_empty() {
                    println!("{}", EMPTY_BROWSE_TEXT);
                } else {
                    print_cards(&sorted);
                }
            }
        }
        Command::Lint => {
            let mut total = 0;
            for university in &universities {
                let bundle = loader.load_bundle(&university.id).await;
                for issue in lint_bundle(&university.id, &bundle) {
                    println!("{}", issue);
                    total += 1;
                }
            }
            if total > 0 {
                anyhow::bail!("{} data problems found", total);
            }
            info!("No data problems in {} universities", universities.len());
        }
    }

    Ok(())
}

fn print_university(university: &University) {
    println!("🎓 {}", university.name);
    if let Some(description) = &university.description {
        println!("\n{}", description);
    }
    if !university.main_directions.is_empty() {
        println!("\n📚 Основные направления подготовки:");
        for direction in &university.main_directions {
            println!("  - {}", direction);
        }
    }
    if let Some(website) = &university.website {
        println!("\n🌐 {}", website);
    }

    let Some(contacts) = &university.contacts else {
        return;
    };
    if let Some(admissions) = &contacts.admissions {
        println!("\n📞 Контакты приёмной комиссии:");
        let lines = [
            ("🌐", admissions.website.clone()),
            ("✉️", admissions.email.clone()),
            ("☎️", admissions.phone.clone()),
            ("☎️", admissions.hotline.as_ref().map(|h| format!("Горячая линия: {}", h))),
            ("📱", admissions.mobile.clone()),
        ];
        for (icon, value) in lines {
            if let Some(value) = value {
                println!("  {} {}", icon, value);
            }
        }
    }
    if let Some(school) = &contacts.school {
        println!("\n🎓 Для школьников:");
        for value in [&school.website, &school.email].into_iter().flatten() {
            println!("  {}", value);
        }
    }
}

fn print_cards(resources: &[ResourceRecord]) {
    for record in resources {
        let card = ResourceCard::from_record(record);
        println!("{}  {}", card.type_label, card.title);
        if let Some(description) = &card.description {
            println!("    {}", description);
        }
        if let Some(format) = &card.format {
            println!("    Формат: {}", format);
        }
        if !card.target_audience.is_empty() {
            println!("    Для: {}", card.target_audience.join(", "));
        }
        if !card.subjects.is_empty() {
            println!("    {}", card.subjects.join(" · "));
        }
        if !card.profiles.is_empty() {
            println!("    Профили: {}", card.profiles.join(", "));
        }
        if !card.grades.is_empty() {
            println!("    Классы: {}", card.grades.join(", "));
        }
        for row in &card.dates {
            println!("    {} {}", row.label, row.value);
        }
        if let Some(cost) = &card.cost {
            println!("    💵 Стоимость: {}", cost);
        }
        if !card.benefits.is_empty() {
            println!("    {}", card.benefits.join(" | "));
        }
        if let Some(website) = &card.website {
            println!("    {}", website);
        }
        println!();
    }
}
