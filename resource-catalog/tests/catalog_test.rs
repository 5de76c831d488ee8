use anyhow::Result;
use chrono::NaiveDate;
use resource_catalog::{
    aggregate, apply_filters, filter::is_registration_active, BenefitKey, CostFilter, DateFilter,
    FilterState, ResourceBundle, ResourceType, TypeFilter,
};
use serde_json::json;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// 2 olympiads (one BVI), 1 course, 1 summer program, 1 online resource.
fn sample_bundle() -> Result<ResourceBundle> {
    Ok(serde_json::from_value(json!({
        "olympiads": [
            {
                "id": "phystech",
                "name": "Физтех",
                "benefits": { "bvi": true, "points100": false },
                "dates": { "registration": "01.03.2025 - 15.04.2025", "final": "20.03.2025" },
                "cost": { "type": "бесплатно" }
            },
            {
                "id": "kurchatov",
                "name": "Курчатов",
                "benefits": { "bvi": false, "additionalPoints": 5 },
                "dates": { "final": "2025-09-01" }
            }
        ],
        "courses": [
            {
                "name": "Подготовка к ЕГЭ",
                "type": "online",
                "cost": { "type": "платно", "amount": 12000 }
            }
        ],
        "schools": [],
        "summerPrograms": [
            { "name": "Летняя школа", "dates": { "program": "01.07.2025 - 20.07.2025" } }
        ],
        "practicalEvents": [],
        "infoEvents": [],
        "educationalEvents": [],
        "onlineResources": [
            { "name": "Telegram канал приёмной комиссии" }
        ]
    }))?)
}

#[tokio::test]
async fn test_aggregation_order_and_count() -> Result<()> {
    init_tracing();

    let bundle = sample_bundle()?;
    let resources = aggregate(&bundle);
    info!("Aggregated {} resources", resources.len());

    assert_eq!(resources.len(), bundle.len());
    assert_eq!(resources.len(), 5);

    let types: Vec<ResourceType> = resources.iter().map(|r| r.resource_type()).collect();
    assert_eq!(
        types,
        vec![
            ResourceType::Olympiad,
            ResourceType::Olympiad,
            ResourceType::Course,
            ResourceType::SummerProgram,
            ResourceType::OnlineResource,
        ]
    );
    assert_eq!(resources[0].name.as_deref(), Some("Физтех"));
    assert_eq!(resources[1].name.as_deref(), Some("Курчатов"));

    let course = serde_json::to_value(&resources[2])?;
    assert_eq!(course["type"], "course");
    assert_eq!(course["categoryType"], "online");

    Ok(())
}

#[tokio::test]
async fn test_type_then_benefit_scenario() -> Result<()> {
    init_tracing();

    let resources = aggregate(&sample_bundle()?);
    let today = ymd(2025, 3, 10);

    let mut filters = FilterState {
        resource_type: TypeFilter::Only(ResourceType::Olympiad),
        ..Default::default()
    };
    let olympiads = apply_filters(&resources, &filters, today);
    assert_eq!(olympiads.len(), 2);

    filters.benefits.insert(BenefitKey::Bvi);
    let bvi = apply_filters(&resources, &filters, today);
    assert_eq!(bvi.len(), 1);
    assert_eq!(bvi[0].id.as_deref(), Some("phystech"));

    Ok(())
}

#[tokio::test]
async fn test_default_filters_are_identity() -> Result<()> {
    init_tracing();

    let resources = aggregate(&sample_bundle()?);
    let visible = apply_filters(&resources, &FilterState::default(), ymd(2025, 3, 10));

    assert_eq!(visible, resources);
    Ok(())
}

#[tokio::test]
async fn test_filtering_is_idempotent() -> Result<()> {
    init_tracing();

    let resources = aggregate(&sample_bundle()?);
    let today = ymd(2025, 3, 10);

    let states = [
        FilterState {
            cost: CostFilter::Free,
            ..Default::default()
        },
        FilterState {
            date: DateFilter::Upcoming,
            ..Default::default()
        },
        FilterState {
            resource_type: TypeFilter::Only(ResourceType::Olympiad),
            benefits: [BenefitKey::AdditionalPoints, BenefitKey::Bvi].into_iter().collect(),
            date: DateFilter::ActiveRegistration,
            ..Default::default()
        },
    ];

    for filters in states {
        let once = apply_filters(&resources, &filters, today);
        let twice = apply_filters(&once, &filters, today);
        info!("{:?} kept {}", filters, once.len());
        assert_eq!(once, twice);
    }
    Ok(())
}

#[tokio::test]
async fn test_cost_and_date_filters_on_bundle() -> Result<()> {
    init_tracing();

    let resources = aggregate(&sample_bundle()?);
    let today = ymd(2025, 3, 10);

    let free = FilterState {
        cost: CostFilter::Free,
        ..Default::default()
    };
    assert_eq!(apply_filters(&resources, &free, today).len(), 1);

    let paid = FilterState {
        cost: CostFilter::Paid,
        ..Default::default()
    };
    let paid = apply_filters(&resources, &paid, today);
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].resource_type(), ResourceType::Course);

    // Физтех final is 10 days out; Курчатов is outside the window; the
    // summer program (01.07) is outside too; undated records pass.
    let upcoming = FilterState {
        date: DateFilter::Upcoming,
        ..Default::default()
    };
    let names: Vec<_> = apply_filters(&resources, &upcoming, today)
        .into_iter()
        .filter_map(|r| r.name)
        .collect();
    assert_eq!(
        names,
        vec!["Физтех", "Подготовка к ЕГЭ", "Telegram канал приёмной комиссии"]
    );

    let registration = FilterState {
        date: DateFilter::ActiveRegistration,
        ..Default::default()
    };
    assert_eq!(apply_filters(&resources, &registration, today).len(), 1);
    assert!(apply_filters(&resources, &registration, ymd(2025, 5, 1)).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_registration_window_scenario() -> Result<()> {
    init_tracing();

    let resources = aggregate(&sample_bundle()?);
    let dates = &resources[0].dates;

    assert!(is_registration_active(dates, ymd(2025, 3, 10)));
    assert!(is_registration_active(dates, ymd(2025, 4, 15)));
    assert!(!is_registration_active(dates, ymd(2025, 5, 1)));
    Ok(())
}
