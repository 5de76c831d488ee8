use crate::dates::display_date;
use crate::types::{Benefits, Cost, CostKind, DateKind, ResourceDetails, ResourceRecord, ResourceType, University};
use serde::Serialize;

pub const UNTITLED: &str = "Без названия";
pub const EMPTY_RESULTS_TITLE: &str = "😕 Ресурсы не найдены";
pub const EMPTY_RESULTS_HINT: &str = "Попробуйте изменить фильтры";
pub const EMPTY_BROWSE_TEXT: &str = "Ресурсов этого типа пока нет в базе данных";

pub fn type_label(ty: ResourceType) -> &'static str {
    match ty {
        ResourceType::Olympiad => "🏆 Олимпиада",
        ResourceType::Course => "📚 Курс",
        ResourceType::School => "🎓 Лицей",
        ResourceType::SummerProgram => "☀️ Летняя программа",
        ResourceType::PracticalEvent => "💡 Практическое событие",
        ResourceType::InfoEvent => "ℹ️ Информационное событие",
        ResourceType::EducationalEvent => "👨‍🏫 Образовательное событие",
        ResourceType::OnlineResource => "🌐 Онлайн-ресурс",
    }
}

/// Intro text shown above the browse-by-type listing.
pub fn type_description(ty: ResourceType) -> &'static str {
    match ty {
        ResourceType::Olympiad => "Олимпиады - это соревнования, которые дают БВИ (поступление без экзаменов) или 100 баллов за ЕГЭ. Ниже представлены все олимпиады из нашей базы данных.",
        ResourceType::Course => "Курсы подготовки помогут углубить знания по предметам. Здесь собраны онлайн и очные программы от различных университетов.",
        ResourceType::School => "Лицеи и профильные классы при университетах дают преимущества при поступлении. Смотрите все доступные варианты.",
        ResourceType::SummerProgram => "Летние программы - это интенсивные курсы и школы в июле-августе. Отличная возможность познакомиться с вузом.",
        ResourceType::PracticalEvent => "Практические события включают хакатоны, кейс-чемпионаты и конкурсы, где можно проявить себя.",
        ResourceType::InfoEvent => "Информационные события - дни открытых дверей, встречи с деканами, экскурсии по кампусу.",
        ResourceType::EducationalEvent => "Образовательные события - лекции, мастер-классы, вебинары от преподавателей и студентов.",
        ResourceType::OnlineResource => "Онлайн-ресурсы - YouTube каналы, Telegram группы, образовательные порталы вузов.",
    }
}

pub fn date_label(kind: DateKind) -> &'static str {
    match kind {
        DateKind::Registration => "📋 Регистрация:",
        DateKind::Event => "📅 Событие:",
        DateKind::Qualification => "⚡ Квалификация:",
        DateKind::Final => "🏆 Финал:",
        DateKind::ApplicationDeadline => "⏰ Подать заявку:",
        DateKind::Courses => "📚 Курсы:",
        DateKind::Admissions => "🎓 Приём:",
        DateKind::StartOfYear => "🎒 Начало года:",
        DateKind::Program => "☀️ Программа:",
    }
}

/// Human label for a format code; unknown codes are shown as is.
pub fn format_label(format: &str) -> &str {
    match format {
        "очно" => "Очно",
        "онлайн" => "Онлайн",
        "выездное" => "Выездное",
        "смешанное_очно_онлайн" => "Смешанное (очно + онлайн)",
        "очно_выездное" => "Очно выездное",
        other => other,
    }
}

/// `None` when the cost kind is neither free nor paid.
pub fn cost_text(cost: &Cost) -> Option<String> {
    match cost.kind.as_ref()? {
        CostKind::Free => Some("💰 Бесплатно".to_string()),
        CostKind::Paid => {
            let mut text = match cost.amount {
                Some(amount) => format!("💸 Платно: {} ₽", amount),
                None => "💸 Платно".to_string(),
            };
            if let Some(note) = cost.note.as_deref().filter(|note| !note.is_empty()) {
                text.push_str(&format!(" ({})", note));
            }
            Some(text)
        }
        CostKind::Other(_) => None,
    }
}

pub fn benefit_badges(benefits: &Benefits) -> Vec<String> {
    let mut badges = Vec::new();
    if benefits.bvi {
        badges.push("БВИ".to_string());
    }
    if benefits.points100 {
        badges.push("100 баллов".to_string());
    }
    if benefits.additional_points > 0.0 {
        badges.push(format!("+{}", benefits.additional_points));
    }
    if let Some(grants) = benefits.grants.display_text() {
        badges.push(labelled("Гранты", &grants));
    }
    if let Some(discount) = benefits.tuition_discount.display_text() {
        badges.push(labelled("Скидка", &discount));
    }
    if benefits.priority {
        badges.push("Приоритет".to_string());
    }
    if benefits.early_admission {
        badges.push("Досрочное зачисление".to_string());
    }
    badges
}

fn labelled(label: &str, text: &str) -> String {
    if text.is_empty() {
        label.to_string()
    } else {
        format!("{} {}", label, text)
    }
}

pub fn results_title(university: &University) -> String {
    format!("Ресурсы для поступления в {}", university.name)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRow {
    pub label: &'static str,
    pub value: String,
}

/// Everything a card shows, already labelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCard {
    pub resource_type: ResourceType,
    pub type_label: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_audience: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grades: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<DateRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ResourceCard {
    pub fn from_record(record: &ResourceRecord) -> Self {
        let ty = record.resource_type();
        let (profiles, grades) = match &record.details {
            ResourceDetails::School { profiles, grades } => (profiles.clone(), grades.clone()),
            _ => (Vec::new(), Vec::new()),
        };

        let dates = DateKind::ALL
            .into_iter()
            .filter_map(|kind| {
                record.dates.kind(kind).map(|value| DateRow {
                    label: date_label(kind),
                    value: display_date(value),
                })
            })
            .collect();

        Self {
            resource_type: ty,
            type_label: type_label(ty),
            title: record
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            description: record.description.clone().filter(|d| !d.is_empty()),
            format: record.format.as_deref().map(|f| format_label(f).to_string()),
            target_audience: record.target_audience.clone(),
            subjects: record.details.subjects().to_vec(),
            profiles,
            grades,
            dates,
            cost: record.cost.as_ref().and_then(cost_text),
            benefits: record.benefits.as_ref().map(benefit_badges).unwrap_or_default(),
            website: record.website.clone().filter(|w| !w.is_empty()),
        }
    }
}
