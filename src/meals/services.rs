use anyhow::Context;
use time::{macros::format_description, OffsetDateTime};
use uuid::Uuid;

use super::dto::{ConsumptionItem, Page};
use super::repo::{self, NewDiaryEntry};
use super::repo_types::{DiaryEntry, RecentEntryRow};
use crate::nutrition::{MealNutrients, MealType, Rating};
use crate::state::AppState;

/// Slices an in-memory list into one page. `page` is 1-based and clamped
/// into range; an empty list still has page 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        per_page,
        total_pages,
        total_items,
    }
}

pub fn format_day(at: OffsetDateTime) -> String {
    at.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_default()
}

/// `"{meal type} - {name} - dd/mm/yyyy"`, without the name part when empty.
pub fn describe(meal_type: &str, name: Option<&str>, at: OffsetDateTime) -> String {
    let meal_type = if meal_type.trim().is_empty() {
        "Comida"
    } else {
        meal_type
    };
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => format!("{} - {} - {}", meal_type, n, format_day(at)),
        None => format!("{} - {}", meal_type, format_day(at)),
    }
}

impl From<RecentEntryRow> for ConsumptionItem {
    fn from(r: RecentEntryRow) -> Self {
        Self {
            id: r.id,
            rating: r.rating.as_deref().and_then(Rating::from_label),
            description: describe(&r.meal_type, r.name.as_deref(), r.created_at),
            meal_type: r.meal_type,
            name: r.name.unwrap_or_default(),
            created_at: r.created_at,
        }
    }
}

pub struct DiaryRequest {
    pub meal: MealNutrients,
    pub meal_type: MealType,
    pub template_id: Option<Uuid>,
    pub save_as_template: bool,
    pub photo_id: Option<Uuid>,
}

/// Stores a diary entry. An explicit template is referenced as is; otherwise
/// the meal can first be saved as a new template, in the same transaction.
pub async fn create_diary_entry(
    st: &AppState,
    user_id: Uuid,
    req: DiaryRequest,
) -> anyhow::Result<DiaryEntry> {
    let mut tx = st.db.begin().await.context("begin tx")?;

    let template_id = match (req.template_id, req.save_as_template) {
        (Some(id), _) => Some(id),
        (None, true) => Some(repo::insert_template(&mut *tx, &req.meal).await?.id),
        (None, false) => None,
    };

    let entry = repo::insert_entry(
        &mut *tx,
        NewDiaryEntry {
            user_id,
            meal: &req.meal,
            meal_type: req.meal_type,
            template_id,
            photo_id: req.photo_id,
        },
    )
    .await?;

    tx.commit().await.context("commit tx")?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn paginate_splits_and_clamps() {
        let items: Vec<u32> = (1..=12).collect();
        let p = paginate(&items, 1, 5);
        assert_eq!(p.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.total_items, 12);

        let last = paginate(&items, 3, 5);
        assert_eq!(last.items, vec![11, 12]);

        let past_end = paginate(&items, 9, 5);
        assert_eq!(past_end.page, 3);
        assert_eq!(past_end.items, vec![11, 12]);

        let zero = paginate(&items, 0, 5);
        assert_eq!(zero.page, 1);
    }

    #[test]
    fn paginate_empty_list_has_one_empty_page() {
        let p = paginate::<u32>(&[], 4, 5);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert!(p.items.is_empty());
    }

    #[test]
    fn paginate_guards_zero_page_size() {
        let p = paginate(&[1, 2, 3], 2, 0);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.items, vec![2]);
    }

    #[test]
    fn description_formats() {
        let at = datetime!(2025-03-07 12:30 UTC);
        assert_eq!(describe("Almuerzo", Some("Ensalada"), at), "Almuerzo - Ensalada - 07/03/2025");
        assert_eq!(describe("Cena", Some("  "), at), "Cena - 07/03/2025");
        assert_eq!(describe("", None, at), "Comida - 07/03/2025");
    }

    #[test]
    fn recent_row_maps_rating_labels() {
        let at = datetime!(2025-01-02 08:00 UTC);
        let item: ConsumptionItem = RecentEntryRow {
            id: Uuid::new_v4(),
            meal_type: "Desayuno".into(),
            name: Some("Avena".into()),
            rating: Some("Alta".into()),
            created_at: at,
        }
        .into();
        assert_eq!(item.rating, Some(Rating::Alta));
        assert_eq!(item.description, "Desayuno - Avena - 02/01/2025");

        let unrated: ConsumptionItem = RecentEntryRow {
            id: Uuid::new_v4(),
            meal_type: "Snack".into(),
            name: None,
            rating: None,
            created_at: at,
        }
        .into();
        assert_eq!(unrated.rating, None);
        assert_eq!(unrated.name, "");
    }
}
