//! Field-level change lists for update entries

use serde::Serialize;
use serde_json::Value;

use crate::error::BackofficeResult;

/// Timestamps move on every save and would drown out the real change
const IGNORED_FIELDS: [&str; 2] = ["created_at", "updated_at"];

const MAX_VALUE_CHARS: usize = 40;

/// List the top-level fields that differ between two versions of a record
///
/// Each change reads `field: old -> new`. Fields absent on one side are
/// shown as `-`.
pub fn field_changes<T: Serialize>(before: &T, after: &T) -> BackofficeResult<Vec<String>> {
    let before = serde_json::to_value(before)?;
    let after = serde_json::to_value(after)?;

    let (Value::Object(before), Value::Object(after)) = (&before, &after) else {
        return Ok(if before == after {
            Vec::new()
        } else {
            vec![format!("{} -> {}", short(&before), short(&after))]
        });
    };

    let mut keys: Vec<&String> = before.keys().chain(after.keys()).collect();
    keys.sort();
    keys.dedup();

    Ok(keys
        .into_iter()
        .filter(|k| !IGNORED_FIELDS.contains(&k.as_str()))
        .filter_map(|key| {
            let old = before.get(key);
            let new = after.get(key);
            (old != new).then(|| {
                format!(
                    "{}: {} -> {}",
                    key,
                    old.map(short).unwrap_or_else(|| "-".into()),
                    new.map(short).unwrap_or_else(|| "-".into())
                )
            })
        })
        .collect())
}

fn short(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_VALUE_CHARS => {
            let head: String = s.chars().take(MAX_VALUE_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{}]", items.len()),
        Value::Object(_) => "{..}".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LaborItem, Money, PaymentStatus, Task};
    use chrono::NaiveDate;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_labor_edit_lists_recomputed_total() {
        let before = LaborItem::new("Leo", date(), 6.0, Money::from_cents(3000));
        let mut after = before.clone();
        after.set_hours_and_rate(8.0, Money::from_cents(3000));
        after.updated_at = chrono::Utc::now();

        let changes = field_changes(&before, &after).unwrap();
        assert_eq!(changes, vec!["hours: 6.0 -> 8.0", "total: 18000 -> 24000"]);
    }

    #[test]
    fn test_status_change_only() {
        let before = LaborItem::new("Leo", date(), 6.0, Money::from_cents(3000));
        let mut after = before.clone();
        after.set_status(PaymentStatus::Paid);

        let changes = field_changes(&before, &after).unwrap();
        assert_eq!(changes.len(), 1);
        assert!(changes[0].starts_with("status: "));
    }

    #[test]
    fn test_unchanged_record_has_no_changes() {
        let task = Task::new("Paint", date());
        assert!(field_changes(&task, &task.clone()).unwrap().is_empty());
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"name": "Cement", "old": 1});
        let after = json!({"name": "Cement", "link_url": "https://shop.example"});

        let changes = field_changes(&before, &after).unwrap();
        assert_eq!(
            changes,
            vec!["link_url: - -> \"https://shop.example\"", "old: 1 -> -"]
        );
    }

    #[test]
    fn test_long_text_and_lists_are_shortened() {
        let before = json!({"notes": "n".repeat(100), "comments": [1]});
        let after = json!({"notes": "short", "comments": [1, 2, 3]});

        let changes = field_changes(&before, &after).unwrap();
        assert_eq!(changes[0], "comments: [1] -> [3]");
        assert!(changes[1].starts_with(&format!("notes: \"{}...\"", "n".repeat(37))));
    }
}
