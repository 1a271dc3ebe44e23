use serde::Serialize;

use crate::meals::repo_types::Meal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealMetrics {
    pub total_of_meals: i64,
    pub in_diet_meals: i64,
    pub out_of_diet_meals: i64,
    pub best_sequence: String,
}

impl MealMetrics {
    /// `in_diet_meals` comes from its own count query rather than from the
    /// ledger, so both are taken as given.
    pub fn compute(ledger: &[Meal], in_diet_meals: i64) -> Self {
        let flags: Vec<bool> = ledger.iter().map(|m| m.within_diet).collect();
        let total_of_meals = ledger.len() as i64;
        Self {
            total_of_meals,
            in_diet_meals,
            out_of_diet_meals: total_of_meals - in_diet_meals,
            best_sequence: format!(" {} meals", best_sequence(&flags)),
        }
    }
}

/// Streak length reported as `best_sequence`.
///
/// Each `false` flushes the running count into `counts` and resets it. While
/// `counts` holds at most one entry, every `true` overwrites that entry with
/// the running count; once a second entry exists, trailing runs that are
/// never flushed are not seen. The result is the maximum of `counts`, or 0 for
/// an empty ledger.
pub fn best_sequence(flags: &[bool]) -> usize {
    let mut counts: Vec<usize> = Vec::new();
    let mut count = 0;
    for &in_diet in flags {
        if in_diet {
            count += 1;
            if counts.is_empty() {
                counts.push(count);
            }
            if counts.len() == 1 {
                counts[0] = count;
            }
        } else {
            counts.push(count);
            count = 0;
        }
    }
    counts.into_iter().max().unwrap_or(0)
}
