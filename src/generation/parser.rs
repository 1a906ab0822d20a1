//! Decomposition of generated itinerary text into day plans
//!
//! Generated text is loosely structured markdown. Lines are matched against
//! `Day <n>` headings, time-of-day slots, meal labels and transport labels;
//! everything else inside a day becomes an activity in the current slot.

use crate::models::DayPlan;

const MEAL_LABELS: [&str; 5] = ["breakfast", "brunch", "lunch", "dinner", "snack"];
const TRANSPORT_LABELS: [&str; 3] = ["transportation", "transport", "getting around"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Morning,
    Afternoon,
    Evening,
}

impl Slot {
    fn from_label(text: &str) -> Option<(Self, &str)> {
        [
            ("morning", Slot::Morning),
            ("afternoon", Slot::Afternoon),
            ("evening", Slot::Evening),
            ("night", Slot::Evening),
        ]
        .into_iter()
        .find_map(|(label, slot)| strip_label(text, label).map(|rest| (slot, rest)))
    }
}

/// Split itinerary text into day plans
///
/// Never returns an empty list: without any day heading, a skeleton of
/// `trip_days` empty plans (or one) is produced.
#[must_use]
pub fn structure_itinerary(raw_text: &str, trip_days: Option<u32>) -> Vec<DayPlan> {
    let mut plans: Vec<DayPlan> = Vec::new();
    let mut current: Option<usize> = None;
    let mut slot = Slot::Morning;

    for line in raw_text.lines() {
        let text = clean_line(line);
        if text.is_empty() {
            continue;
        }

        if let Some(day) = day_heading(&text) {
            let index = match plans.iter().position(|plan| plan.day == day) {
                Some(index) => index,
                None => {
                    plans.push(DayPlan::empty(day));
                    plans.len() - 1
                }
            };
            current = Some(index);
            slot = Slot::Morning;
            continue;
        }

        let Some(index) = current else {
            continue;
        };
        let plan = &mut plans[index];

        if let Some((next_slot, rest)) = Slot::from_label(&text) {
            slot = next_slot;
            if !rest.is_empty() {
                push_activity(plan, slot, rest);
            }
        } else if let Some((label, rest)) = find_label(&text, &MEAL_LABELS) {
            append_entry(&mut plan.meals, label, rest);
        } else if let Some((_, rest)) = find_label(&text, &TRANSPORT_LABELS) {
            append_entry(&mut plan.transportation, "details", rest);
        } else {
            push_activity(plan, slot, &text);
        }
    }

    if plans.is_empty() {
        let days = trip_days.unwrap_or(1).max(1);
        return (1..=days).map(DayPlan::empty).collect();
    }

    plans.sort_by_key(|plan| plan.day);
    plans
}

fn push_activity(plan: &mut DayPlan, slot: Slot, activity: &str) {
    let activities = match slot {
        Slot::Morning => &mut plan.morning_activities,
        Slot::Afternoon => &mut plan.afternoon_activities,
        Slot::Evening => &mut plan.evening_activities,
    };
    activities.push(activity.to_string());
}

fn append_entry(
    entries: &mut std::collections::BTreeMap<String, String>,
    label: &str,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    entries
        .entry(label.to_string())
        .and_modify(|existing| {
            existing.push_str("; ");
            existing.push_str(text);
        })
        .or_insert_with(|| text.to_string());
}

/// Strip markdown emphasis, heading markers and list bullets
fn clean_line(line: &str) -> String {
    let line = line.replace("**", "").replace("__", "");
    let text = line.trim().trim_start_matches('#').trim_start();
    strip_bullet(text)
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim()
        .to_string()
}

fn strip_bullet(text: &str) -> &str {
    for marker in ["- ", "* ", "• ", "+ "] {
        if let Some(rest) = text.strip_prefix(marker) {
            return rest;
        }
    }

    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &text[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest;
        }
    }

    text
}

/// Case-insensitive label match on a word boundary, returning the text after it
fn strip_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let prefix = text.get(..label.len())?;
    if !prefix.eq_ignore_ascii_case(label) {
        return None;
    }

    let rest = &text[label.len()..];
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }

    Some(
        rest.trim_start_matches([':', '-', '–', '—', ' ', '\t'])
            .trim(),
    )
}

fn find_label<'a>(text: &'a str, labels: &[&'static str]) -> Option<(&'static str, &'a str)> {
    labels
        .iter()
        .find_map(|label| strip_label(text, label).map(|rest| (*label, rest)))
}

fn day_heading(text: &str) -> Option<u32> {
    let rest = strip_label(text, "day")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok().filter(|day| *day > 0)
}
