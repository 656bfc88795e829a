//! Criterion matching and cross-calendar event equivalence.
//!
//! Two events on different calendars are "the same" when their title,
//! location, content, start and end are identical. Server ids never take
//! part, since a copy gets a fresh id on the target calendar.

use crate::criterion::CopyCriterion;
use crate::event::Event;

/// Whether the criterion pattern is found in the event's selected field.
///
/// An absent or empty field never matches, whatever the pattern.
pub fn matches(event: &Event, criterion: &CopyCriterion) -> bool {
    match criterion.field().text(event) {
        Some(text) if !text.is_empty() => criterion.regex().is_match(text),
        _ => false,
    }
}

/// Exact equality on the five identity fields.
///
/// An absent text field is treated as the empty string, because remote
/// services disagree on whether a blank location is omitted or sent empty.
pub fn is_equivalent(a: &Event, b: &Event) -> bool {
    text_eq(a.title.as_deref(), b.title.as_deref())
        && text_eq(a.location.as_deref(), b.location.as_deref())
        && text_eq(a.content.as_deref(), b.content.as_deref())
        && a.start == b.start
        && a.end == b.end
}

/// First event in `candidates` equivalent to `event`.
pub fn find_equivalent<'a>(event: &Event, candidates: &'a [Event]) -> Option<&'a Event> {
    candidates.iter().find(|candidate| is_equivalent(event, candidate))
}

fn text_eq(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or_default() == b.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::CriterionField;
    use crate::event::{Attendee, EventStatus, EventTime};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(hour: u32) -> EventTime {
        EventTime::DateTime(Utc.with_ymd_and_hms(2030, 6, 1, hour, 0, 0).unwrap())
    }

    fn team_sync() -> Event {
        Event::new("Team Sync", at(9), at(10))
            .with_location("Room 4")
            .with_content("Agenda in doc")
    }

    #[test]
    fn test_matches_searches_selected_field_only() {
        let event = team_sync();

        let by_title = CopyCriterion::new(CriterionField::Title, "Sync").unwrap();
        let by_location = CopyCriterion::new(CriterionField::Location, "Sync").unwrap();
        let by_content = CopyCriterion::new(CriterionField::Content, "doc$").unwrap();

        assert!(matches(&event, &by_title));
        assert!(!matches(&event, &by_location));
        assert!(matches(&event, &by_content));
    }

    #[test]
    fn test_absent_or_empty_field_never_matches() {
        let mut event = team_sync();
        event.location = None;
        event.content = Some(String::new());

        for pattern in ["", ".*", "^$", "Room"] {
            let location = CopyCriterion::new(CriterionField::Location, pattern).unwrap();
            let content = CopyCriterion::new(CriterionField::Content, pattern).unwrap();
            assert!(!matches(&event, &location), "location matched {pattern:?}");
            assert!(!matches(&event, &content), "content matched {pattern:?}");
        }
    }

    #[test]
    fn test_pattern_is_a_regex_search_not_full_match() {
        let criterion = CopyCriterion::new(CriterionField::Title, r"S\w+c").unwrap();
        assert!(matches(&team_sync(), &criterion));

        let anchored = CopyCriterion::new(CriterionField::Title, "^Sync").unwrap();
        assert!(!matches(&team_sync(), &anchored));
    }

    #[test]
    fn test_equivalence_ignores_metadata() {
        let a = team_sync().with_id("source-1");
        let mut b = team_sync().with_id("target-9");
        b.status = EventStatus::Tentative;
        b.updated = Some(Utc::now());
        b.attendees.push(Attendee {
            name: None,
            email: "bob@example.com".to_string(),
        });

        assert!(is_equivalent(&a, &b));
    }

    #[test]
    fn test_equivalence_treats_absent_text_as_empty() {
        let mut a = team_sync();
        let mut b = team_sync();
        a.location = None;
        b.location = Some(String::new());

        assert!(is_equivalent(&a, &b));
    }

    #[test]
    fn test_equivalence_distinguishes_each_identity_field() {
        let base = team_sync();

        let changed = vec![
            Event { title: Some("Team Sync!".into()), ..base.clone() },
            Event { location: Some("Room 5".into()), ..base.clone() },
            Event { content: None, ..base.clone() },
            Event { start: at(8), ..base.clone() },
            Event { end: at(11), ..base.clone() },
        ];

        for other in changed {
            assert!(!is_equivalent(&base, &other), "{other:?}");
        }
    }

    #[test]
    fn test_find_equivalent_returns_first_hit() {
        let candidates = vec![
            Event::new("Other", at(9), at(10)),
            team_sync().with_id("first"),
            team_sync().with_id("second"),
        ];

        let found = find_equivalent(&team_sync(), &candidates).unwrap();
        assert_eq!(found.id.as_deref(), Some("first"));

        assert!(find_equivalent(&team_sync(), &candidates[..1]).is_none());
        assert!(find_equivalent(&team_sync(), &[]).is_none());
    }

    fn arb_text() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-zA-Z ]{0,12}")
    }

    fn arb_time() -> impl Strategy<Value = EventTime> {
        (0i64..10_000).prop_map(|minutes| {
            let base: DateTime<Utc> = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
            EventTime::DateTime(base + Duration::minutes(minutes))
        })
    }

    prop_compose! {
        fn arb_event()(
            title in arb_text(),
            location in arb_text(),
            content in arb_text(),
            start in arb_time(),
            end in arb_time(),
            id in proptest::option::of("[a-z0-9]{8}"),
        ) -> Event {
            Event {
                id,
                title,
                location,
                content,
                start,
                end,
                status: EventStatus::Confirmed,
                attendees: Vec::new(),
                updated: None,
            }
        }
    }

    fn arb_field() -> impl Strategy<Value = CriterionField> {
        prop_oneof![
            Just(CriterionField::Title),
            Just(CriterionField::Location),
            Just(CriterionField::Content),
        ]
    }

    proptest! {
        #[test]
        fn prop_equivalence_is_reflexive(event in arb_event()) {
            prop_assert!(is_equivalent(&event, &event));
        }

        #[test]
        fn prop_equivalence_is_symmetric(a in arb_event(), b in arb_event()) {
            prop_assert_eq!(is_equivalent(&a, &b), is_equivalent(&b, &a));
        }

        #[test]
        fn prop_equivalence_ignores_non_identity_fields(
            event in arb_event(),
            other_id in proptest::option::of("[a-z0-9]{8}"),
        ) {
            let mut other = event.clone();
            other.id = other_id;
            other.status = EventStatus::Cancelled;
            other.updated = Some(Utc::now());
            prop_assert!(is_equivalent(&event, &other));
        }

        #[test]
        fn prop_matches_depends_only_on_selected_field(
            event in arb_event(),
            noise in arb_event(),
            field in arb_field(),
            pattern in "[a-z]{1,3}",
        ) {
            let criterion = CopyCriterion::new(field, &pattern).unwrap();

            // Keep the selected field, replace everything else.
            let mut other = noise;
            match field {
                CriterionField::Title => other.title = event.title.clone(),
                CriterionField::Location => other.location = event.location.clone(),
                CriterionField::Content => other.content = event.content.clone(),
            }

            prop_assert_eq!(matches(&event, &criterion), matches(&other, &criterion));
        }
    }
}
