use proptest::prelude::*;
use roster_draw::core::assign::{assign_group, rng_for};
use roster_draw::core::recorder::{record_selection, reset_selections};
use roster_draw::{DrawRequest, Roster, StudentRecord};
use std::collections::HashSet;

/// 隨機名單：identity 不重複，偶爾夾雜空白 identity
fn roster_strategy() -> impl Strategy<Value = Roster> {
    prop::collection::vec(
        (
            any::<bool>(),
            prop::option::of(prop::sample::select(vec!["A", "B", "C"])),
            0u32..4,
        ),
        0..25,
    )
    .prop_map(|rows| {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, (blank, section, count))| {
                let identity = if blank && i % 5 == 0 {
                    String::new()
                } else {
                    format!("student{}@example.com", i)
                };
                let record = StudentRecord::new(identity, format!("Student {}", i))
                    .with_selection_count(count);
                match section {
                    Some(s) => record.with_section(s),
                    None => record,
                }
            })
            .collect();
        Roster::new(records)
    })
}

proptest! {
    #[test]
    fn group_size_uniqueness_and_membership(
        roster in roster_strategy(),
        group_size in 1usize..12,
        use_sections in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let request = DrawRequest::new(group_size).stratified(use_sections).seeded(seed);
        let group = assign_group(&roster, &request, &mut rng_for(&request)).unwrap();

        let valid = roster.valid_records().count();
        prop_assert_eq!(group.len(), group_size.min(valid));

        let unique: HashSet<&str> = group.iter().collect();
        prop_assert_eq!(unique.len(), group.len());

        for member in group.iter() {
            prop_assert!(roster.find(member).is_some());
        }
    }

    #[test]
    fn same_seed_same_group(
        roster in roster_strategy(),
        group_size in 1usize..8,
        use_sections in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let request = DrawRequest::new(group_size).stratified(use_sections).seeded(seed);
        let first = assign_group(&roster, &request, &mut rng_for(&request)).unwrap();
        let second = assign_group(&roster, &request, &mut rng_for(&request)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn eligible_records_fill_first(
        roster in roster_strategy(),
        group_size in 1usize..8,
        use_sections in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let counts: Vec<u32> = roster.valid_records().map(|r| r.selection_count).collect();
        let (Some(&min), Some(&max)) = (counts.iter().min(), counts.iter().max()) else {
            return Ok(());
        };
        prop_assume!(min != max);

        let eligible = counts.iter().filter(|&&c| c < max).count();
        let request = DrawRequest::new(group_size).stratified(use_sections).seeded(seed);
        let group = assign_group(&roster, &request, &mut rng_for(&request)).unwrap();

        let at_max = group
            .iter()
            .filter(|m| roster.find(m).map(|r| r.selection_count) == Some(max))
            .count();
        prop_assert_eq!(at_max, group.len().saturating_sub(eligible));
    }

    #[test]
    fn recording_adds_exactly_one_to_members(
        roster in roster_strategy(),
        group_size in 1usize..8,
        seed in any::<u64>(),
    ) {
        let request = DrawRequest::new(group_size).seeded(seed);
        let group = assign_group(&roster, &request, &mut rng_for(&request)).unwrap();

        let mut recorded = roster.clone();
        record_selection(&mut recorded, &group).unwrap();

        for (before, after) in roster.records.iter().zip(&recorded.records) {
            let bump = u32::from(before.is_valid() && group.contains(&before.identity));
            prop_assert_eq!(after.selection_count, before.selection_count + bump);
            prop_assert_eq!(&after.identity, &before.identity);
            prop_assert_eq!(&after.section, &before.section);
        }
    }

    #[test]
    fn reset_is_idempotent(roster in roster_strategy()) {
        let mut once = roster.clone();
        reset_selections(&mut once);
        let mut twice = once.clone();
        reset_selections(&mut twice);

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.records.iter().all(|r| r.selection_count == 0));
        prop_assert_eq!(once.len(), roster.len());
    }
}
