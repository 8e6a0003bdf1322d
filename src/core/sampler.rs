use crate::domain::model::{Group, StudentRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// 抽樣結果，leftovers 為未被抽中的可選名單 (供補位優先使用)
#[derive(Debug, Clone)]
pub struct Sample<'a> {
    pub group: Group,
    pub leftovers: Vec<&'a StudentRecord>,
}

/// Uniform sample without replacement, ignoring sections.
pub fn sample_flat<'a, R: Rng + ?Sized>(
    eligible: &[&'a StudentRecord],
    group_size: usize,
    rng: &mut R,
) -> Sample<'a> {
    let mut pool = eligible.to_vec();
    pool.shuffle(rng);

    let take = group_size.min(pool.len());
    let leftovers = pool.split_off(take);

    let mut group = Group::with_capacity(group_size);
    for record in pool {
        group.push(record.identity.clone());
    }

    Sample { group, leftovers }
}

/// Round-robin over sections, reshuffling the section order every round and
/// drawing one random member from each non-empty section in turn. Records
/// without a section share one bucket.
pub fn sample_stratified<'a, R: Rng + ?Sized>(
    eligible: &[&'a StudentRecord],
    group_size: usize,
    rng: &mut R,
) -> Sample<'a> {
    // BTreeMap 保證相同種子下分區順序一致
    let mut by_section: BTreeMap<Option<&str>, Vec<&'a StudentRecord>> = BTreeMap::new();
    for &record in eligible {
        let key = record
            .section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        by_section.entry(key).or_default().push(record);
    }

    tracing::debug!(sections = by_section.len(), "Partitioned eligible records");

    let mut buckets: Vec<Vec<&'a StudentRecord>> = by_section.into_values().collect();
    let mut group = Group::with_capacity(group_size);

    'rounds: while group.len() < group_size {
        let mut order: Vec<usize> = (0..buckets.len())
            .filter(|&i| !buckets[i].is_empty())
            .collect();
        if order.is_empty() {
            break;
        }
        order.shuffle(rng);

        for i in order {
            let bucket = &mut buckets[i];
            let pick = rng.gen_range(0..bucket.len());
            let record = bucket.swap_remove(pick);
            group.push(record.identity.clone());
            if group.len() == group_size {
                break 'rounds;
            }
        }
    }

    let leftovers = buckets.into_iter().flatten().collect();
    Sample { group, leftovers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn records(rows: &[(&str, Option<&str>)]) -> Vec<StudentRecord> {
        rows.iter()
            .map(|(identity, section)| {
                let record = StudentRecord::new(*identity, *identity);
                match section {
                    Some(s) => record.with_section(*s),
                    None => record,
                }
            })
            .collect()
    }

    #[test]
    fn test_flat_takes_at_most_group_size() {
        let owned = records(&[("a", None), ("b", None), ("c", None), ("d", None)]);
        let eligible: Vec<&StudentRecord> = owned.iter().collect();
        let mut rng = StdRng::seed_from_u64(7);

        let sample = sample_flat(&eligible, 3, &mut rng);
        assert_eq!(sample.group.len(), 3);
        assert_eq!(sample.leftovers.len(), 1);
        assert!(!sample.group.contains(&sample.leftovers[0].identity));
    }

    #[test]
    fn test_flat_short_pool_returns_everyone() {
        let owned = records(&[("a", None), ("b", None)]);
        let eligible: Vec<&StudentRecord> = owned.iter().collect();
        let mut rng = StdRng::seed_from_u64(7);

        let sample = sample_flat(&eligible, 5, &mut rng);
        assert_eq!(sample.group.len(), 2);
        assert!(sample.leftovers.is_empty());
    }

    #[test]
    fn test_stratified_alternates_sections() {
        let owned = records(&[
            ("a1", Some("A")),
            ("a2", Some("A")),
            ("a3", Some("A")),
            ("b1", Some("B")),
            ("b2", Some("B")),
            ("b3", Some("B")),
        ]);
        let eligible: Vec<&StudentRecord> = owned.iter().collect();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = sample_stratified(&eligible, 4, &mut rng);
            let from_a = sample.group.iter().filter(|m| m.starts_with('a')).count();
            // 兩輪各抽一 A 一 B
            assert_eq!(from_a, 2, "seed {seed}");
            assert_eq!(sample.group.len(), 4);
            assert_eq!(sample.leftovers.len(), 2);
        }
    }

    #[test]
    fn test_stratified_skips_exhausted_sections() {
        let owned = records(&[
            ("a1", Some("A")),
            ("b1", Some("B")),
            ("b2", Some("B")),
            ("b3", Some("B")),
            ("n1", None),
        ]);
        let eligible: Vec<&StudentRecord> = owned.iter().collect();
        let mut rng = StdRng::seed_from_u64(11);

        let sample = sample_stratified(&eligible, 5, &mut rng);
        assert_eq!(sample.group.len(), 5);
        assert!(sample.group.contains("a1"));
        assert!(sample.group.contains("n1"));
        assert!(sample.leftovers.is_empty());
    }

    #[test]
    fn test_blank_section_shares_bucket_with_missing_section() {
        let owned = records(&[("x", None), ("y", Some("  ")), ("z", Some("A"))]);
        let eligible: Vec<&StudentRecord> = owned.iter().collect();

        // 只有兩個分區，第一輪必抽到 z
        for seed in 0..20 {
            let sample = sample_stratified(&eligible, 2, &mut StdRng::seed_from_u64(seed));
            assert!(sample.group.contains("z"));
            assert_eq!(sample.leftovers.len(), 1);
            assert_ne!(sample.leftovers[0].identity, "z");
        }
    }

    #[test]
    fn test_same_seed_same_sample() {
        let owned = records(&[
            ("a1", Some("A")),
            ("a2", Some("A")),
            ("b1", Some("B")),
            ("c1", Some("C")),
            ("c2", Some("C")),
        ]);
        let eligible: Vec<&StudentRecord> = owned.iter().collect();

        let first = sample_stratified(&eligible, 3, &mut StdRng::seed_from_u64(42));
        let second = sample_stratified(&eligible, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(first.group, second.group);
    }
}
