use crate::core::eligibility::split_by_eligibility;
use crate::core::sampler::{sample_flat, sample_stratified, Sample};
use crate::domain::model::{DrawRequest, Group, Roster, StudentRecord};
use crate::utils::error::{Result, RosterError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Builds the random source for one draw: seeded when the request carries a
/// seed, OS entropy otherwise.
pub fn rng_for(request: &DrawRequest) -> StdRng {
    match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws one group from `roster`.
///
/// Pure with respect to `roster`: nothing is recorded here. A roster with no
/// valid records yields an empty group, and a roster smaller than the
/// requested size yields every valid record.
pub fn assign_group<R: Rng + ?Sized>(
    roster: &Roster,
    request: &DrawRequest,
    rng: &mut R,
) -> Result<Group> {
    let group_size = request.group_size;
    if group_size == 0 {
        return Err(RosterError::InvalidGroupSize { size: group_size });
    }
    if let Some(identity) = roster.first_duplicate() {
        return Err(RosterError::DuplicateIdentity {
            identity: identity.to_string(),
        });
    }

    let split = split_by_eligibility(roster);
    tracing::debug!(
        eligible = split.eligible.len(),
        ineligible = split.ineligible.len(),
        group_size,
        use_sections = request.use_sections,
        "Sampling group"
    );

    let Sample { mut group, leftovers } = if request.use_sections {
        sample_stratified(&split.eligible, group_size, rng)
    } else {
        sample_flat(&split.eligible, group_size, rng)
    };

    if group.len() < group_size {
        backfill(&mut group, group_size, leftovers, split.ineligible, rng);
    }

    if group.len() > group_size {
        return Err(RosterError::SizeInvariantViolation {
            expected: group_size,
            actual: group.len(),
        });
    }

    Ok(group)
}

/// 補位：先用剩餘可選者，再用本輪被排除者，各自隨機順序
fn backfill<R: Rng + ?Sized>(
    group: &mut Group,
    group_size: usize,
    mut leftovers: Vec<&StudentRecord>,
    mut ineligible: Vec<&StudentRecord>,
    rng: &mut R,
) {
    let needed = group_size - group.len();
    leftovers.shuffle(rng);
    ineligible.shuffle(rng);

    let mut added = 0;
    for record in leftovers.into_iter().chain(ineligible) {
        if group.len() == group_size {
            break;
        }
        if group.contains(&record.identity) {
            continue;
        }
        group.push(record.identity.clone());
        added += 1;
    }

    if group.len() < group_size {
        tracing::warn!(
            requested = group_size,
            produced = group.len(),
            "Roster exhausted before reaching the requested group size"
        );
    } else {
        tracing::warn!(needed, added, "Backfilled group from outside the eligibility window");
    }
}
