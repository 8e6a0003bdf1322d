use crate::domain::model::{Group, Roster};
use crate::utils::error::{Result, RosterError};

/// Adds one selection to every member of `group`.
///
/// All members are resolved before any count changes, so an unknown identity
/// leaves the roster untouched.
pub fn record_selection(roster: &mut Roster, group: &Group) -> Result<()> {
    let mut positions = Vec::with_capacity(group.len());
    for identity in group.iter() {
        let position = roster
            .records
            .iter()
            .position(|r| r.is_valid() && r.identity == identity)
            .ok_or_else(|| RosterError::UnknownIdentity {
                identity: identity.to_string(),
            })?;
        positions.push(position);
    }

    for position in positions {
        let record = &mut roster.records[position];
        record.selection_count = record.selection_count.saturating_add(1);
    }

    tracing::info!(members = group.len(), "Recorded selections");
    Ok(())
}

/// 將所有人的抽中次數歸零
pub fn reset_selections(roster: &mut Roster) {
    for record in &mut roster.records {
        record.selection_count = 0;
    }
    tracing::info!(records = roster.len(), "Selection counts reset");
}
