use crate::domain::model::{EligibilityWindow, Roster, StudentRecord};

/// 本輪可優先抽選與備援名單
#[derive(Debug, Clone, Default)]
pub struct EligibilitySplit<'a> {
    pub eligible: Vec<&'a StudentRecord>,
    pub ineligible: Vec<&'a StudentRecord>,
    pub window: Option<EligibilityWindow>,
}

/// Splits the valid records of `roster` by the current eligibility window.
/// Blank identities land in neither list.
pub fn split_by_eligibility(roster: &Roster) -> EligibilitySplit<'_> {
    let window = EligibilityWindow::from_records(roster.valid_records());

    let Some(window) = window else {
        return EligibilitySplit::default();
    };

    let (eligible, ineligible): (Vec<_>, Vec<_>) = roster
        .valid_records()
        .partition(|r| window.admits(r.selection_count));

    tracing::debug!(
        min = window.min_selection_count,
        max = window.max_selection_count,
        "Eligibility window computed"
    );

    EligibilitySplit {
        eligible,
        ineligible,
        window: Some(window),
    }
}
