use crate::core::assign::{assign_group, rng_for};
use crate::core::invite::{compose_announcement, compose_invitation, details_request_body, MeetingDetails};
use crate::core::recorder::{record_selection, reset_selections};
use crate::domain::model::{DrawRequest, Group, Invitation, Roster};
use crate::domain::ports::{Notifier, RosterStore};
use crate::utils::error::{Result, RosterError};

/// What to put in the message sent to a drawn group.
#[derive(Debug, Clone)]
pub struct MessagePlan {
    pub subject: String,
    pub details: Option<MeetingDetails>,
    pub location_notes: Option<String>,
    pub topics: Vec<String>,
}

impl MessagePlan {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            details: None,
            location_notes: None,
            topics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub group: Group,
    /// (identity, display name) in group order
    pub members: Vec<(String, String)>,
    pub receipt: Option<String>,
}

pub struct DrawEngine<S: RosterStore, N: Notifier> {
    store: S,
    notifier: N,
}

impl<S: RosterStore, N: Notifier> DrawEngine<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Draws a group without recording it or sending anything.
    pub async fn preview(&self, request: &DrawRequest) -> Result<DrawOutcome> {
        let roster = self.store.load().await?;
        let group = draw(&roster, request)?;
        let members = roster.display_names(&group);

        Ok(DrawOutcome {
            group,
            members,
            receipt: None,
        })
    }

    /// Load, draw, record, save, then deliver the invitation.
    pub async fn run(&self, request: &DrawRequest, plan: &MessagePlan) -> Result<DrawOutcome> {
        tracing::info!("Loading roster...");
        let mut roster = self.store.load().await?;
        tracing::info!(records = roster.len(), "Roster loaded");

        let group = draw(&roster, request)?;
        let members = roster.display_names(&group);

        record_selection(&mut roster, &group)?;
        self.store.save(&roster).await?;
        tracing::info!("Roster saved");

        let body = match &plan.details {
            Some(details) => {
                compose_invitation(details, plan.location_notes.as_deref(), &plan.topics)
            }
            None => compose_announcement(&members),
        };
        let invitation = Invitation {
            recipients: group.members().to_vec(),
            subject: plan.subject.clone(),
            body,
        };
        let receipt = self.notifier.deliver(&invitation).await?;
        tracing::info!(receipt = %receipt, "Invitation delivered");

        Ok(DrawOutcome {
            group,
            members,
            receipt: Some(receipt),
        })
    }

    pub async fn reset(&self) -> Result<usize> {
        let mut roster = self.store.load().await?;
        reset_selections(&mut roster);
        self.store.save(&roster).await?;
        Ok(roster.len())
    }

    /// Sends the organizer the message asking for date, time and location.
    pub async fn request_details(&self, organizer: &str, subject: &str) -> Result<String> {
        let invitation = Invitation {
            recipients: vec![organizer.to_string()],
            subject: subject.to_string(),
            body: details_request_body(),
        };
        self.notifier.deliver(&invitation).await
    }

    pub async fn load_roster(&self) -> Result<Roster> {
        self.store.load().await
    }
}

fn draw(roster: &Roster, request: &DrawRequest) -> Result<Group> {
    let mut rng = rng_for(request);
    let group = assign_group(roster, request, &mut rng)?;

    // 空名單由呼叫端視為錯誤，不記錄也不寄送
    if group.is_empty() {
        return Err(RosterError::EmptyRoster);
    }
    if group.len() < request.group_size {
        tracing::warn!(
            requested = request.group_size,
            produced = group.len(),
            "Group is smaller than requested"
        );
    }

    Ok(group)
}
