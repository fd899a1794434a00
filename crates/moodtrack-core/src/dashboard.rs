//! Role-specific dashboards.
//!
//! Every user gets a personal dashboard. Managers additionally see their
//! service, directors the departments, entities or cluster they run. The
//! set of roles is closed, so the dashboard is an enum with one variant per
//! rendering strategy rather than a bag of optional sections.

use anyhow::Result;
use futures::future::try_join_all;
use tracing::debug;

use crate::api::ApiClient;
use crate::models::{Collaborator, Emotion, EmotionOverview, EmotionType, OrgUnitKind, Role, UnitOverview};
use crate::period::{submission_eligibility, Eligibility};

/// Organizational levels each role can roll up
pub fn unit_scopes(role: Role) -> &'static [OrgUnitKind] {
    match role {
        Role::Employee => &[],
        Role::Manager => &[OrgUnitKind::Service],
        Role::Director => &[OrgUnitKind::Department, OrgUnitKind::Entity],
        Role::PoleDirector => &[OrgUnitKind::Cluster],
    }
}

/// What every user sees about themselves
#[derive(Debug, Clone)]
pub struct PersonalDashboard {
    pub user: Collaborator,
    pub overview: EmotionOverview,
    pub today: Vec<Emotion>,
    pub emotion_types: Vec<EmotionType>,
}

impl PersonalDashboard {
    pub async fn load(api: &ApiClient, user: Collaborator) -> Result<Self> {
        let (overview, today, emotion_types) = futures::try_join!(
            api.emotion_overview(),
            api.today_emotions(),
            api.emotion_types(),
        )?;
        Ok(Self {
            user,
            overview,
            today,
            emotion_types,
        })
    }

    pub fn eligibility(&self, hour: u32) -> Eligibility {
        submission_eligibility(hour, &self.today)
    }

    /// Record a fresh submission without refetching
    pub fn record_submission(&mut self, emotion: Emotion) {
        self.today.retain(|e| e.id != emotion.id);
        self.today.push(emotion);
    }
}

/// Roll-ups for one organizational level
#[derive(Debug, Clone)]
pub struct UnitSection {
    pub kind: OrgUnitKind,
    pub units: Vec<UnitOverview>,
}

impl UnitSection {
    pub async fn load(api: &ApiClient, kind: OrgUnitKind) -> Result<Self> {
        let units = api.unit_overviews(kind).await?;
        debug!(kind = kind.label(), count = units.len(), "Unit overviews loaded");
        Ok(Self { kind, units })
    }

    pub fn empty(kind: OrgUnitKind) -> Self {
        Self {
            kind,
            units: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManagerDashboard {
    pub personal: PersonalDashboard,
    pub service: UnitSection,
}

#[derive(Debug, Clone)]
pub struct DirectorDashboard {
    pub personal: PersonalDashboard,
    pub sections: Vec<UnitSection>,
}

#[derive(Debug, Clone)]
pub enum Dashboard {
    Employee(PersonalDashboard),
    Manager(ManagerDashboard),
    Director(DirectorDashboard),
}

impl Dashboard {
    /// Fetch everything the user's role needs, concurrently
    pub async fn load(api: &ApiClient, user: Collaborator) -> Result<Self> {
        let role = user.role;
        let scopes = unit_scopes(role);

        let (personal, mut sections) = futures::try_join!(
            PersonalDashboard::load(api, user),
            try_join_all(scopes.iter().map(|kind| UnitSection::load(api, *kind))),
        )?;

        Ok(match role {
            Role::Employee => Dashboard::Employee(personal),
            Role::Manager => Dashboard::Manager(ManagerDashboard {
                personal,
                service: sections
                    .pop()
                    .unwrap_or_else(|| UnitSection::empty(OrgUnitKind::Service)),
            }),
            Role::Director | Role::PoleDirector => {
                Dashboard::Director(DirectorDashboard { personal, sections })
            }
        })
    }

    pub fn personal(&self) -> &PersonalDashboard {
        match self {
            Dashboard::Employee(p) => p,
            Dashboard::Manager(m) => &m.personal,
            Dashboard::Director(d) => &d.personal,
        }
    }

    pub fn personal_mut(&mut self) -> &mut PersonalDashboard {
        match self {
            Dashboard::Employee(p) => p,
            Dashboard::Manager(m) => &mut m.personal,
            Dashboard::Director(d) => &mut d.personal,
        }
    }

    pub fn role(&self) -> Role {
        self.personal().user.role
    }

    /// Unit roll-ups visible to this user, in display order
    pub fn unit_sections(&self) -> Vec<&UnitSection> {
        match self {
            Dashboard::Employee(_) => Vec::new(),
            Dashboard::Manager(m) => vec![&m.service],
            Dashboard::Director(d) => d.sections.iter().collect(),
        }
    }

    /// Level whose collaborator list the team view pages through
    pub fn collaborator_scope(&self) -> Option<OrgUnitKind> {
        unit_scopes(self.role()).first().copied()
    }
}
