use serde_json::Value;

use super::FormDraft;

/// Tabs of the product submission form, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProductStep {
    #[default]
    MainInfo,
    Media,
    Collaborators,
    Extras,
}

impl ProductStep {
    pub const ALL: [ProductStep; 4] = [
        ProductStep::MainInfo,
        ProductStep::Media,
        ProductStep::Collaborators,
        ProductStep::Extras,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ProductStep::MainInfo => "main",
            ProductStep::Media => "media",
            ProductStep::Collaborators => "collaborators",
            ProductStep::Extras => "extras",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.id() == id)
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|step| step == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

/// Multi-step product form. Moving between steps never touches the draft.
#[derive(Debug, Clone, Default)]
pub struct ProductWizard {
    pub draft: FormDraft,
    step: ProductStep,
}

impl ProductWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ProductStep {
        self.step
    }

    pub fn go_to(&mut self, step: ProductStep) {
        self.step = step;
    }

    /// Advance one step; stays put on the last one.
    pub fn next(&mut self) -> ProductStep {
        if let Some(step) = self.step.next() {
            self.step = step;
        }
        self.step
    }

    pub fn previous(&mut self) -> ProductStep {
        if let Some(step) = self.step.previous() {
            self.step = step;
        }
        self.step
    }

    pub fn team_members(&self) -> Vec<String> {
        string_list(self.draft.get("teamMembers"))
    }

    /// Add a collaborator by name. Returns false if already present.
    pub fn add_team_member(&mut self, name: &str) -> bool {
        let mut members = self.team_members();
        if members.iter().any(|member| member == name) {
            return false;
        }
        members.push(name.to_string());
        self.draft.set("teamMembers", members);
        true
    }

    pub fn remove_team_member(&mut self, name: &str) {
        let mut members = self.team_members();
        members.retain(|member| member != name);
        self.draft.set("teamMembers", members);
    }

    pub fn images(&self) -> Vec<String> {
        string_list(self.draft.get("images"))
    }

    /// Append an uploaded screenshot URL.
    pub fn add_image(&mut self, url: impl Into<String>) {
        let mut images = self.images();
        images.push(url.into());
        self.draft.set("images", images);
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
