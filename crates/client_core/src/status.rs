use shared::domain::PlantResult;

/// Where the identify workflow currently stands. Loading never coexists with
/// a settled result or error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentifyStatus {
    #[default]
    Idle,
    Loading,
    Succeeded(PlantResult),
    Failed(String),
}

impl IdentifyStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, IdentifyStatus::Loading)
    }

    pub fn result(&self) -> Option<&PlantResult> {
        match self {
            IdentifyStatus::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            IdentifyStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        IdentifyStatus::Failed(message.into())
    }
}
