use crate::input::Control;
use crate::sim::SessionStatus;
use crate::snapshot::RenderSnapshot;
use crate::speed::SpeedMultiplier;

/// Text and enablement for the primary control for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub status_text: &'static str,
    pub primary_label: &'static str,
    pub primary_enabled: bool,
}

pub const STARTING: StatusPresentation = StatusPresentation {
    status_text: "Starting...",
    primary_label: "Starting...",
    primary_enabled: false,
};

pub fn status_presentation(status: SessionStatus) -> StatusPresentation {
    let (status_text, primary_label) = match status {
        SessionStatus::NotStarted => ("Press Play to Start", "Play"),
        SessionStatus::Playing => ("Playing", "Pause"),
        SessionStatus::Paused => ("Paused", "Resume"),
        SessionStatus::Won => ("You Won!", "Play Again"),
        SessionStatus::Lost => ("Game Over", "Play Again"),
    };
    StatusPresentation {
        status_text,
        primary_label,
        primary_enabled: true,
    }
}

/// Everything the on-screen indicators show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators {
    pub status_text: String,
    pub primary_label: String,
    pub primary_enabled: bool,
    pub score_text: String,
    pub best_text: String,
    pub speed_text: String,
    pub speed_down_enabled: bool,
    pub speed_up_enabled: bool,
}

impl Indicators {
    pub fn derive(snapshot: &RenderSnapshot, speed: &SpeedMultiplier, high_score: u32) -> Self {
        let presentation = status_presentation(snapshot.status);
        Self {
            status_text: presentation.status_text.to_string(),
            primary_label: presentation.primary_label.to_string(),
            primary_enabled: presentation.primary_enabled,
            score_text: snapshot.points.to_string(),
            best_text: high_score.max(snapshot.points).to_string(),
            speed_text: format!("Speed: {}x", speed.value()),
            speed_down_enabled: !speed.at_min(),
            speed_up_enabled: !speed.at_max(),
        }
    }

    /// Same indicators with the primary control locked while a session spins up.
    pub fn starting(mut self) -> Self {
        self.status_text = STARTING.status_text.to_string();
        self.primary_label = STARTING.primary_label.to_string();
        self.primary_enabled = STARTING.primary_enabled;
        self
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::Primary => self.primary_enabled,
            Control::SpeedDown => self.speed_down_enabled,
            Control::SpeedUp => self.speed_up_enabled,
        }
    }
}
