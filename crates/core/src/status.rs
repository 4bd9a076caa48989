//! Status values and state machines for designs, campaigns and generation runs.
//!
//! Statuses are persisted as `TEXT`; [`FromStr`] parses the stored value and
//! `as_str` produces it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_text_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Return the stored text value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Unknown ", stringify!($name), ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

define_text_status! {
    /// Lifecycle of one per-platform design.
    DesignStatus {
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
    }
}

define_text_status! {
    /// Lifecycle of a campaign, derived from its designs.
    CampaignStatus {
        InProgress => "in_progress",
        Completed => "completed",
        PartiallyFailed => "partially_failed",
        Failed => "failed",
    }
}

define_text_status! {
    /// Lifecycle of a scheduled per-customer generation.
    GenerationRunStatus {
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

impl DesignStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DesignStatus::InProgress)
    }

    /// `in_progress -> completed | failed`; terminal states never move.
    pub fn can_transition(self, to: DesignStatus) -> bool {
        matches!(
            (self, to),
            (DesignStatus::InProgress, DesignStatus::Completed)
                | (DesignStatus::InProgress, DesignStatus::Failed)
        )
    }
}

impl GenerationRunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationRunStatus::Completed | GenerationRunStatus::Failed)
    }

    pub fn can_transition(self, to: GenerationRunStatus) -> bool {
        use GenerationRunStatus::*;
        matches!(
            (self, to),
            (Queued, Running) | (Queued, Failed) | (Running, Completed) | (Running, Failed)
        )
    }
}

impl CampaignStatus {
    /// Derive a campaign status from the statuses of its designs.
    ///
    /// Once all designs are terminal the campaign is `completed` (all
    /// succeeded), `failed` (all failed) or `partially_failed`. While some
    /// are still rendering it is `in_progress`, unless one has already
    /// failed, which makes it `partially_failed` straight away. An empty
    /// slice stays in progress.
    pub fn aggregate(designs: &[DesignStatus]) -> CampaignStatus {
        let failed = designs
            .iter()
            .filter(|s| **s == DesignStatus::Failed)
            .count();
        let pending = designs.iter().any(|s| !s.is_terminal());

        match (failed, pending) {
            _ if designs.is_empty() => CampaignStatus::InProgress,
            (0, true) => CampaignStatus::InProgress,
            (_, true) => CampaignStatus::PartiallyFailed,
            (0, false) => CampaignStatus::Completed,
            (n, false) if n == designs.len() => CampaignStatus::Failed,
            _ => CampaignStatus::PartiallyFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_status_round_trips_text() {
        for s in [
            DesignStatus::InProgress,
            DesignStatus::Completed,
            DesignStatus::Failed,
        ] {
            assert_eq!(s.as_str().parse::<DesignStatus>().unwrap(), s);
        }
    }

    #[test]
    fn unknown_design_status_rejected() {
        assert!("pending".parse::<DesignStatus>().is_err());
    }

    #[test]
    fn design_terminal_states_do_not_transition() {
        assert!(DesignStatus::InProgress.can_transition(DesignStatus::Completed));
        assert!(DesignStatus::InProgress.can_transition(DesignStatus::Failed));
        assert!(!DesignStatus::Failed.can_transition(DesignStatus::InProgress));
        assert!(!DesignStatus::Completed.can_transition(DesignStatus::Failed));
        assert!(!DesignStatus::Failed.can_transition(DesignStatus::Completed));
    }

    #[test]
    fn run_transitions() {
        use GenerationRunStatus::*;
        assert!(Queued.can_transition(Running));
        assert!(Running.can_transition(Completed));
        assert!(Queued.can_transition(Failed));
        assert!(!Completed.can_transition(Running));
        assert!(!Queued.can_transition(Completed));
    }

    #[test]
    fn aggregate_in_progress_while_any_pending() {
        let designs = [DesignStatus::Completed, DesignStatus::InProgress];
        assert_eq!(CampaignStatus::aggregate(&designs), CampaignStatus::InProgress);
        assert_eq!(CampaignStatus::aggregate(&[]), CampaignStatus::InProgress);
    }

    #[test]
    fn aggregate_terminal_outcomes() {
        use DesignStatus::*;
        assert_eq!(
            CampaignStatus::aggregate(&[Completed, Completed]),
            CampaignStatus::Completed
        );
        assert_eq!(CampaignStatus::aggregate(&[Failed, Failed]), CampaignStatus::Failed);
        assert_eq!(
            CampaignStatus::aggregate(&[Completed, Failed]),
            CampaignStatus::PartiallyFailed
        );
    }

    #[test]
    fn early_failure_marks_partial_while_pending() {
        use DesignStatus::*;
        assert_eq!(
            CampaignStatus::aggregate(&[InProgress, InProgress]),
            CampaignStatus::InProgress
        );
        assert_eq!(
            CampaignStatus::aggregate(&[InProgress, Failed]),
            CampaignStatus::PartiallyFailed
        );
    }

    #[test]
    fn campaign_status_serde_is_snake_case() {
        let json = serde_json::to_string(&CampaignStatus::PartiallyFailed).unwrap();
        assert_eq!(json, "\"partially_failed\"");
    }
}
