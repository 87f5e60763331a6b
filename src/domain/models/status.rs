use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of an interview request. The wire tokens are the
/// SCREAMING_SNAKE_CASE names and round-trip through both serde and the
/// database `status` column.
///
/// `Rescheduled` is accepted on the wire for display purposes but is never
/// stored: a reschedule is a regular transition that also carries a new
/// slot, flagged on the emitted lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    Pending,
    InterviewerAssigned,
    CandidateConfirmed,
    InterviewerConfirmed,
    Confirmed,
    Completed,
    Rejected,
    Cancelled,
    Rescheduled,
}

pub const ALL_STATUSES: [InterviewStatus; 9] = [
    InterviewStatus::Pending,
    InterviewStatus::InterviewerAssigned,
    InterviewStatus::CandidateConfirmed,
    InterviewStatus::InterviewerConfirmed,
    InterviewStatus::Confirmed,
    InterviewStatus::Completed,
    InterviewStatus::Rejected,
    InterviewStatus::Cancelled,
    InterviewStatus::Rescheduled,
];

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Pending => "PENDING",
            InterviewStatus::InterviewerAssigned => "INTERVIEWER_ASSIGNED",
            InterviewStatus::CandidateConfirmed => "CANDIDATE_CONFIRMED",
            InterviewStatus::InterviewerConfirmed => "INTERVIEWER_CONFIRMED",
            InterviewStatus::Confirmed => "CONFIRMED",
            InterviewStatus::Completed => "COMPLETED",
            InterviewStatus::Rejected => "REJECTED",
            InterviewStatus::Cancelled => "CANCELLED",
            InterviewStatus::Rescheduled => "RESCHEDULED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        ALL_STATUSES.iter().copied().find(|v| v.as_str() == s)
    }

    /// Terminal requests accept no further transition; they may still be
    /// read or deleted.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InterviewStatus::Completed | InterviewStatus::Rejected | InterviewStatus::Cancelled
        )
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Candidate,
    Interviewer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "CANDIDATE",
            Role::Interviewer => "INTERVIEWER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CANDIDATE" => Some(Role::Candidate),
            "INTERVIEWER" => Some(Role::Interviewer),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may trigger a given transition. `OwningCandidate` and
/// `AssignedInterviewer` bind the role to the specific request, so the
/// ownership checks live in the same table the legality checks do.
/// `System` marks transitions only the confirmation promotion may take;
/// no HTTP actor ever holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAuthority {
    Admin,
    OwningCandidate,
    AssignedInterviewer,
    System,
}

/// The single source of truth for which (from, to) pairs are legal and who
/// may invoke them. An empty slice means the pair is illegal.
pub fn authorities(from: InterviewStatus, to: InterviewStatus) -> &'static [TransitionAuthority] {
    use InterviewStatus::*;
    use TransitionAuthority::*;

    match (from, to) {
        (Pending, InterviewerAssigned) => &[Admin],
        (Pending, Rejected) => &[Admin],
        // Force-confirm, bypasses mutual confirmation.
        (Pending, Confirmed) => &[Admin],

        // Reassignment keeps the status and swaps the assignment.
        (InterviewerAssigned, InterviewerAssigned) => &[Admin],
        (InterviewerAssigned, CandidateConfirmed) => &[OwningCandidate],
        (InterviewerAssigned, InterviewerConfirmed) => &[AssignedInterviewer],
        // Decline: back into the unassigned pool, admin must act again.
        (InterviewerAssigned, Pending) => &[AssignedInterviewer],
        (InterviewerAssigned, Rejected) => &[Admin],

        (CandidateConfirmed, Confirmed) => &[System],
        (InterviewerConfirmed, Confirmed) => &[System],

        (Confirmed, Completed) => &[Admin, AssignedInterviewer],

        (Pending, Cancelled)
        | (InterviewerAssigned, Cancelled)
        | (CandidateConfirmed, Cancelled)
        | (InterviewerConfirmed, Cancelled)
        | (Confirmed, Cancelled) => &[OwningCandidate, Admin],

        _ => &[],
    }
}

/// Target statuses the holder of `held` authorities may move to from
/// `from`. This is what the permitted-actions endpoint serves, so UI code
/// never re-derives legality from status strings.
pub fn permitted_targets(
    from: InterviewStatus,
    held: &[TransitionAuthority],
) -> Vec<InterviewStatus> {
    ALL_STATUSES
        .iter()
        .copied()
        .filter(|to| {
            authorities(from, *to)
                .iter()
                .any(|a| held.contains(a))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use InterviewStatus::*;
    use TransitionAuthority::*;

    #[test]
    fn status_tokens_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(InterviewStatus::parse(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: InterviewStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
        assert_eq!(InterviewStatus::parse("BOOKED"), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(Completed.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!Confirmed.is_terminal());
    }

    #[test]
    fn table_contains_the_expected_rows() {
        assert_eq!(authorities(Pending, InterviewerAssigned), &[Admin]);
        assert_eq!(authorities(Pending, Confirmed), &[Admin]);
        assert_eq!(authorities(InterviewerAssigned, Pending), &[AssignedInterviewer]);
        assert_eq!(
            authorities(InterviewerAssigned, CandidateConfirmed),
            &[OwningCandidate]
        );
        assert_eq!(authorities(CandidateConfirmed, Confirmed), &[System]);
        assert_eq!(authorities(InterviewerConfirmed, Confirmed), &[System]);
        assert_eq!(authorities(Confirmed, Completed), &[Admin, AssignedInterviewer]);
        assert_eq!(authorities(Confirmed, Cancelled), &[OwningCandidate, Admin]);
    }

    #[test]
    fn unlisted_pairs_are_illegal() {
        assert!(authorities(Pending, Completed).is_empty());
        assert!(authorities(Confirmed, Rejected).is_empty());
        assert!(authorities(CandidateConfirmed, InterviewerConfirmed).is_empty());
        // Rescheduled is never a stored status, so nothing moves to it.
        for from in ALL_STATUSES {
            assert!(authorities(from, Rescheduled).is_empty());
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_transitions() {
        for from in [Completed, Rejected, Cancelled] {
            for to in ALL_STATUSES {
                assert!(
                    authorities(from, to).is_empty(),
                    "{from} -> {to} should be illegal"
                );
            }
        }
    }

    #[test]
    fn permitted_targets_follow_held_authorities() {
        let admin = permitted_targets(Pending, &[Admin]);
        assert!(admin.contains(&InterviewerAssigned));
        assert!(admin.contains(&Rejected));
        assert!(admin.contains(&Confirmed));
        assert!(admin.contains(&Cancelled));
        assert!(!admin.contains(&Completed));

        let owner = permitted_targets(InterviewerAssigned, &[OwningCandidate]);
        assert_eq!(owner, vec![CandidateConfirmed, Cancelled]);

        // System transitions never surface as actor-permitted actions.
        assert!(permitted_targets(CandidateConfirmed, &[Admin]).contains(&Cancelled));
        assert!(!permitted_targets(CandidateConfirmed, &[Admin]).contains(&Confirmed));

        assert!(permitted_targets(Completed, &[Admin]).is_empty());
    }
}
