use serde::{Deserialize, Serialize};

/// Ticket lifecycle status. Carried on the wire as `0 | 1 | 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TicketStatus {
    Pending,
    InProgress,
    Solved,
}

impl TicketStatus {
    pub const fn code(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Solved => 2,
        }
    }

    /// Display label shown next to a ticket, matching the server's vocabulary.
    pub const fn text(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Solved => "Solved",
        }
    }
}

impl From<TicketStatus> for u8 {
    fn from(value: TicketStatus) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for TicketStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Solved),
            other => Err(format!("invalid ticket status code {other}")),
        }
    }
}
