use std::fmt;
use std::str::FromStr;
use crate::conntrack::errors::TableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CtState {
    // -- Opening states --
    NoConn,   // sNO: nothing seen yet
    SynSent,  // sSS: SYN seen in the original direction
    SynSent2, // sS2: SYN seen in both directions (simultaneous open)
    SynRecv,  // sSR: SYN/ACK seen in reply to a SYN

    // -- Steady state; opened --
    Established, // sES

    // -- Closing states --
    FinWait,   // sFW: FIN seen
    CloseWait, // sCW: ACK seen after FIN
    LastAck,   // sLA: FIN seen in both directions, waiting for the last ACK
    TimeWait,  // sTW: last ACK seen
    Close,     // sCL: RST seen

    // -- Verdicts, never a source --
    Invalid, // sIV
    Ignore,  // sIG
}

impl CtState {
    pub const ALL: [CtState; 12] = [
        CtState::NoConn,
        CtState::SynSent,
        CtState::SynSent2,
        CtState::SynRecv,
        CtState::Established,
        CtState::FinWait,
        CtState::CloseWait,
        CtState::LastAck,
        CtState::TimeWait,
        CtState::Close,
        CtState::Invalid,
        CtState::Ignore,
    ];

    /// States that appear as the source of a transition.
    pub const TRACKED: [CtState; 10] = [
        CtState::NoConn,
        CtState::SynSent,
        CtState::SynSent2,
        CtState::SynRecv,
        CtState::Established,
        CtState::FinWait,
        CtState::CloseWait,
        CtState::LastAck,
        CtState::TimeWait,
        CtState::Close,
    ];

    /// Short name used by the kernel transition comments, e.g. `sSS`.
    pub fn short_name(&self) -> &'static str {
        match self {
            CtState::NoConn => "sNO",
            CtState::SynSent => "sSS",
            CtState::SynSent2 => "sS2",
            CtState::SynRecv => "sSR",
            CtState::Established => "sES",
            CtState::FinWait => "sFW",
            CtState::CloseWait => "sCW",
            CtState::LastAck => "sLA",
            CtState::TimeWait => "sTW",
            CtState::Close => "sCL",
            CtState::Invalid => "sIV",
            CtState::Ignore => "sIG",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            CtState::NoConn => "NONE",
            CtState::SynSent => "SYN_SENT",
            CtState::SynSent2 => "SYN_SENT2",
            CtState::SynRecv => "SYN_RECV",
            CtState::Established => "ESTABLISHED",
            CtState::FinWait => "FIN_WAIT",
            CtState::CloseWait => "CLOSE_WAIT",
            CtState::LastAck => "LAST_ACK",
            CtState::TimeWait => "TIME_WAIT",
            CtState::Close => "CLOSE",
            CtState::Invalid => "INVALID",
            CtState::Ignore => "IGNORE",
        }
    }

    pub fn is_tracked(&self) -> bool {
        !matches!(self, CtState::Invalid | CtState::Ignore)
    }
}

impl AsRef<str> for CtState {
    fn as_ref(&self) -> &str {
        self.short_name()
    }
}

impl fmt::Display for CtState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.short_name())
    }
}

impl FromStr for CtState {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CtState::ALL
            .iter()
            .copied()
            .find(|state| state.short_name() == s)
            .ok_or_else(|| TableError::UnknownState(s.to_string()))
    }
}

// -- Unit tests --
