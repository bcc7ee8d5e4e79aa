use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Original, // Initiator to responder
    Reply,    // Responder to initiator
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Syn,
    SynAck,
    Ack,
}

impl PacketKind {
    fn prefix(&self) -> &'static str {
        match self {
            PacketKind::Syn => "syn",
            PacketKind::SynAck => "syn/ack",
            PacketKind::Ack => "ack",
        }
    }
}

/// A packet kind seen in a given direction; drives one column of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventCategory {
    pub kind: PacketKind,
    pub direction: Direction,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::new(PacketKind::Syn, Direction::Original),
        EventCategory::new(PacketKind::SynAck, Direction::Original),
        EventCategory::new(PacketKind::Ack, Direction::Original),
        EventCategory::new(PacketKind::Syn, Direction::Reply),
        EventCategory::new(PacketKind::SynAck, Direction::Reply),
        EventCategory::new(PacketKind::Ack, Direction::Reply),
    ];

    pub const fn new(kind: PacketKind, direction: Direction) -> Self {
        Self { kind, direction }
    }

    /// Edge label, e.g. `syn/ack_o` or `ack_r`.
    pub fn label(&self) -> &'static str {
        match (self.kind, self.direction) {
            (PacketKind::Syn, Direction::Original) => "syn_o",
            (PacketKind::SynAck, Direction::Original) => "syn/ack_o",
            (PacketKind::Ack, Direction::Original) => "ack_o",
            (PacketKind::Syn, Direction::Reply) => "syn_r",
            (PacketKind::SynAck, Direction::Reply) => "syn/ack_r",
            (PacketKind::Ack, Direction::Reply) => "ack_r",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            Direction::Original => "original",
            Direction::Reply => "reply",
        };
        write!(f, "{} ({})", self.kind.prefix().to_uppercase(), dir)
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use crate::conntrack::event::{Direction, EventCategory, PacketKind};

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = EventCategory::ALL.iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["syn_o", "syn/ack_o", "ack_o", "syn_r", "syn/ack_r", "ack_r"]);

        let event = EventCategory::new(PacketKind::SynAck, Direction::Reply);
        assert_eq!(event.to_string(), "SYN/ACK (reply)");
    }
}
