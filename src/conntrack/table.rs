use crate::conntrack::event::{Direction, EventCategory, PacketKind};
use crate::conntrack::state::CtState;
use crate::conntrack::state::CtState::*;

type Row = (CtState, CtState);

// Transcribed from the TCP conntrack state table comments in
// net/netfilter/nf_conntrack_proto_tcp.c. Not verified against kernel behaviour.

const ORIG_SYN: [Row; 10] = [
    (NoConn, SynSent),     // Initialize a new connection
    (SynSent, SynSent),    // Retransmitted SYN
    (SynSent2, SynSent2),  // Late retransmitted SYN
    (SynRecv, Ignore),
    (Established, Ignore), // SYN in window outside SYN_SENT is an error
    (FinWait, Ignore),
    (CloseWait, Ignore),
    (LastAck, Ignore),
    (TimeWait, SynSent),   // Reopened connection (RFC 1122)
    (Close, SynSent),
];

const ORIG_SYN_ACK: [Row; 10] = [
    (NoConn, Invalid),     // Too late and no reason to do anything
    (SynSent, Invalid),    // Client can't send SYN and then SYN/ACK
    (SynSent2, SynRecv),   // SYN/ACK sent to SYN2 in simultaneous open
    (SynRecv, SynRecv),    // Late retransmitted SYN/ACK in simultaneous open
    (Established, Invalid),
    (FinWait, Invalid),
    (CloseWait, Invalid),
    (LastAck, Invalid),
    (TimeWait, Invalid),
    (Close, Invalid),
];

const ORIG_ACK: [Row; 10] = [
    (NoConn, Established), // Assumed
    (SynSent, Invalid),    // No SYN/ACK seen yet
    (SynSent2, Invalid),
    (SynRecv, Established),
    (Established, Established),
    (FinWait, CloseWait),  // Close request answered by ACK
    (CloseWait, CloseWait),
    (LastAck, TimeWait),   // Last ACK detected (RFC 5961 challenged)
    (TimeWait, TimeWait),  // Retransmitted last ACK
    (Close, Close),
];

const REPLY_SYN: [Row; 10] = [
    (NoConn, Invalid),     // Never reached
    (SynSent, SynSent2),   // Simultaneous open
    (SynSent2, SynSent2),  // Retransmitted simultaneous SYN
    (SynRecv, Invalid),
    (Established, Invalid),
    (FinWait, Invalid),
    (CloseWait, Invalid),
    (LastAck, Invalid),
    (TimeWait, SynSent),   // Reopened, server may have switched role
    (Close, Invalid),
];

const REPLY_SYN_ACK: [Row; 9] = [
    (SynSent, SynRecv),    // Standard open
    (SynSent2, SynRecv),   // Simultaneous open
    (SynRecv, Ignore),     // Retransmitted SYN/ACK
    (Established, Ignore), // Late retransmitted SYN/ACK
    (FinWait, Ignore),
    (CloseWait, Ignore),
    (LastAck, Ignore),
    (TimeWait, Ignore),
    (Close, Ignore),
];

const REPLY_ACK: [Row; 9] = [
    (SynSent, Ignore),     // Might be a half-open connection
    (SynSent2, Ignore),
    (SynRecv, SynRecv),    // Might answer a late resent SYN
    (Established, Established),
    (FinWait, CloseWait),
    (CloseWait, CloseWait),
    (LastAck, TimeWait),
    (TimeWait, TimeWait),
    (Close, Close),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CtState,
    pub event: EventCategory,
    pub to: CtState,
}

impl Transition {
    pub fn label(&self) -> &'static str {
        self.event.label()
    }
}

/// The static (state, event) -> state mapping drawn by this crate.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
}

impl TransitionTable {
    pub fn conntrack() -> Self {
        let rows: [(EventCategory, &[Row]); 6] = [
            (EventCategory::new(PacketKind::Syn, Direction::Original), &ORIG_SYN),
            (EventCategory::new(PacketKind::SynAck, Direction::Original), &ORIG_SYN_ACK),
            (EventCategory::new(PacketKind::Ack, Direction::Original), &ORIG_ACK),
            (EventCategory::new(PacketKind::Syn, Direction::Reply), &REPLY_SYN),
            (EventCategory::new(PacketKind::SynAck, Direction::Reply), &REPLY_SYN_ACK),
            (EventCategory::new(PacketKind::Ack, Direction::Reply), &REPLY_ACK),
        ];

        let transitions = rows
            .iter()
            .flat_map(|(event, rows)| {
                rows.iter().map(move |&(from, to)| Transition { from, event: *event, to })
            })
            .collect();

        Self { transitions }
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Every `(from, to)` pair in table order, duplicates included.
    pub fn edges(&self) -> Vec<(CtState, CtState)> {
        self.transitions.iter().map(|t| (t.from, t.to)).collect()
    }

    /// One label per transition, keyed by its `(from, to)` pair.
    pub fn labels(&self) -> Vec<((CtState, CtState), &'static str)> {
        self.transitions.iter().map(|t| ((t.from, t.to), t.label())).collect()
    }

    pub fn edges_and_labels(
        &self,
    ) -> (Vec<(CtState, CtState)>, Vec<((CtState, CtState), &'static str)>) {
        (self.edges(), self.labels())
    }

    pub fn sources(&self, event: EventCategory) -> Vec<CtState> {
        self.transitions
            .iter()
            .filter(|t| t.event == event)
            .map(|t| t.from)
            .collect()
    }

    pub fn next_state(&self, from: CtState, event: EventCategory) -> Option<CtState> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.event == event)
            .map(|t| t.to)
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use crate::conntrack::event::{Direction, EventCategory, PacketKind};
    use crate::conntrack::state::CtState;
    use crate::conntrack::table::TransitionTable;

    #[test]
    fn test_edge_count() {
        let table = TransitionTable::conntrack();
        let (edges, labels) = table.edges_and_labels();
        assert_eq!(edges.len(), 58);
        assert_eq!(labels.len(), 58);
        assert_eq!(table.len(), 10 + 10 + 10 + 10 + 9 + 9);
    }

    #[test]
    fn test_category_sizes() {
        let table = TransitionTable::conntrack();
        let sizes: Vec<usize> = EventCategory::ALL
            .iter()
            .map(|e| table.sources(*e).len())
            .collect();
        assert_eq!(sizes, vec![10, 10, 10, 10, 9, 9]);
    }

    #[test]
    fn test_one_transition_per_source() {
        let table = TransitionTable::conntrack();
        for event in EventCategory::ALL {
            let sources = table.sources(event);
            let unique: HashSet<CtState> = sources.iter().copied().collect();
            assert_eq!(unique.len(), sources.len(), "duplicate source in {}", event);
            assert!(sources.iter().all(|s| s.is_tracked()));
        }
    }

    #[test]
    fn test_original_direction_is_total() {
        let table = TransitionTable::conntrack();
        for kind in [PacketKind::Syn, PacketKind::SynAck, PacketKind::Ack] {
            let event = EventCategory::new(kind, Direction::Original);
            for state in CtState::TRACKED {
                assert!(
                    table.next_state(state, event).is_some(),
                    "{} has no {} row",
                    state,
                    event
                );
            }
        }

        let reply_syn = EventCategory::new(PacketKind::Syn, Direction::Reply);
        assert_eq!(table.sources(reply_syn), CtState::TRACKED.to_vec());
    }

    #[test]
    fn test_reply_tables_omit_no_conn() {
        let table = TransitionTable::conntrack();
        for kind in [PacketKind::SynAck, PacketKind::Ack] {
            let event = EventCategory::new(kind, Direction::Reply);
            assert_eq!(table.next_state(CtState::NoConn, event), None);

            let expected: Vec<CtState> = CtState::TRACKED[1..].to_vec();
            assert_eq!(table.sources(event), expected);
        }
    }

    #[test]
    fn test_labels_from_known_set() {
        let known = ["syn_o", "syn/ack_o", "ack_o", "syn_r", "syn/ack_r", "ack_r"];
        let table = TransitionTable::conntrack();
        for (_, label) in table.labels() {
            assert!(known.contains(&label), "unexpected label {}", label);
        }

        // Labels follow table order
        let labels = table.labels();
        assert_eq!(labels[0], ((CtState::NoConn, CtState::SynSent), "syn_o"));
        assert_eq!(labels[57], ((CtState::Close, CtState::Close), "ack_r"));
    }

    #[test]
    fn test_next_state() {
        let table = TransitionTable::conntrack();
        let syn_o = EventCategory::new(PacketKind::Syn, Direction::Original);
        let syn_ack_r = EventCategory::new(PacketKind::SynAck, Direction::Reply);
        let ack_o = EventCategory::new(PacketKind::Ack, Direction::Original);

        // Standard three way handshake
        let s = table.next_state(CtState::NoConn, syn_o).unwrap();
        assert_eq!(s, CtState::SynSent);
        let s = table.next_state(s, syn_ack_r).unwrap();
        assert_eq!(s, CtState::SynRecv);
        let s = table.next_state(s, ack_o).unwrap();
        assert_eq!(s, CtState::Established);

        // Verdict states have no outgoing rows
        assert_eq!(table.next_state(CtState::Invalid, syn_o), None);
    }
}
