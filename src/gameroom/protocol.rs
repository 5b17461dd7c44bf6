use crate::Chips;
use crate::gameplay::action::ActionRecord;
use crate::gameplay::table::Table;
use serde::Serialize;
use std::collections::BTreeMap;

/// Commands received from clients. Unknown types decode to `Other` and are
/// answered with a state frame; unparseable text or a missing discriminator
/// decodes to None and is dropped silently.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Chat {
        from: Option<String>,
        text: Option<String>,
    },
    Start,
    Action {
        action: String,
        amount: Option<Chips>,
    },
    Other,
}

impl ClientMessage {
    pub fn decode(text: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(text).ok()?;
        let kind = value.get("type").and_then(|t| t.as_str())?;
        match kind {
            "chat" => Some(Self::Chat {
                from: field(&value, "from"),
                text: field(&value, "text"),
            }),
            "start" => Some(Self::Start),
            "action" => {
                let action = field(&value, "action")?;
                let amount = match value.get("amount") {
                    None | Some(serde_json::Value::Null) => None,
                    Some(amount) => match amount.as_u64() {
                        Some(amount) => Some(amount as Chips),
                        None => return Some(Self::Other),
                    },
                };
                Some(Self::Action { action, amount })
            }
            _ => Some(Self::Other),
        }
    }
}

fn field(value: &serde_json::Value, name: &str) -> Option<String> {
    value.get(name).and_then(|v| v.as_str()).map(String::from)
}

/// Frames sent to clients.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    State(StateFrame),
    Error {
        text: String,
    },
    Chat {
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl ServerMessage {
    pub fn error(text: &str) -> Self {
        Self::Error {
            text: text.to_string(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

/// One seat's view of a table. Hole cards are the viewer's own; everyone's
/// reach the frame only at showdown.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFrame {
    pub players: Vec<String>,
    pub started: bool,
    pub community: Vec<String>,
    pub hole: Vec<String>,
    pub pot: Chips,
    pub street: String,
    pub to_act: Option<String>,
    pub winners: Option<Vec<String>>,
    pub recent_actions: Vec<ActionRecord>,
    pub call_amount: Option<Chips>,
    pub stacks: BTreeMap<String, Chips>,
    pub dealer: Option<String>,
    pub sb: Option<String>,
    pub bb: Option<String>,
    pub min_raise: Option<Chips>,
    pub all_holes: Option<BTreeMap<String, Vec<String>>>,
}

impl StateFrame {
    /// Pure projection of (table, viewer); broadcasting maps this over the
    /// connection set without re-entering game logic.
    pub fn project(table: &Table, viewer: &str) -> Self {
        use crate::cards::street::Street;
        let started = table.started();
        let in_hand = started && table.seat(viewer).is_some();
        let viewers_turn = started && table.to_act_nick() == Some(viewer);
        Self {
            players: table
                .seats()
                .iter()
                .filter(|s| s.connected())
                .map(|s| s.nick().to_string())
                .collect(),
            started,
            community: match started && table.street() != Street::Pref {
                true => table.community().iter().map(|c| c.to_string()).collect(),
                false => Vec::new(),
            },
            hole: match in_hand {
                true => table
                    .seat(viewer)
                    .map(|s| s.hole().iter().map(|c| c.to_string()).collect())
                    .unwrap_or_default(),
                false => Vec::new(),
            },
            pot: table.pot(),
            street: table.street().to_string(),
            to_act: table.to_act_nick().map(String::from),
            winners: table.winners().map(|w| w.to_vec()),
            recent_actions: table.actions().to_vec(),
            call_amount: match viewers_turn {
                true => table.to_act().map(|p| table.call_amount(p)),
                false => None,
            },
            stacks: table
                .seats()
                .iter()
                .map(|s| (s.nick().to_string(), s.stack()))
                .collect(),
            dealer: table.dealer_nick().map(String::from),
            sb: table.sb_nick().map(String::from),
            bb: table.bb_nick().map(String::from),
            min_raise: viewers_turn.then(|| table.min_raise_amount()),
            all_holes: match started && table.street() == Street::Show {
                true => Some(
                    table
                        .seats()
                        .iter()
                        .filter(|s| s.active() && !s.hole().is_empty())
                        .map(|s| {
                            (
                                s.nick().to_string(),
                                s.hole().iter().map(|c| c.to_string()).collect(),
                            )
                        })
                        .collect(),
                ),
                false => None,
            },
        }
    }
}
