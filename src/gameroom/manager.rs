use super::protocol::ClientMessage;
use super::protocol::ServerMessage;
use super::protocol::StateFrame;
use crate::Chips;
use crate::cards::street::Street;
use crate::config::Config;
use crate::gameplay::action::Action;
use crate::gameplay::table::Table;
use crate::gameplay::table::TableError;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

pub type ConnId = u64;

/// A client channel attached to a table.
#[derive(Debug)]
struct Connection {
    id: ConnId,
    nick: String,
    tx: UnboundedSender<String>,
}

/// A table plus its attached connections. Locked as a unit, so no two
/// command applications against the same table ever interleave.
struct Room {
    game: String,
    name: String,
    persistent: bool,
    table: Table,
    connections: Vec<Connection>,
}

impl Room {
    fn new(game: &str, name: &str, persistent: bool, table: Table) -> Self {
        Self {
            game: game.to_string(),
            name: name.to_string(),
            persistent,
            table,
            connections: Vec::new(),
        }
    }

    /// Aligns seat connectivity with the live connection set, then drops
    /// stale seats while the table is idle.
    fn reconcile(&mut self) {
        let nicks = self
            .table
            .seats()
            .iter()
            .map(|s| s.nick().to_string())
            .collect::<Vec<String>>();
        for nick in nicks {
            let connected = self.connections.iter().any(|c| c.nick == nick);
            self.table.set_connected(&nick, connected);
        }
        self.table.purge_disconnected();
    }

    /// One tailored state frame per connection; connections whose send
    /// fails are dropped within the same pass.
    fn broadcast(&mut self) {
        let table = &self.table;
        self.connections.retain(|c| {
            let frame = StateFrame::project(table, &c.nick);
            c.tx.send(ServerMessage::State(frame).to_json()).is_ok()
        });
    }

    fn chat(&mut self, from: Option<String>, text: Option<String>) {
        let json = ServerMessage::Chat { from, text }.to_json();
        self.connections.retain(|c| c.tx.send(json.clone()).is_ok());
    }

    fn unicast(&self, id: ConnId, message: ServerMessage) {
        if let Some(conn) = self.connections.iter().find(|c| c.id == id) {
            let _ = conn.tx.send(message.to_json());
        }
    }

    fn nick_of(&self, id: ConnId) -> Option<String> {
        self.connections
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.nick.clone())
    }

    fn info(&self, id: &str) -> TableInfo {
        TableInfo {
            id: id.to_string(),
            game: self.game.clone(),
            name: self.name.clone(),
            players: self
                .table
                .seats()
                .iter()
                .map(|s| s.nick().to_string())
                .collect(),
            player_count: self.table.seats().len(),
            max_players: self.table.max_players(),
            started: self.table.started(),
        }
    }

    fn detail(&self, id: &str) -> TableDetail {
        let seated = self.table.seats().len();
        let capacity = self.table.max_players();
        TableDetail {
            info: self.info(id),
            street: self.table.street().to_string(),
            pot: self.table.pot(),
            dealer: self.table.dealer_nick().map(String::from),
            sb: self.table.sb_nick().map(String::from),
            bb: self.table.bb_nick().map(String::from),
            occupied_slots: (1..=seated).collect(),
            available_slots: (seated + 1..=capacity).collect(),
        }
    }
}

/// Summary row for the table listing.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub id: String,
    pub game: String,
    pub name: String,
    pub players: Vec<String>,
    pub player_count: usize,
    pub max_players: usize,
    pub started: bool,
}

/// Detailed view of a single table.
#[derive(Debug, Clone, Serialize)]
pub struct TableDetail {
    #[serde(flatten)]
    pub info: TableInfo,
    pub street: String,
    pub pot: Chips,
    pub dealer: Option<String>,
    pub sb: Option<String>,
    pub bb: Option<String>,
    pub occupied_slots: Vec<usize>,
    pub available_slots: Vec<usize>,
}

/// Multiplexes every live table over the clients' channels: owns the
/// `table_id → state` registry, routes inbound frames, enforces seat
/// capacity, and serializes broadcasts per table.
pub struct SessionManager {
    config: Config,
    rooms: RwLock<HashMap<String, Arc<Mutex<Room>>>>,
    count: AtomicU64,
}

impl SessionManager {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rooms: RwLock::new(HashMap::new()),
            count: AtomicU64::new(1),
        }
    }

    /// `table == "new"` maps every client of a game to the same default id
    fn normalize(game: &str, table: &str) -> String {
        match table {
            "new" => format!("{}-table-1", game),
            _ => table.to_string(),
        }
    }

    fn fresh_table(&self) -> Table {
        Table::new(
            self.config.buy_in,
            self.config.sb_size,
            self.config.bb_size,
            self.config.max_players,
        )
    }

    async fn room(&self, table_id: &str, game: &str) -> Arc<Mutex<Room>> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(table_id.to_string())
            .or_insert_with(|| {
                log::info!("[manager] opening table {}", table_id);
                Arc::new(Mutex::new(Room::new(
                    game,
                    table_id,
                    false,
                    self.fresh_table(),
                )))
            })
            .clone()
    }

    /// Attaches a client channel to a table, seating the nickname or
    /// re-attaching it to an existing seat. On a full table the connection
    /// is rolled back and the caller surfaces the error and closes.
    pub async fn connect(
        &self,
        game: &str,
        table: &str,
        nick: &str,
        tx: UnboundedSender<String>,
    ) -> Result<(String, ConnId), TableError> {
        let table_id = Self::normalize(game, table);
        let room = self.room(&table_id, game).await;
        let mut room = room.lock().await;
        let id = self.count.fetch_add(1, Ordering::Relaxed);
        room.connections.push(Connection {
            id,
            nick: nick.to_string(),
            tx,
        });
        room.reconcile();
        if room.table.seat(nick).is_some() {
            log::info!("[manager] {} reconnected to {}", nick, table_id);
        } else if !room.table.add_player(nick) {
            room.connections.retain(|c| c.id != id);
            room.reconcile();
            log::info!("[manager] {} rejected from full table {}", nick, table_id);
            return Err(TableError::TableFull);
        }
        room.broadcast();
        Ok((table_id, id))
    }

    /// Detaches a connection. An empty non-persistent table is discarded;
    /// a live hand with fewer than two connected seats is cancelled.
    pub async fn disconnect(&self, table_id: &str, id: ConnId) {
        let Some(room) = self.rooms.read().await.get(table_id).cloned() else {
            return;
        };
        let mut room = room.lock().await;
        room.connections.retain(|c| c.id != id);
        room.reconcile();
        if room.connections.is_empty() {
            room.table.reset_hand();
            let persistent = room.persistent;
            drop(room);
            if !persistent {
                let mut rooms = self.rooms.write().await;
                let empty = match rooms.get(table_id) {
                    Some(arc) => arc.lock().await.connections.is_empty(),
                    None => false,
                };
                if empty {
                    rooms.remove(table_id);
                    log::info!("[manager] discarded empty table {}", table_id);
                }
            }
        } else if room.table.started()
            && room.table.street() != Street::Show
            && room.table.connected_players() < 2
        {
            log::info!("[manager] table {} depopulated, cancelling hand", table_id);
            room.table.reset_hand();
            room.broadcast();
        }
    }

    /// Routes one inbound frame. Malformed frames are dropped; unknown
    /// types answer with a state frame; illegal actions mutate nothing.
    pub async fn dispatch(&self, table_id: &str, id: ConnId, text: &str) {
        let Some(room) = self.rooms.read().await.get(table_id).cloned() else {
            return;
        };
        let mut room = room.lock().await;
        let Some(message) = ClientMessage::decode(text) else {
            return;
        };
        match message {
            ClientMessage::Chat { from, text } => room.chat(from, text),
            ClientMessage::Start => match room.table.start_hand() {
                Ok(()) => {
                    room.table.auto_advance();
                    room.broadcast();
                }
                Err(e) => room.unicast(id, ServerMessage::error(&e.to_string())),
            },
            ClientMessage::Action { action, amount } => {
                let Some(nick) = room.nick_of(id) else {
                    return;
                };
                match action.as_str() {
                    "new_hand" => {
                        if room.table.started() && room.table.street() != Street::Show {
                            room.unicast(
                                id,
                                ServerMessage::error(&TableError::HandInProgress.to_string()),
                            );
                        } else {
                            room.table.reset_hand();
                            match room.table.start_hand() {
                                Ok(()) => room.table.auto_advance(),
                                Err(e) => room.unicast(id, ServerMessage::error(&e.to_string())),
                            }
                        }
                    }
                    "check" | "call" | "fold" | "raise" | "all_in" => {
                        let action = match action.as_str() {
                            "check" => Action::Check,
                            "call" => Action::Call,
                            "fold" => Action::Fold,
                            "all_in" => Action::AllIn,
                            _ => Action::Raise(
                                amount.unwrap_or_else(|| room.table.min_raise_amount()),
                            ),
                        };
                        room.table.apply_action(&nick, action);
                        room.table.auto_advance();
                    }
                    _ => {}
                }
                room.broadcast();
            }
            ClientMessage::Other => room.broadcast(),
        }
    }

    /// Creates an idle table through the admin surface; it stays listed
    /// while empty.
    pub async fn create_table(
        &self,
        game: &str,
        name: Option<String>,
        table_id: Option<String>,
    ) -> anyhow::Result<TableInfo> {
        let id = table_id.unwrap_or_else(|| format!("{}-{}", game, uuid::Uuid::new_v4()));
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&id) {
            anyhow::bail!("table already exists");
        }
        let name = name.unwrap_or_else(|| id.clone());
        let room = Room::new(game, &name, true, self.fresh_table());
        let info = room.info(&id);
        rooms.insert(id.clone(), Arc::new(Mutex::new(room)));
        log::info!("[manager] created table {}", id);
        Ok(info)
    }

    pub async fn tables(&self) -> Vec<TableInfo> {
        let rooms = self.rooms.read().await;
        let mut infos = Vec::with_capacity(rooms.len());
        for (id, room) in rooms.iter() {
            infos.push(room.lock().await.info(id));
        }
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    pub async fn table(&self, table_id: &str) -> Option<TableDetail> {
        let room = self.rooms.read().await.get(table_id).cloned()?;
        let detail = room.lock().await.detail(table_id);
        Some(detail)
    }
}
