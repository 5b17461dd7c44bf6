pub mod cards;
pub mod config;
pub mod gameplay;
pub mod gameroom;
pub mod hosting;

/// dimensional analysis types
pub type Chips = u32;
pub type Position = usize;

// table parameters
pub const MAX_PLAYERS: usize = 9;
pub const BUY_IN: Chips = 1000;
pub const B_BLIND: Chips = 10;
pub const S_BLIND: Chips = 5;
pub const ACTION_HISTORY: usize = 10;
pub const ADVANCE_LIMIT: usize = 10;

/// initialize logging
pub fn init() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
