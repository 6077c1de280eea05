pub mod engine;

pub use engine::{PacketQuery, PacketView, PageState};
