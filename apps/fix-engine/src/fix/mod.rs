//! FIX boundary: wire message types, inbound translation, outbound
//! routing, and symbol/id normalization.

pub mod broker_id;
pub mod messages;
pub mod router;
pub mod symbol_map;
pub mod translator;

pub use messages::FixMessage;
pub use router::{FixRouter, FixSession, OutboundFixMessage};
pub use symbol_map::SymbolMap;
pub use translator::{FixTranslator, TranslatedMessage};
