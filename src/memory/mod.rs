//! Memory blocks attached to the buses: RAM/ROM, mirrors, battery RAM,
//! nametables, and palette RAM.

pub mod battery;
pub mod nametable;
pub mod palette;
pub mod ram;

pub use battery::BatteryRam;
pub use nametable::NameTableRam;
pub use palette::PaletteRam;
pub use ram::{Mirrored, Ram, Rom};
