//! Fixed wetland class table
//!
//! The remote classifier assigns every sample to one of six known classes.
//! The table is fixed for the process lifetime; chart axes, legends and
//! exports all iterate it in declaration order so output ordering is stable
//! regardless of what the server returns.

/// One entry of the wetland class table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WetlandClass {
    /// Class identifier as used by the remote classifier
    pub id: u8,
    /// Human-readable class name
    pub name: &'static str,
    /// Display color (hex, as consumed by chart/map surfaces)
    pub color: &'static str,
}

/// The six known wetland classes, in fixed display order
pub const WETLAND_CLASSES: [WetlandClass; 6] = [
    WetlandClass { id: 0, name: "Background", color: "#1a1a2e" },
    WetlandClass { id: 1, name: "Marsh", color: "#16c79a" },
    WetlandClass { id: 2, name: "Swamp", color: "#43b581" },
    WetlandClass { id: 3, name: "Fen", color: "#7289da" },
    WetlandClass { id: 4, name: "Bog", color: "#faa61a" },
    WetlandClass { id: 5, name: "Open Water", color: "#ee5a6f" },
];

/// Look up a class definition by classifier id
pub fn class_by_id(id: u8) -> Option<&'static WetlandClass> {
    WETLAND_CLASSES.iter().find(|c| c.id == id)
}
