//! Built-in word eras

use wordtrail_core::{Era, EraWordList};

const ANCIENT: &[&str] = &[
    "PYRAMID", "SCROLL", "CHARIOT", "TEMPLE", "PHARAOH", "SPEAR", "TOGA", "ORACLE", "MUMMY",
    "SPHINX",
];

const MEDIEVAL: &[&str] = &[
    "CASTLE", "KNIGHT", "DRAGON", "SWORD", "MOAT", "JESTER", "ARMOR", "SHIELD", "QUEST", "BANNER",
];

const INDUSTRIAL: &[&str] = &[
    "ENGINE", "STEAM", "FACTORY", "RAILWAY", "COAL", "FURNACE", "LOOM", "PISTON", "BOILER",
    "TELEGRAPH",
];

const MODERN: &[&str] = &[
    "ROCKET", "LASER", "ROBOT", "PIXEL", "SATELLITE", "MODEM", "DRONE", "CIRCUIT", "ORBIT",
    "BATTERY",
];

pub fn builtin_eras() -> Vec<Era> {
    vec![
        Era::new("Ancient", ANCIENT),
        Era::new("Medieval", MEDIEVAL),
        Era::new("Industrial", INDUSTRIAL),
        Era::new("Modern", MODERN),
    ]
}

pub fn era_count() -> usize {
    builtin_eras().len()
}

/// Index of a built-in era by name (case-insensitive)
pub fn era_index(name: &str) -> Option<usize> {
    builtin_eras()
        .iter()
        .position(|era| era.name.eq_ignore_ascii_case(name))
}

/// Shuffled supply with `era` active
pub fn supply(era: usize, seed: u64) -> EraWordList {
    let eras = builtin_eras();
    let name = eras.get(era).map(|e| e.name.clone());
    let mut list = EraWordList::with_seed(eras, seed);
    if let Some(name) = name {
        list.select_era(&name);
    }
    list
}
