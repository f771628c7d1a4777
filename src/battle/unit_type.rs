//! Archetypes and their fixed stat lines
//!
//! The roster is closed: every role a unit can have is a variant here, and its stats
//! and ability come out of a `match`, never out of mutable state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::constants::MAX_ACTION_POINTS;

/// The two sides of the street
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Rioters,
    Police,
}

impl Faction {
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Rioters => Faction::Police,
            Faction::Police => Faction::Rioters,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Rioters => write!(f, "Rioters"),
            Faction::Police => write!(f, "Police"),
        }
    }
}

/// Special action an archetype can take instead of attacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Ignite,      // Set the 3x3 block around the caster on fire
    Heal,        // Patch up nearby allies
    Smoke,       // Smoke screen over the 3x3 block
    DeployCover, // Drop a shield as half cover next to the caster
    Inspire,     // Hand nearby allies an extra action point
}

impl Ability {
    pub fn name(&self) -> &'static str {
        match self {
            Ability::Ignite => "Fire Area",
            Ability::Heal => "Heal",
            Ability::Smoke => "Smoke",
            Ability::DeployCover => "Deploy Cover",
            Ability::Inspire => "Inspire",
        }
    }
}

/// Type of unit on the street
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    // Rioters
    Brawler,      // Melee bruiser, longest stride
    Molotov,      // Firebomber
    Leader,       // Keeps the crowd moving
    Medic,        // Street medic
    Hacker,       // Smoke and confusion
    ShieldBearer, // Improvised shields

    // Police
    Officer,       // Standard line officer
    RiotShield,    // Heavy shield wall
    Sniper,        // Long-range overwatch
    Teargas,       // Grenadier
    DroneOperator, // Fragile spotter
}

/// Default stat line for an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeStats {
    pub max_health: u32,
    pub damage: u32,
    pub range: u32,
    pub move_range: u32,
    pub max_action_points: u32,
}

impl ArchetypeStats {
    const fn new(max_health: u32, damage: u32, range: u32, move_range: u32) -> Self {
        Self {
            max_health,
            damage,
            range,
            move_range,
            max_action_points: MAX_ACTION_POINTS,
        }
    }
}

impl Archetype {
    pub const ALL: [Archetype; 11] = [
        Archetype::Brawler,
        Archetype::Molotov,
        Archetype::Leader,
        Archetype::Medic,
        Archetype::Hacker,
        Archetype::ShieldBearer,
        Archetype::Officer,
        Archetype::RiotShield,
        Archetype::Sniper,
        Archetype::Teargas,
        Archetype::DroneOperator,
    ];

    /// Get the stat line for this archetype
    pub const fn stats(&self) -> ArchetypeStats {
        match self {
            Archetype::Brawler => ArchetypeStats::new(120, 45, 1, 4),
            Archetype::Molotov => ArchetypeStats::new(80, 60, 4, 3),
            Archetype::Leader => ArchetypeStats::new(100, 35, 3, 3),
            Archetype::Medic => ArchetypeStats::new(70, 25, 2, 3),
            Archetype::Hacker => ArchetypeStats::new(75, 30, 2, 3),
            Archetype::ShieldBearer => ArchetypeStats::new(130, 40, 1, 3),
            Archetype::Officer => ArchetypeStats::new(100, 50, 4, 3),
            Archetype::RiotShield => ArchetypeStats::new(140, 35, 1, 3),
            Archetype::Sniper => ArchetypeStats::new(80, 80, 8, 3),
            Archetype::Teargas => ArchetypeStats::new(90, 40, 5, 3),
            Archetype::DroneOperator => ArchetypeStats::new(60, 25, 3, 3),
        }
    }

    pub fn faction(&self) -> Faction {
        match self {
            Archetype::Brawler
            | Archetype::Molotov
            | Archetype::Leader
            | Archetype::Medic
            | Archetype::Hacker
            | Archetype::ShieldBearer => Faction::Rioters,
            Archetype::Officer
            | Archetype::RiotShield
            | Archetype::Sniper
            | Archetype::Teargas
            | Archetype::DroneOperator => Faction::Police,
        }
    }

    /// The one special ability this archetype carries, if any
    pub fn ability(&self) -> Option<Ability> {
        match self {
            Archetype::Molotov => Some(Ability::Ignite),
            Archetype::Medic => Some(Ability::Heal),
            Archetype::Hacker => Some(Ability::Smoke),
            Archetype::ShieldBearer => Some(Ability::DeployCover),
            Archetype::Leader => Some(Ability::Inspire),
            _ => None,
        }
    }

    /// Does this archetype keep its distance instead of closing in?
    pub fn prefers_standoff(&self) -> bool {
        matches!(self, Archetype::Sniper)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Brawler => "Brawler",
            Archetype::Molotov => "Molotov",
            Archetype::Leader => "Leader",
            Archetype::Medic => "Medic",
            Archetype::Hacker => "Hacker",
            Archetype::ShieldBearer => "Shield",
            Archetype::Officer => "Officer",
            Archetype::RiotShield => "Shield Police",
            Archetype::Sniper => "Sniper",
            Archetype::Teargas => "Teargas",
            Archetype::DroneOperator => "Drone Op",
        }
    }

    /// One-line role description for help screens
    pub fn help(&self) -> &'static str {
        match self {
            Archetype::Brawler => "High damage melee fighter with extended movement range",
            Archetype::Molotov => "Ability: set the 3x3 area around you on fire",
            Archetype::Leader => "Ability: inspire nearby allies (+1 AP)",
            Archetype::Medic => "Ability: heal nearby allies (+30 HP)",
            Archetype::Hacker => "Ability: smoke screen over the 3x3 area around you",
            Archetype::ShieldBearer => "Ability: deploy half cover on an adjacent tile",
            Archetype::Officer => "Line officer with a mid-range weapon",
            Archetype::RiotShield => "Heavily armoured melee blocker",
            Archetype::Sniper => "Long-range marksman, prefers to hang back",
            Archetype::Teargas => "Grenadier with long reach",
            Archetype::DroneOperator => "Fragile operator with a light sidearm",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
