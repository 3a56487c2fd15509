//! Power-ups, attachments and arena items

use serde::{Deserialize, Serialize};

use crate::geometry::Pos3;

/// Power-up currently held by a kart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupType {
    #[default]
    Nothing,
    Bubblegum,
    Cake,
    Bowling,
    Zipper,
    Plunger,
    Switch,
    Swatter,
    Rubberball,
    Parachute,
}

impl PowerupType {
    pub fn is_nothing(self) -> bool {
        self == PowerupType::Nothing
    }

    /// Projectiles that travel forward and need an opponent in front.
    pub fn is_forward_projectile(self) -> bool {
        matches!(
            self,
            PowerupType::Cake | PowerupType::Bowling | PowerupType::Plunger | PowerupType::Rubberball
        )
    }

    /// Items that may also be thrown backwards.
    pub fn can_fire_backwards(self) -> bool {
        self == PowerupType::Bowling
    }
}

/// Attachment currently mounted on a kart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    #[default]
    Nothing,
    Parachute,
    Bomb,
    Anvil,
    Swatter,
    BubblegumShield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    BonusBox,
    Banana,
    NitroBig,
    NitroSmall,
    Bubblegum,
}

impl ItemKind {
    /// Arena AIs only drive for bonus boxes; bananas and gum are hazards
    /// and nitro is useless on a closed pitch.
    pub fn is_collectable(self) -> bool {
        self == ItemKind::BonusBox
    }
}

/// An item lying on the arena floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaItem {
    pub kind: ItemKind,
    pub position: Pos3,
    /// Nav poly the item rests on, `None` when off the mesh
    #[serde(default)]
    pub node: Option<usize>,
    /// False while the item is respawning after being collected
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl ArenaItem {
    pub fn is_collectable(&self) -> bool {
        self.available && self.kind.is_collectable()
    }
}
