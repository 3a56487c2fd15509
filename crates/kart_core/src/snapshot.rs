//! Serialisable soccer world
//!
//! The engine dumps one `PitchSnapshot` per frame (JSON) and the controllers
//! run against it, so the AI never touches engine objects directly. The nav
//! mesh part carries the engine's precomputed next-hop table; no path search
//! happens here.

use serde::{Deserialize, Serialize};

use crate::error::{AiError, Result};
use crate::geometry::Pos3;
use crate::items::ArenaItem;
use crate::world::{ArenaWorld, KartState, NavMesh, SoccerTeam, SoccerWorld};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchKart {
    #[serde(flatten)]
    pub state: KartState,
    pub team: SoccerTeam,
    #[serde(default)]
    pub node: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: Pos3,
    #[serde(default)]
    pub node: Option<usize>,
}

/// Nav node of each goal, keyed by the team defending it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalNodes {
    pub red: usize,
    pub blue: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavSnapshot {
    /// Center of every nav poly
    pub centers: Vec<Pos3>,
    /// `next_hop[from][to]`: first poly on the shortest path
    pub next_hop: Vec<Vec<Option<usize>>>,
}

impl NavSnapshot {
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    fn validate(&self) -> Result<()> {
        let n = self.centers.len();
        if self.next_hop.len() != n {
            return Err(AiError::InvalidSnapshot(format!(
                "next_hop has {} rows for {} polys",
                self.next_hop.len(),
                n
            )));
        }
        for (from, row) in self.next_hop.iter().enumerate() {
            if row.len() != n {
                return Err(AiError::InvalidSnapshot(format!(
                    "next_hop row {} has {} entries, expected {}",
                    from,
                    row.len(),
                    n
                )));
            }
            if let Some(hop) = row.iter().flatten().find(|&&hop| hop >= n) {
                return Err(AiError::InvalidNode(*hop));
            }
        }
        Ok(())
    }
}

impl NavMesh for NavSnapshot {
    fn poly_center(&self, node: usize) -> Option<Pos3> {
        self.centers.get(node).copied()
    }

    fn next_node(&self, from: usize, to: usize) -> Option<usize> {
        self.next_hop.get(from)?.get(to).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSnapshot {
    /// Indexed by kart id
    pub karts: Vec<PitchKart>,
    pub ball: BallSnapshot,
    pub goals: GoalNodes,
    #[serde(default)]
    pub items: Vec<ArenaItem>,
    #[serde(default)]
    pub start_phase: bool,
    pub nav: NavSnapshot,
}

impl PitchSnapshot {
    /// Parse and validate a snapshot sent by the engine.
    pub fn from_json(s: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(s)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        self.nav.validate()?;
        let n = self.nav.len();
        let check_node = |node: Option<usize>| match node {
            Some(node) if node >= n => Err(AiError::InvalidNode(node)),
            _ => Ok(()),
        };

        for (i, kart) in self.karts.iter().enumerate() {
            if kart.state.id != i {
                return Err(AiError::InvalidSnapshot(format!(
                    "kart at index {} has id {}",
                    i, kart.state.id
                )));
            }
            check_node(kart.node)?;
        }
        check_node(self.ball.node)?;
        check_node(Some(self.goals.red))?;
        check_node(Some(self.goals.blue))?;
        for item in &self.items {
            check_node(item.node)?;
        }
        Ok(())
    }
}

impl ArenaWorld for PitchSnapshot {
    fn num_karts(&self) -> usize {
        self.karts.len()
    }

    fn kart(&self, id: usize) -> Option<&KartState> {
        self.karts.get(id).map(|k| &k.state)
    }

    fn kart_node(&self, id: usize) -> Option<usize> {
        self.karts.get(id).and_then(|k| k.node)
    }

    fn items(&self) -> &[ArenaItem] {
        &self.items
    }

    fn is_start_phase(&self) -> bool {
        self.start_phase
    }
}

impl SoccerWorld for PitchSnapshot {
    /// Ids outside the snapshot read as red; callers only pass ids below `num_karts`.
    fn kart_team(&self, id: usize) -> SoccerTeam {
        self.karts.get(id).map_or(SoccerTeam::Red, |k| k.team)
    }

    fn ball_position(&self) -> Pos3 {
        self.ball.position
    }

    fn ball_node(&self) -> Option<usize> {
        self.ball.node
    }

    fn goal_node(&self, team: SoccerTeam) -> usize {
        match team {
            SoccerTeam::Red => self.goals.red,
            SoccerTeam::Blue => self.goals.blue,
        }
    }
}
