//! Soccer AI
//!
//! Chases the ball, or a bonus box when far from the ball and empty-handed,
//! and bends its approach so the ball is pushed toward the opposing goal.

use crate::config::AiConfig;
use crate::geometry::{check_position, distance_2d, to_world, Pos3, Vec3};
use crate::items::AttachmentType;
use crate::world::{KartState, NavMesh, SoccerTeam, SoccerWorld};

use super::{ArenaAi, ArenaBehavior, ClosestKart};

#[derive(Debug, Clone)]
pub struct SoccerAi {
    arena: ArenaAi,
    team: SoccerTeam,
}

impl SoccerAi {
    /// Team defaults to kart id parity (even = red) until [`SoccerAi::reset`]
    /// reads the real assignment from the world.
    pub fn new(kart_id: usize, config: AiConfig) -> Self {
        let team = if kart_id % 2 == 0 { SoccerTeam::Red } else { SoccerTeam::Blue };
        Self { arena: ArenaAi::new(kart_id, config), team }
    }

    pub fn reset<W: SoccerWorld + ?Sized>(&mut self, world: &W) {
        self.arena.reset();
        self.team = world.kart_team(self.arena.kart_id());
        log::debug!("soccer AI for kart {} reset, team {:?}", self.arena.kart_id(), self.team);
    }

    pub fn team(&self) -> SoccerTeam {
        self.team
    }

    pub fn arena(&self) -> &ArenaAi {
        &self.arena
    }

    /// Shift the ball target so the kart hits the ball toward the opposing goal.
    ///
    /// - opposing goal behind the kart: aim well beside and past the ball so
    ///   the kart circles around instead of scoring an own goal
    /// - ball close ahead but goal not lined up: aim slightly beside the ball
    /// - otherwise drive straight at the ball
    pub fn correct_ball_position<W: SoccerWorld + ?Sized>(
        &self,
        world: &W,
        nav: &dyn NavMesh,
        kart: &KartState,
        orig: Pos3,
    ) -> Pos3 {
        let cfg = &self.arena.config().soccer;
        let trans = kart.transform();
        let (ball_pos, mut ball_lc) = check_position(&trans, &orig);

        let goal_node = world.goal_node(self.team.opponent());
        let Some(goal_center) = nav.poly_center(goal_node) else {
            log::warn!("goal node {} has no nav poly, chasing ball directly", goal_node);
            return orig;
        };
        let (goal_pos, _) = check_position(&trans, &goal_center);

        if goal_pos.behind {
            let o = cfg.wrong_way_offset;
            ball_lc += if goal_pos.on_side { Vec3::new(o, 0.0, o) } else { Vec3::new(-o, 0.0, o) };
            return to_world(&trans, &ball_lc);
        }

        if ball_pos.distance < cfg.ball_close_distance && !ball_pos.behind {
            if goal_pos.angle < cfg.goal_aim_angle {
                return orig;
            }
            let o = cfg.line_up_offset;
            ball_lc += if goal_pos.on_side { Vec3::new(o, 0.0, o) } else { Vec3::new(-o, 0.0, o) };
            return to_world(&trans, &ball_lc);
        }

        orig
    }
}

impl<W: SoccerWorld + ?Sized> ArenaBehavior<W> for SoccerAi {
    fn arena(&self) -> &ArenaAi {
        &self.arena
    }

    fn arena_mut(&mut self) -> &mut ArenaAi {
        &mut self.arena
    }

    fn is_waiting(&self, world: &W) -> bool {
        world.is_start_phase()
    }

    fn current_node(&self, world: &W) -> Option<usize> {
        world.kart_node(self.arena.kart_id())
    }

    fn find_closest_kart(&mut self, world: &W, kart: &KartState) {
        let my_team = world.kart_team(kart.id);
        let mut best: Option<(f32, usize)> = None;

        for i in 0..world.num_karts() {
            let Some(other) = world.kart(i) else { continue };
            if other.eliminated || i == kart.id || world.kart_team(i) == my_team {
                continue;
            }
            let d = distance_2d(&kart.position, &other.position);
            // `<=`: on a tie the later kart wins
            if best.map_or(true, |(best_d, _)| d <= best_d) {
                best = Some((d, i));
            }
        }

        let closest = best.and_then(|(_, i)| world.kart(i)).map(|other| {
            let (pos, _) = check_position(&kart.transform(), &other.position);
            ClosestKart { id: other.id, point: other.position, node: world.kart_node(other.id), pos }
        });
        self.arena.set_closest_kart(closest);
    }

    fn find_target(&mut self, world: &W, nav: &dyn NavMesh, kart: &KartState) {
        let cfg = &self.arena.config().soccer;
        let ball = world.ball_position();

        let go_collect = distance_2d(&ball, &kart.position) > cfg.ball_chase_distance
            && kart.powerup.is_nothing()
            && kart.attachment != AttachmentType::Swatter;

        if go_collect {
            let (point, node) =
                self.arena.collect_item_in_arena(kart, world.items(), (ball, world.ball_node()));
            self.arena.set_target(point, node);
        } else {
            let point = self.correct_ball_position(world, nav, kart, ball);
            self.arena.set_ball_target(point, world.ball_node());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::KartControl;
    use crate::items::PowerupType;
    use crate::test_fixtures::*;
    use crate::world::ArenaWorld;

    fn red_ai(config: AiConfig) -> SoccerAi {
        SoccerAi::new(0, config)
    }

    #[test]
    fn test_team_from_parity_until_reset() {
        assert_eq!(SoccerAi::new(0, AiConfig::default()).team(), SoccerTeam::Red);
        assert_eq!(SoccerAi::new(3, AiConfig::default()).team(), SoccerTeam::Blue);

        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Blue)
            .ball(0.0, 5.0)
            .build();
        let mut ai = SoccerAi::new(0, AiConfig::default());
        ai.reset(&pitch);
        assert_eq!(ai.team(), SoccerTeam::Blue);
    }

    #[test]
    fn test_closest_kart_skips_teammates_self_and_eliminated() {
        let mut eliminated = kart_at(3, 1.0, 1.0, 0.0);
        eliminated.eliminated = true;
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .kart(kart_at(1, 0.0, 2.0, 0.0), SoccerTeam::Red)
            .kart(kart_at(2, 10.0, 0.0, 0.0), SoccerTeam::Blue)
            .kart(eliminated, SoccerTeam::Blue)
            .kart(kart_at(4, 0.0, -6.0, 0.0), SoccerTeam::Blue)
            .ball(0.0, 5.0)
            .build();

        let mut ai = red_ai(AiConfig::deterministic());
        ai.reset(&pitch);
        let me = pitch.kart(0).cloned().unwrap();
        ai.find_closest_kart(&pitch, &me);

        let closest = ai.arena().closest_kart().unwrap();
        assert_eq!(closest.id, 4);
        assert!(closest.pos.behind);
        assert!((closest.pos.distance - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_closest_kart_tie_prefers_later_index() {
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .kart(kart_at(1, 5.0, 0.0, 0.0), SoccerTeam::Blue)
            .kart(kart_at(2, -5.0, 0.0, 0.0), SoccerTeam::Blue)
            .ball(0.0, 5.0)
            .build();
        let mut ai = red_ai(AiConfig::deterministic());
        let me = pitch.kart(0).cloned().unwrap();
        ai.find_closest_kart(&pitch, &me);
        assert_eq!(ai.arena().closest_kart().unwrap().id, 2);
    }

    #[test]
    fn test_no_opponent_leaves_closest_empty() {
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .kart(kart_at(1, 5.0, 0.0, 0.0), SoccerTeam::Red)
            .ball(0.0, 30.0)
            .build();
        let mut ai = red_ai(AiConfig::deterministic());
        let control = ai.update(&pitch, &pitch.nav, 0.016).unwrap();
        assert!(ai.arena().closest_kart().is_none());
        // Nothing to collect and nobody to chase: falls back to the ball
        assert_eq!(ai.arena().target_point(), Pos3::new(0.0, 0.0, 30.0));
        assert!(control.accel > 0.0);
    }

    #[test]
    fn test_far_empty_handed_kart_collects_items() {
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .kart(kart_at(1, 0.0, 40.0, 0.0), SoccerTeam::Blue)
            .ball(0.0, 20.0)
            .item(bonus_box(3.0, 6.0, Some(6)))
            .build();
        let mut ai = red_ai(AiConfig::deterministic());
        ai.update(&pitch, &pitch.nav, 0.016).unwrap();
        assert_eq!(ai.arena().target_point(), Pos3::new(3.0, 0.0, 6.0));
        assert_eq!(ai.arena().target_node(), Some(6));
    }

    #[test]
    fn test_armed_kart_chases_ball() {
        let mut me = kart_at(0, 0.0, 0.0, 0.0);
        me.powerup = PowerupType::Cake;
        let pitch = PitchBuilder::new()
            .kart(me, SoccerTeam::Red)
            .ball(0.0, 20.0)
            .item(bonus_box(3.0, 6.0, Some(6)))
            .build();
        let mut ai = red_ai(AiConfig::deterministic());
        ai.update(&pitch, &pitch.nav, 0.016).unwrap();
        assert_eq!(ai.arena().target_point(), Pos3::new(0.0, 0.0, 20.0));
        assert_eq!(ai.arena().target_node(), pitch.ball_node());
    }

    #[test]
    fn test_swatter_carrier_chases_ball() {
        let mut me = kart_at(0, 0.0, 0.0, 0.0);
        me.attachment = AttachmentType::Swatter;
        let pitch = PitchBuilder::new()
            .kart(me, SoccerTeam::Red)
            .ball(0.0, 20.0)
            .item(bonus_box(3.0, 6.0, Some(6)))
            .build();
        let mut ai = red_ai(AiConfig::deterministic());
        ai.update(&pitch, &pitch.nav, 0.016).unwrap();
        assert_eq!(ai.arena().target_point(), Pos3::new(0.0, 0.0, 20.0));
    }

    #[test]
    fn test_near_ball_goal_lined_up_shoots_straight() {
        // Red attacks the blue goal at +Z, kart faces +Z
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .ball(0.0, 2.0)
            .build();
        let ai = red_ai(AiConfig::deterministic());
        let me = pitch.kart(0).cloned().unwrap();
        let ball = pitch.ball_position();
        assert_eq!(ai.correct_ball_position(&pitch, &pitch.nav, &me, ball), ball);
    }

    #[test]
    fn test_near_ball_goal_off_angle_lines_up() {
        // Heading 60 degrees off +Z: the blue goal is ahead-left, well off the
        // heading axis. Ball 2m straight ahead.
        let heading = std::f32::consts::FRAC_PI_3;
        let ball = (2.0 * heading.sin(), 2.0 * heading.cos());
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, heading), SoccerTeam::Red)
            .ball(ball.0, ball.1)
            .build();
        let ai = red_ai(AiConfig::deterministic());
        let me = pitch.kart(0).cloned().unwrap();
        let corrected = ai.correct_ball_position(&pitch, &pitch.nav, &me, pitch.ball_position());

        // Goal on the left: one metre left of and one metre past the ball
        let (_, local) = check_position(&me.transform(), &corrected);
        assert!((local.x + 1.0).abs() < 1e-4);
        assert!((local.z - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_goal_behind_circles_around_ball() {
        // Red facing -Z: the blue goal at +Z is behind
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 1.0, 0.0, std::f32::consts::PI), SoccerTeam::Red)
            .ball(1.0, -6.0)
            .build();
        let ai = red_ai(AiConfig::deterministic());
        let me = pitch.kart(0).cloned().unwrap();
        let corrected = ai.correct_ball_position(&pitch, &pitch.nav, &me, pitch.ball_position());

        let (ball_pd, ball_lc) = check_position(&me.transform(), &pitch.ball_position());
        let (goal_pd, _) = check_position(&me.transform(), &node_center(BLUE_GOAL_NODE));
        assert!(goal_pd.behind);
        assert!(!ball_pd.behind);

        let expected_lc = if goal_pd.on_side {
            ball_lc + Vec3::new(2.0, 0.0, 2.0)
        } else {
            ball_lc + Vec3::new(-2.0, 0.0, 2.0)
        };
        let (_, corrected_lc) = check_position(&me.transform(), &corrected);
        assert!((corrected_lc - expected_lc).norm() < 1e-4);
        assert!(corrected_lc.z > ball_lc.z, "aim goes past the ball");
    }

    #[test]
    fn test_far_ball_unchanged() {
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .ball(0.0, 8.0)
            .build();
        let ai = red_ai(AiConfig::deterministic());
        let me = pitch.kart(0).cloned().unwrap();
        let ball = pitch.ball_position();
        assert_eq!(ai.correct_ball_position(&pitch, &pitch.nav, &me, ball), ball);
    }

    #[test]
    fn test_blue_attacks_red_goal() {
        // Blue facing -Z toward the red goal: lined up
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, std::f32::consts::PI), SoccerTeam::Blue)
            .ball(0.0, -2.0)
            .build();
        let mut ai = SoccerAi::new(0, AiConfig::deterministic());
        ai.reset(&pitch);
        let me = pitch.kart(0).cloned().unwrap();
        let ball = pitch.ball_position();
        assert_eq!(ai.correct_ball_position(&pitch, &pitch.nav, &me, ball), ball);
    }

    #[test]
    fn test_waits_during_start_phase() {
        let mut pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .ball(0.0, 2.0)
            .build();
        pitch.start_phase = true;
        let mut ai = red_ai(AiConfig::deterministic());
        let control = ai.update(&pitch, &pitch.nav, 0.016).unwrap();
        assert_eq!(control, KartControl::idle());
    }

    #[test]
    fn test_missing_kart_is_an_error() {
        let pitch = PitchBuilder::new()
            .kart(kart_at(0, 0.0, 0.0, 0.0), SoccerTeam::Red)
            .ball(0.0, 2.0)
            .build();
        let mut ai = SoccerAi::new(7, AiConfig::deterministic());
        assert!(ai.update(&pitch, &pitch.nav, 0.016).is_err());
    }

    #[test]
    fn test_update_drives_toward_ball_through_nav_mesh() {
        let mut me = kart_at(0, 0.0, -30.0, 0.0);
        me.powerup = PowerupType::Zipper;
        let pitch = PitchBuilder::new()
            .kart(me, SoccerTeam::Red)
            .ball(0.0, 20.0)
            .build();
        let mut ai = red_ai(AiConfig::deterministic());
        let control = ai.update(&pitch, &pitch.nav, 0.016).unwrap();

        // Kart on node 2, ball on node 7: next hop is node 3
        assert_eq!(ai.arena().aim_point(), node_center(3));
        assert!(control.steer.abs() < 1e-5);
        assert!((control.accel - 1.0).abs() < 1e-5);
        assert!(control.fire, "zipper toward a ball straight ahead");
    }
}
