//! Shared arena navigation
//!
//! Steering toward a target through the nav mesh, U-turns, stuck recovery,
//! nitro and power-up usage. What to drive to is decided by the mode through
//! `ArenaBehavior`.

use crate::config::AiConfig;
use crate::geometry::{check_position, distance_2d, steer_angle, PosData, Pos3};
use crate::items::{ArenaItem, AttachmentType, PowerupType};
use crate::world::{KartState, NavMesh};

use super::KartControl;

/// Closest opponent as of the last update.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosestKart {
    pub id: usize,
    pub point: Pos3,
    pub node: Option<usize>,
    pub pos: PosData,
}

#[derive(Debug, Clone)]
pub struct ArenaAi {
    kart_id: usize,
    config: AiConfig,
    closest_kart: Option<ClosestKart>,
    target_point: Pos3,
    target_node: Option<usize>,
    /// Current target is the ball rather than an item or kart
    target_is_ball: bool,
    aim_point: Pos3,
    stuck_timer: f32,
    reverse_timer: f32,
    controls: KartControl,
}

impl ArenaAi {
    pub fn new(kart_id: usize, config: AiConfig) -> Self {
        Self {
            kart_id,
            config,
            closest_kart: None,
            target_point: Pos3::origin(),
            target_node: None,
            target_is_ball: false,
            aim_point: Pos3::origin(),
            stuck_timer: 0.0,
            reverse_timer: 0.0,
            controls: KartControl::idle(),
        }
    }

    /// Forget everything learned during the previous match.
    pub fn reset(&mut self) {
        self.closest_kart = None;
        self.target_point = Pos3::origin();
        self.target_node = None;
        self.target_is_ball = false;
        self.aim_point = Pos3::origin();
        self.stuck_timer = 0.0;
        self.reverse_timer = 0.0;
        self.controls = KartControl::idle();
    }

    pub fn kart_id(&self) -> usize {
        self.kart_id
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn closest_kart(&self) -> Option<&ClosestKart> {
        self.closest_kart.as_ref()
    }

    pub fn target_point(&self) -> Pos3 {
        self.target_point
    }

    pub fn target_node(&self) -> Option<usize> {
        self.target_node
    }

    /// Point actually steered at: the target itself or the next nav poly on the way
    pub fn aim_point(&self) -> Pos3 {
        self.aim_point
    }

    pub fn controls(&self) -> KartControl {
        self.controls
    }

    pub fn is_reversing(&self) -> bool {
        self.reverse_timer > 0.0
    }

    pub fn set_closest_kart(&mut self, closest: Option<ClosestKart>) {
        self.closest_kart = closest;
    }

    pub fn set_target(&mut self, point: Pos3, node: Option<usize>) {
        self.target_point = point;
        self.target_node = node;
        self.target_is_ball = false;
    }

    pub fn set_ball_target(&mut self, point: Pos3, node: Option<usize>) {
        self.set_target(point, node);
        self.target_is_ball = true;
    }

    pub fn is_chasing_ball(&self) -> bool {
        self.target_is_ball
    }

    pub(crate) fn stop(&mut self) {
        self.stuck_timer = 0.0;
        self.reverse_timer = 0.0;
        self.controls = KartControl::idle();
    }

    /// Closest collectable item; otherwise the closest opponent; otherwise `fallback`.
    pub fn collect_item_in_arena(
        &self,
        kart: &KartState,
        items: &[ArenaItem],
        fallback: (Pos3, Option<usize>),
    ) -> (Pos3, Option<usize>) {
        let selected = items
            .iter()
            .filter(|item| item.is_collectable())
            .map(|item| (distance_2d(&kart.position, &item.position), item))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((_, item)) = selected {
            return (item.position, item.node);
        }

        match &self.closest_kart {
            Some(closest) => (closest.point, closest.node),
            None => fallback,
        }
    }

    pub(crate) fn check_if_stuck(&mut self, kart: &KartState, dt: f32) {
        let cfg = &self.config.steering;
        if !cfg.detect_stuck {
            return;
        }

        if self.reverse_timer > 0.0 {
            self.reverse_timer = (self.reverse_timer - dt).max(0.0);
            return;
        }

        if kart.speed.abs() < cfg.stuck_speed {
            self.stuck_timer += dt;
            if self.stuck_timer >= cfg.stuck_time {
                log::debug!("kart {} stuck for {:.1}s, reversing", self.kart_id, self.stuck_timer);
                self.stuck_timer = 0.0;
                self.reverse_timer = cfg.reverse_time;
            }
        } else {
            self.stuck_timer = 0.0;
        }
    }

    fn find_aim_point(&self, current: Option<usize>, nav: &dyn NavMesh) -> Pos3 {
        let (Some(current), Some(target)) = (current, self.target_node) else {
            return self.target_point;
        };
        if current == target {
            return self.target_point;
        }

        match nav.next_node(current, target) {
            Some(next) if next == target => self.target_point,
            Some(next) => nav.poly_center(next).unwrap_or(self.target_point),
            None => {
                log::debug!("kart {}: no path {} -> {}, aiming straight", self.kart_id, current, target);
                self.target_point
            }
        }
    }

    /// Steering, throttle and nitro toward the current target.
    pub(crate) fn drive(&mut self, kart: &KartState, current: Option<usize>, nav: &dyn NavMesh) {
        let cfg = &self.config.steering;
        self.aim_point = self.find_aim_point(current, nav);

        let (aim, local) = check_position(&kart.transform(), &self.aim_point);
        // aim.angle folds points behind onto the front half
        let heading_error = steer_angle(&local);
        let steer = (heading_error / cfg.max_steer_angle).clamp(-1.0, 1.0);

        if self.reverse_timer > 0.0 || (aim.behind && aim.distance < cfg.uturn_distance) {
            self.controls = KartControl::reverse(steer);
            return;
        }

        let accel =
            if heading_error.abs() > cfg.sharp_turn_angle { cfg.turn_accel } else { cfg.max_accel };
        let nitro = cfg.use_nitro
            && !aim.behind
            && aim.angle < cfg.nitro_angle
            && kart.speed > cfg.nitro_min_speed;

        self.controls = KartControl { steer, accel, brake: false, nitro, fire: false, look_back: false };
    }

    /// Decide whether to use the held power-up this frame.
    pub(crate) fn handle_arena_items(&mut self, kart: &KartState) {
        self.controls.fire = false;
        self.controls.look_back = false;

        let cfg = &self.config.items;
        if !cfg.use_items || kart.powerup.is_nothing() {
            return;
        }

        let closest = self.closest_kart.as_ref().map(|c| c.pos);
        let (fire, look_back) = match kart.powerup {
            PowerupType::Nothing => (false, false),
            PowerupType::Swatter => {
                // Already swinging one
                let armed = kart.attachment == AttachmentType::Swatter;
                (!armed && closest.is_some_and(|c| c.distance < cfg.close_distance), false)
            }
            PowerupType::Bubblegum => {
                (closest.is_some_and(|c| c.distance < cfg.close_distance), false)
            }
            PowerupType::Zipper => {
                let (target, _) = check_position(&kart.transform(), &self.target_point);
                let fire = self.target_is_ball
                    && !target.behind
                    && target.angle < cfg.fire_angle
                    && target.distance > cfg.zipper_min_distance;
                (fire, false)
            }
            PowerupType::Switch | PowerupType::Parachute => (true, false),
            p if p.is_forward_projectile() => match closest {
                Some(c) if !c.behind && c.distance < cfg.fire_distance && c.angle < cfg.fire_angle => {
                    (true, false)
                }
                Some(c)
                    if p.can_fire_backwards()
                        && c.behind
                        && c.distance < cfg.close_distance
                        && c.angle < cfg.fire_angle =>
                {
                    (true, true)
                }
                _ => (false, false),
            },
            _ => (false, false),
        };

        if fire {
            log::debug!("kart {} fires {:?} (look_back={})", self.kart_id, kart.powerup, look_back);
        }
        self.controls.fire = fire;
        self.controls.look_back = look_back;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemKind;
    use crate::test_fixtures::*;

    fn ai() -> ArenaAi {
        ArenaAi::new(0, AiConfig::deterministic())
    }

    fn closest_at(ai: &mut ArenaAi, kart: &KartState, point: Pos3) {
        let (pos, _) = check_position(&kart.transform(), &point);
        ai.set_closest_kart(Some(ClosestKart { id: 1, point, node: None, pos }));
    }

    #[test]
    fn test_collect_picks_closest_bonus_box() {
        let ai = ai();
        let kart = kart_at(0, 0.0, 0.0, 0.0);
        let items = vec![
            bonus_box(0.0, 30.0, Some(8)),
            ArenaItem { kind: ItemKind::Banana, position: Pos3::new(0.0, 0.0, 2.0), node: None, available: true },
            bonus_box(5.0, 5.0, Some(5)),
            ArenaItem { available: false, ..bonus_box(1.0, 1.0, Some(5)) },
        ];
        let (point, node) = ai.collect_item_in_arena(&kart, &items, (Pos3::origin(), None));
        assert_eq!(point, Pos3::new(5.0, 0.0, 5.0));
        assert_eq!(node, Some(5));
    }

    #[test]
    fn test_collect_falls_back_to_closest_kart_then_fallback() {
        let mut ai = ai();
        let kart = kart_at(0, 0.0, 0.0, 0.0);
        let ball = (Pos3::new(9.0, 0.0, 9.0), Some(3));

        assert_eq!(ai.collect_item_in_arena(&kart, &[], ball), ball);

        closest_at(&mut ai, &kart, Pos3::new(-4.0, 0.0, 2.0));
        let (point, _) = ai.collect_item_in_arena(&kart, &[], ball);
        assert_eq!(point, Pos3::new(-4.0, 0.0, 2.0));
    }

    #[test]
    fn test_drive_straight_at_target_on_same_node() {
        let mut ai = ai();
        let nav = line_nav();
        let kart = kart_at(0, 0.0, 0.0, 0.0);
        ai.set_target(Pos3::new(0.0, 0.0, 4.0), Some(5));
        ai.drive(&kart, Some(5), &nav);

        let c = ai.controls();
        assert!(c.steer.abs() < 1e-5);
        assert!((c.accel - 1.0).abs() < 1e-5);
        assert!(!c.brake);
        assert_eq!(ai.aim_point(), Pos3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_drive_follows_next_nav_poly() {
        let mut ai = ai();
        let nav = line_nav();
        let kart = kart_at(0, 3.0, 0.0, 0.0);
        ai.set_target(Pos3::new(0.0, 0.0, 40.0), Some(9));
        ai.drive(&kart, Some(5), &nav);

        // Next hop from node 5 toward 9 is node 6 at z = 10
        assert_eq!(ai.aim_point(), node_center(6));
        assert!(ai.controls().steer < 0.0, "target is to the left of a kart at x=3");
    }

    #[test]
    fn test_drive_aims_straight_when_off_mesh() {
        let mut ai = ai();
        let nav = line_nav();
        let kart = kart_at(0, 0.0, 0.0, 0.0);
        ai.set_target(Pos3::new(0.0, 0.0, 40.0), Some(9));
        ai.drive(&kart, None, &nav);
        assert_eq!(ai.aim_point(), Pos3::new(0.0, 0.0, 40.0));
    }

    #[test]
    fn test_uturn_reverses_with_inverted_steer() {
        let mut ai = ai();
        let nav = line_nav();
        let kart = kart_at(0, 0.0, 0.0, 0.0);
        ai.set_target(Pos3::new(2.0, 0.0, -3.0), Some(5));
        ai.drive(&kart, Some(5), &nav);

        let c = ai.controls();
        assert!(c.brake);
        assert_eq!(c.accel, 0.0);
        assert!(c.steer < 0.0, "behind-right target reverses with left lock");
    }

    #[test]
    fn test_far_target_behind_turns_forward() {
        let mut ai = ai();
        let nav = line_nav();
        let kart = kart_at(0, 0.0, 0.0, 0.0);
        ai.set_target(Pos3::new(1.0, 0.0, -30.0), None);
        ai.drive(&kart, None, &nav);

        let c = ai.controls();
        assert!(!c.brake);
        assert!((c.accel - 0.5).abs() < 1e-5, "sharp turn eases throttle");
        assert!((c.steer - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_nitro_on_fast_straight() {
        let mut ai = ai();
        let nav = line_nav();
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.speed = 20.0;
        ai.set_target(Pos3::new(0.0, 0.0, 30.0), None);
        ai.drive(&kart, None, &nav);
        assert!(ai.controls().nitro);

        kart.speed = 5.0;
        ai.drive(&kart, None, &nav);
        assert!(!ai.controls().nitro);
    }

    #[test]
    fn test_stuck_kart_reverses_then_recovers() {
        let mut config = AiConfig::default();
        config.steering.stuck_time = 1.0;
        config.steering.reverse_time = 0.5;
        let mut ai = ArenaAi::new(0, config);
        let kart = kart_at(0, 0.0, 0.0, 0.0);

        ai.check_if_stuck(&kart, 0.6);
        assert!(!ai.is_reversing());
        ai.check_if_stuck(&kart, 0.6);
        assert!(ai.is_reversing());

        ai.check_if_stuck(&kart, 0.3);
        assert!(ai.is_reversing());
        ai.check_if_stuck(&kart, 0.3);
        assert!(!ai.is_reversing());
    }

    #[test]
    fn test_moving_kart_never_stuck() {
        let mut config = AiConfig::default();
        config.steering.stuck_time = 1.0;
        let mut ai = ArenaAi::new(0, config);
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.speed = 8.0;
        for _ in 0..10 {
            ai.check_if_stuck(&kart, 0.5);
        }
        assert!(!ai.is_reversing());
    }

    #[test]
    fn test_cake_fires_at_opponent_ahead_only() {
        let mut ai = ai();
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.powerup = PowerupType::Cake;

        closest_at(&mut ai, &kart, Pos3::new(0.5, 0.0, 15.0));
        ai.handle_arena_items(&kart);
        assert!(ai.controls().fire);
        assert!(!ai.controls().look_back);

        closest_at(&mut ai, &kart, Pos3::new(0.0, 0.0, -5.0));
        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire, "cake cannot be thrown backwards");
    }

    #[test]
    fn test_bowling_fires_backwards_at_tailgater() {
        let mut ai = ai();
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.powerup = PowerupType::Bowling;
        closest_at(&mut ai, &kart, Pos3::new(0.2, 0.0, -5.0));
        ai.handle_arena_items(&kart);
        assert!(ai.controls().fire);
        assert!(ai.controls().look_back);
    }

    #[test]
    fn test_swatter_waits_for_close_opponent() {
        let mut ai = ai();
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.powerup = PowerupType::Swatter;

        closest_at(&mut ai, &kart, Pos3::new(20.0, 0.0, 20.0));
        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire);

        closest_at(&mut ai, &kart, Pos3::new(-3.0, 0.0, -3.0));
        ai.handle_arena_items(&kart);
        assert!(ai.controls().fire);
    }

    #[test]
    fn test_plunger_never_fires_backwards() {
        let mut ai = ai();
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.powerup = PowerupType::Plunger;
        closest_at(&mut ai, &kart, Pos3::new(0.2, 0.0, -5.0));
        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire);
        assert!(!ai.controls().look_back);
    }

    #[test]
    fn test_zipper_only_when_chasing_ball() {
        let mut ai = ai();
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.powerup = PowerupType::Zipper;

        ai.set_target(Pos3::new(0.0, 0.0, 20.0), Some(7));
        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire, "bonus box straight ahead is not worth a zipper");

        ai.set_ball_target(Pos3::new(0.0, 0.0, 20.0), Some(7));
        ai.handle_arena_items(&kart);
        assert!(ai.controls().fire);

        ai.set_ball_target(Pos3::new(0.0, 0.0, 3.0), Some(5));
        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire, "ball too close");
    }

    #[test]
    fn test_switch_and_parachute_fire_immediately() {
        for powerup in [PowerupType::Switch, PowerupType::Parachute] {
            let mut ai = ai();
            let mut kart = kart_at(0, 0.0, 0.0, 0.0);
            kart.powerup = powerup;
            ai.handle_arena_items(&kart);
            assert!(ai.controls().fire, "{:?}", powerup);
            assert!(!ai.controls().look_back);
        }
    }

    #[test]
    fn test_bubblegum_fires_at_close_opponent() {
        let mut ai = ai();
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.powerup = PowerupType::Bubblegum;

        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire, "no opponent known");

        closest_at(&mut ai, &kart, Pos3::new(0.0, 0.0, 30.0));
        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire);

        closest_at(&mut ai, &kart, Pos3::new(2.0, 0.0, -4.0));
        ai.handle_arena_items(&kart);
        assert!(ai.controls().fire);
    }

    #[test]
    fn test_easy_never_fires() {
        let mut ai = ArenaAi::new(0, AiConfig::easy());
        let mut kart = kart_at(0, 0.0, 0.0, 0.0);
        kart.powerup = PowerupType::Switch;
        ai.handle_arena_items(&kart);
        assert!(!ai.controls().fire);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ai = ai();
        ai.set_target(Pos3::new(1.0, 2.0, 3.0), Some(4));
        ai.reset();
        assert_eq!(ai.target_node(), None);
        assert!(ai.closest_kart().is_none());
        assert_eq!(ai.controls(), KartControl::idle());
    }
}
