//! Soccer AI Bridge for Godot
//!
//! One bridge per AI kart. The engine serialises the pitch state every frame
//! (see `kart_core::snapshot`) and gets the kart controls back as JSON.

use godot::prelude::*;
use kart_core::{AiConfig, ArenaBehavior, PitchSnapshot, SoccerAi};
use std::cell::RefCell;

use crate::{build_info, error_response, install_panic_hook};

#[derive(GodotClass)]
#[class(base=RefCounted)]
pub struct SoccerAiBridge {
    base: Base<RefCounted>,
    config: RefCell<AiConfig>,
    ai: RefCell<Option<SoccerAi>>,
}

#[godot_api]
impl IRefCounted for SoccerAiBridge {
    fn init(base: Base<RefCounted>) -> Self {
        install_panic_hook();
        Self {
            base,
            config: RefCell::new(AiConfig::default()),
            ai: RefCell::new(None),
        }
    }
}

#[godot_api]
impl SoccerAiBridge {
    /// Select a difficulty preset ("easy", "medium", "hard", "deterministic").
    /// Takes effect on the next `reset`.
    #[func]
    pub fn set_preset(&self, name: GString) -> bool {
        match AiConfig::preset(&name.to_string()) {
            Some(config) => {
                *self.config.borrow_mut() = config;
                true
            }
            None => {
                godot_error!("Unknown AI preset: {}", name);
                false
            }
        }
    }

    /// Load tuning values from YAML; missing keys keep their defaults.
    #[func]
    pub fn load_config_yaml(&self, yaml: GString) -> GString {
        match AiConfig::from_yaml_str(&yaml.to_string()) {
            Ok(config) => {
                *self.config.borrow_mut() = config;
                GString::from(serde_json::json!({ "success": true }).to_string().as_str())
            }
            Err(e) => {
                godot_error!("Invalid AI config: {}", e);
                error_response(&e.to_string(), "INVALID_CONFIG")
            }
        }
    }

    /// (Re)create the controller for `kart_id` at the start of a match.
    #[func]
    pub fn reset(&self, kart_id: i64, snapshot_json: GString) -> GString {
        let pitch = match PitchSnapshot::from_json(&snapshot_json.to_string()) {
            Ok(pitch) => pitch,
            Err(e) => {
                godot_error!("reset: invalid snapshot: {}", e);
                return error_response(&e.to_string(), "INVALID_SNAPSHOT");
            }
        };
        if kart_id < 0 || kart_id as usize >= pitch.karts.len() {
            return error_response(&format!("No kart with id {}", kart_id), "INVALID_KART");
        }

        let mut ai = SoccerAi::new(kart_id as usize, self.config.borrow().clone());
        ai.reset(&pitch);
        let team = ai.team();
        *self.ai.borrow_mut() = Some(ai);

        godot_print!("SoccerAi ready for kart {} ({:?})", kart_id, team);
        let response = serde_json::json!({ "success": true, "team": team });
        GString::from(response.to_string().as_str())
    }

    /// Controls for this frame, or an error payload.
    #[func]
    pub fn update(&self, snapshot_json: GString, dt: f64) -> GString {
        let mut slot = self.ai.borrow_mut();
        let Some(ai) = slot.as_mut() else {
            return error_response("update called before reset", "NOT_READY");
        };

        let pitch = match PitchSnapshot::from_json(&snapshot_json.to_string()) {
            Ok(pitch) => pitch,
            Err(e) => {
                godot_error!("update: invalid snapshot: {}", e);
                return error_response(&e.to_string(), "INVALID_SNAPSHOT");
            }
        };

        match ai.update(&pitch, &pitch.nav, dt as f32) {
            Ok(control) => {
                let response = serde_json::json!({ "success": true, "control": control });
                GString::from(response.to_string().as_str())
            }
            Err(e) => {
                if !e.is_recoverable() {
                    *slot = None;
                }
                error_response(&e.to_string(), "UPDATE_FAILED")
            }
        }
    }

    /// Current target and aim, for on-screen debugging.
    #[func]
    pub fn debug_state(&self) -> GString {
        let slot = self.ai.borrow();
        let Some(ai) = slot.as_ref() else {
            return error_response("not reset", "NOT_READY");
        };
        let arena = ai.arena();
        let response = serde_json::json!({
            "success": true,
            "kart_id": arena.kart_id(),
            "team": ai.team(),
            "target_point": arena.target_point(),
            "target_node": arena.target_node(),
            "aim_point": arena.aim_point(),
            "closest_kart": arena.closest_kart().map(|k| k.id),
            "reversing": arena.is_reversing(),
        });
        GString::from(response.to_string().as_str())
    }

    #[func]
    pub fn get_version(&self) -> GString {
        GString::from(format!("v{}", env!("CARGO_PKG_VERSION")).as_str())
    }

    #[func]
    pub fn get_build_info(&self) -> GString {
        build_info()
    }
}
