//! The light fade-in show.
//!
//! After a rebuild (or switching the lamp on) the backlight stays dark for
//! a short beat so the user sees the object first, then ramps up smoothly.

use litho_math::ease_out_cubic;

/// Dark beat before the ramp starts, in seconds.
pub const TRIGGER_DELAY_S: f32 = 0.4;

/// Fade-in duration, in seconds.
pub const RAMP_DURATION_S: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Delay { remaining: f32 },
    Ramp { elapsed: f32 },
}

/// Wall-clock driven fade of the backlight intensity.
///
/// Driven by elapsed frame time, not frame count, so the show runs the same
/// 1.9 seconds on every display.
#[derive(Clone, Debug)]
pub struct LightTransition {
    phase: Phase,
    level: f32,
}

impl LightTransition {
    /// A finished transition at full intensity.
    pub fn full() -> Self {
        Self {
            phase: Phase::Idle,
            level: 1.0,
        }
    }

    /// A finished transition at zero intensity.
    pub fn dark() -> Self {
        Self {
            phase: Phase::Idle,
            level: 0.0,
        }
    }

    /// Starts (or restarts) the show. Any in-flight show is cancelled and
    /// timing restarts from the delay.
    pub fn trigger(&mut self) {
        self.phase = Phase::Delay {
            remaining: TRIGGER_DELAY_S,
        };
        self.level = 0.0;
    }

    /// Cancels the show and snaps to zero intensity.
    pub fn extinguish(&mut self) {
        self.phase = Phase::Idle;
        self.level = 0.0;
    }

    /// Advances by `dt` seconds. Leftover time spills from the delay into
    /// the ramp so chunky frames do not stretch the show.
    pub fn advance(&mut self, dt: f32) {
        match self.phase {
            Phase::Idle => {}
            Phase::Delay { remaining } => {
                if dt < remaining {
                    self.phase = Phase::Delay {
                        remaining: remaining - dt,
                    };
                } else {
                    self.phase = Phase::Ramp { elapsed: 0.0 };
                    self.ramp_to(dt - remaining);
                }
            }
            Phase::Ramp { elapsed } => {
                self.ramp_to(elapsed + dt);
            }
        }
    }

    fn ramp_to(&mut self, elapsed: f32) {
        let progress = elapsed / RAMP_DURATION_S;
        if progress >= 1.0 {
            self.phase = Phase::Idle;
            self.level = 1.0;
        } else {
            self.phase = Phase::Ramp { elapsed };
            self.level = ease_out_cubic(progress);
        }
    }

    /// Current intensity in [0, 1].
    pub fn level(&self) -> f32 {
        self.level
    }

    /// `true` while a show is delaying or ramping.
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_goes_dark_through_the_delay() {
        let mut show = LightTransition::full();
        show.trigger();
        assert_eq!(show.level(), 0.0);
        show.advance(0.2);
        assert_eq!(show.level(), 0.0);
        assert!(show.is_active());
    }

    #[test]
    fn test_ramp_follows_ease_out_cubic() {
        let mut show = LightTransition::dark();
        show.trigger();
        show.advance(TRIGGER_DELAY_S);
        assert_eq!(show.level(), 0.0, "ramp starts at zero");

        show.advance(RAMP_DURATION_S / 2.0);
        assert!((show.level() - 0.875).abs() < 1e-5, "level {}", show.level());
    }

    #[test]
    fn test_show_completes_at_full_intensity() {
        let mut show = LightTransition::dark();
        show.trigger();
        show.advance(TRIGGER_DELAY_S + RAMP_DURATION_S + 0.01);
        assert_eq!(show.level(), 1.0);
        assert!(!show.is_active());
    }

    #[test]
    fn test_chunked_advance_matches_one_big_step() {
        let mut chunked = LightTransition::dark();
        let mut single = LightTransition::dark();
        chunked.trigger();
        single.trigger();

        let total = 1.1;
        let steps = 37;
        for _ in 0..steps {
            chunked.advance(total / steps as f32);
        }
        single.advance(total);
        assert!(
            (chunked.level() - single.level()).abs() < 1e-4,
            "chunked {} vs single {}",
            chunked.level(),
            single.level()
        );
    }

    #[test]
    fn test_retrigger_restarts_from_the_delay() {
        let mut show = LightTransition::dark();
        show.trigger();
        show.advance(TRIGGER_DELAY_S + 0.75);
        assert!(show.level() > 0.8);

        show.trigger();
        assert_eq!(show.level(), 0.0);
        show.advance(0.3);
        assert_eq!(show.level(), 0.0, "still inside the fresh delay");
    }

    #[test]
    fn test_extinguish_cancels_mid_flight() {
        let mut show = LightTransition::dark();
        show.trigger();
        show.advance(1.0);
        assert!(show.is_active());
        show.extinguish();
        assert!(!show.is_active());
        assert_eq!(show.level(), 0.0);
        show.advance(10.0);
        assert_eq!(show.level(), 0.0, "idle never raises the level");
    }
}
