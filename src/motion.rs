use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotionLevel {
    Full,
    /// Same timing, but slides are replaced by fades.
    Reduced,
    /// No animation; enter and exit complete synchronously.
    None,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransitionPreset {
    None,
    Fade,
    SlideRight,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MotionTransition {
    pub preset: TransitionPreset,
    pub duration_ms: u16,
    pub delay_ms: u16,
}

impl Default for MotionTransition {
    fn default() -> Self {
        Self {
            preset: TransitionPreset::SlideRight,
            duration_ms: 300,
            delay_ms: 0,
        }
    }
}

impl MotionTransition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(mut self, preset: TransitionPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn duration_ms(mut self, duration_ms: u16) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn delay_ms(mut self, delay_ms: u16) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Timing for a notification's entry and exit.
///
/// `enter.delay_ms` is the pause between mounting the node off-screen and
/// flipping it on-screen, giving the host one layout pass first.
/// `exit.duration_ms` is how long the node stays mounted after dismissal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MotionConfig {
    pub level: MotionLevel,
    pub enter: MotionTransition,
    pub exit: MotionTransition,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            level: MotionLevel::Full,
            enter: MotionTransition::default().delay_ms(100),
            exit: MotionTransition::new(),
        }
    }
}

impl MotionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: MotionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn enter(mut self, enter: MotionTransition) -> Self {
        self.enter = enter;
        self
    }

    pub fn exit(mut self, exit: MotionTransition) -> Self {
        self.exit = exit;
        self
    }

    pub fn enter_delay(&self) -> Duration {
        match self.level {
            MotionLevel::None => Duration::ZERO,
            _ => Duration::from_millis(u64::from(self.enter.delay_ms)),
        }
    }

    pub fn exit_duration(&self) -> Duration {
        match self.level {
            MotionLevel::None => Duration::ZERO,
            _ => Duration::from_millis(u64::from(self.exit.duration_ms)),
        }
    }

    /// Preset the host should animate the notification in with.
    pub fn enter_preset(&self) -> TransitionPreset {
        self.effective_preset(self.enter)
    }

    pub fn exit_preset(&self) -> TransitionPreset {
        self.effective_preset(self.exit)
    }

    fn effective_preset(&self, transition: MotionTransition) -> TransitionPreset {
        match (self.level, transition.preset) {
            (MotionLevel::None, _) => TransitionPreset::None,
            (MotionLevel::Reduced, TransitionPreset::SlideRight) => TransitionPreset::Fade,
            (_, preset) => preset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_motion_waits_before_entry_and_during_exit() {
        let motion = MotionConfig::default();
        assert_eq!(motion.enter_delay(), Duration::from_millis(100));
        assert_eq!(motion.exit_duration(), Duration::from_millis(300));
    }

    #[test]
    fn disabled_motion_collapses_timing_and_reduced_motion_fades() {
        let none = MotionConfig::new().level(MotionLevel::None);
        assert_eq!(none.enter_delay(), Duration::ZERO);
        assert_eq!(none.exit_duration(), Duration::ZERO);
        assert_eq!(none.enter_preset(), TransitionPreset::None);

        let reduced = MotionConfig::new().level(MotionLevel::Reduced);
        assert_eq!(reduced.exit_preset(), TransitionPreset::Fade);
        assert_eq!(
            reduced
                .enter(MotionTransition::new().preset(TransitionPreset::None))
                .enter_preset(),
            TransitionPreset::None
        );
        assert_eq!(reduced.exit_duration(), Duration::from_millis(300));
    }
}
