/// Lifecycle of the display loop.
///
/// `Uninitialized → ContextReady → Running → Terminated`. Any phase may
/// terminate; nothing leaves `Terminated`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DisplayPhase {
    /// No window or GPU context yet.
    #[default]
    Uninitialized,
    /// Window and GPU context exist; app resources not yet built.
    ContextReady,
    /// Frames are being filled, uploaded and presented.
    Running,
    /// Close requested or fatal error; no more frames.
    Terminated,
}

impl DisplayPhase {
    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(self, next: DisplayPhase) -> bool {
        use DisplayPhase::*;
        match (self, next) {
            (Terminated, _) => false,
            (_, Terminated) => true,
            (Uninitialized, ContextReady) | (ContextReady, Running) => true,
            _ => false,
        }
    }

    pub fn is_running(self) -> bool {
        self == DisplayPhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::DisplayPhase::{self, *};

    const ALL: [DisplayPhase; 4] = [Uninitialized, ContextReady, Running, Terminated];

    #[test]
    fn forward_path_is_legal() {
        assert!(Uninitialized.can_transition_to(ContextReady));
        assert!(ContextReady.can_transition_to(Running));
        assert!(Running.can_transition_to(Terminated));
    }

    #[test]
    fn every_live_phase_can_terminate() {
        for p in [Uninitialized, ContextReady, Running] {
            assert!(p.can_transition_to(Terminated), "{p:?}");
        }
    }

    #[test]
    fn terminated_is_final() {
        for p in ALL {
            assert!(!Terminated.can_transition_to(p), "{p:?}");
        }
    }

    #[test]
    fn no_skips_or_backward_moves() {
        assert!(!Uninitialized.can_transition_to(Running));
        assert!(!Running.can_transition_to(ContextReady));
        assert!(!ContextReady.can_transition_to(Uninitialized));
        for p in ALL {
            assert!(!p.can_transition_to(p), "{p:?}");
        }
    }

    #[test]
    fn default_is_uninitialized() {
        assert_eq!(DisplayPhase::default(), Uninitialized);
        assert!(!Uninitialized.is_running());
        assert!(Running.is_running());
    }
}
