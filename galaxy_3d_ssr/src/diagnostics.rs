/// One-time diagnostics
///
/// Conditions such as a missing material or an active debug overlay persist
/// for many frames; they are reported once and re-armed when they clear.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneShotNotice {
    emitted: bool,
}

impl OneShotNotice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time it is called since the last reset
    pub fn notify(&mut self) -> bool {
        !std::mem::replace(&mut self.emitted, true)
    }

    /// Re-arm once the condition cleared
    pub fn reset(&mut self) {
        self.emitted = false;
    }

    pub fn is_emitted(&self) -> bool {
        self.emitted
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
