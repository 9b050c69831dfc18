/// Per-frame pass schedule
///
/// A `PassSchedule` is computed fresh every frame by
/// `ReflectionFeature::schedule` and discarded after use.

use bitflags::bitflags;

/// Reflection passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Forward-path surface attribute buffers
    AttributeSynthesis,
    /// Back-face depth
    Thickness,
    /// Ray march and resolve
    Resolve,
}

impl PassKind {
    /// Profiling scope name
    pub fn profiler_tag(&self) -> &'static str {
        match self {
            PassKind::AttributeSynthesis => "Render Forward GBuffer",
            PassKind::Thickness => "Render Backface Depth",
            PassKind::Resolve => "Screen Space Reflection",
        }
    }
}

/// Points of the host frame where passes can be injected, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InjectionPoint {
    BeforeOpaques,
    AfterOpaques,
    BeforeTransparents,
    AfterTransparents,
    BeforePostProcessing,
    AfterPostProcessing,
}

impl InjectionPoint {
    pub const ALL: [InjectionPoint; 6] = [
        InjectionPoint::BeforeOpaques,
        InjectionPoint::AfterOpaques,
        InjectionPoint::BeforeTransparents,
        InjectionPoint::AfterTransparents,
        InjectionPoint::BeforePostProcessing,
        InjectionPoint::AfterPostProcessing,
    ];
}

bitflags! {
    /// Host inputs a pass reads
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PassInputs: u32 {
        const DEPTH = 1 << 0;
        const NORMAL = 1 << 1;
        const MOTION = 1 << 2;
        const COLOR = 1 << 3;
    }
}

/// One scheduled pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledPass {
    pub kind: PassKind,
    pub point: InjectionPoint,
    pub inputs: PassInputs,
}

/// Ordered passes for one camera and one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSchedule {
    passes: Vec<ScheduledPass>,
}

impl PassSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass; passes at the same point run in push order
    pub fn push(&mut self, kind: PassKind, point: InjectionPoint, inputs: PassInputs) {
        self.passes.push(ScheduledPass { kind, point, inputs });
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Passes in execution order (by injection point, then push order)
    pub fn ordered(&self) -> Vec<ScheduledPass> {
        let mut ordered = self.passes.clone();
        ordered.sort_by_key(|p| p.point);
        ordered
    }

    /// Passes injected at `point`, in push order
    pub fn passes_at(&self, point: InjectionPoint) -> impl Iterator<Item = &ScheduledPass> + '_ {
        self.passes.iter().filter(move |p| p.point == point)
    }

    pub fn contains(&self, kind: PassKind) -> bool {
        self.passes.iter().any(|p| p.kind == kind)
    }

    pub fn injection_point(&self, kind: PassKind) -> Option<InjectionPoint> {
        self.passes.iter().find(|p| p.kind == kind).map(|p| p.point)
    }

    /// Distinct injection points used, in pipeline order
    pub fn injection_points(&self) -> Vec<InjectionPoint> {
        InjectionPoint::ALL
            .iter()
            .copied()
            .filter(|point| self.passes.iter().any(|p| p.point == *point))
            .collect()
    }

    /// Union of all inputs the host must provide
    pub fn required_inputs(&self) -> PassInputs {
        self.passes.iter().fold(PassInputs::empty(), |acc, p| acc | p.inputs)
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
