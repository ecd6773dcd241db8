use crate::canvas::Canvas;
use crate::settings::PlotSettings;
use crate::sismograph::Sismograph;
use crate::PlotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use timing::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlotId(pub u64);

impl fmt::Display for PlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plot#{}", self.0)
    }
}

/// Hands out plot ids and builds plots with them. Each registry numbers its
/// plots independently.
#[derive(Debug, Default)]
pub struct PlotRegistry {
    next_id: u64,
}

impl PlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> PlotId {
        let id = PlotId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn issued(&self) -> u64 {
        self.next_id
    }

    pub fn create_sismograph<C: Canvas>(
        &mut self,
        canvas: C,
        clock: Box<dyn Clock>,
        settings: &PlotSettings,
    ) -> Result<Sismograph<C>, PlotError> {
        let id = self.next_id();
        Sismograph::with_settings(id, canvas, clock, settings)
    }
}
