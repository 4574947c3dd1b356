use super::day::Day;

/// The day a list of tasks is being viewed for.
///
/// Past days can be browsed freely; days after today cannot be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    current: Day,
}

impl DateCursor {
    pub fn new() -> Self {
        Self { current: Day::today() }
    }

    pub fn current(&self) -> Day {
        self.current
    }

    pub fn can_navigate_to(&self, day: Day) -> bool {
        day <= Day::today()
    }

    pub fn can_go_next(&self) -> bool {
        self.can_navigate_to(self.current.succ())
    }

    pub fn previous(&mut self) -> Day {
        self.current = self.current.pred();
        self.current
    }

    /// Moves one day forward unless that would pass today.
    pub fn next(&mut self) -> Option<Day> {
        if !self.can_go_next() {
            return None;
        }
        self.current = self.current.succ();
        Some(self.current)
    }

    pub fn today(&mut self) -> Day {
        self.current = Day::today();
        self.current
    }

    /// Jumps to `day`; returns false and stays put for future days.
    pub fn go_to(&mut self, day: Day) -> bool {
        if !self.can_navigate_to(day) {
            return false;
        }
        self.current = day;
        true
    }
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::new()
    }
}
