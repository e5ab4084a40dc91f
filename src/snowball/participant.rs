//! A single Snowball binary-agreement participant (§3, §4.6).

/// Per-participant Snowball state. `color` is the tri-state preference
/// (`None` stands for ⊥, the undecided state); `d[0]`/`d[1]` track how many
/// times each color has won a sampled-majority round, and `count` is the
/// consecutive-success streak for `lastcolor` that drives termination.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: usize,
    pub color: Option<bool>,
    lastcolor: Option<bool>,
    d: [u32; 2],
    count: u32,
    alpha: f64,
    beta: u32,
    k: usize,
}

impl Participant {
    pub fn new(id: usize, alpha: f64, beta: u32, k: usize) -> Self {
        Participant { id, color: None, lastcolor: None, d: [0, 0], count: 0, alpha, beta, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// `|d[1] - d[0]|`. Panics (debug builds only) if the `d[color] >=
    /// d[¬color]` invariant has been violated — an implementation bug, not
    /// a protocol outcome.
    pub fn confidence(&self) -> u32 {
        if let Some(color) = self.color {
            debug_assert!(
                self.d[color as usize] >= self.d[!color as usize],
                "snowball invariant violated: d[color] < d[not color]"
            );
        }
        (self.d[1] as i64 - self.d[0] as i64).unsigned_abs() as u32
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// A participant is finished once its streak crosses `beta`. An
    /// undecided (⊥) participant is never finished.
    pub fn is_finished(&self) -> bool {
        self.count >= self.beta
    }

    /// Eligible to take a step: has a color and hasn't finished.
    pub fn is_active(&self) -> bool {
        self.color.is_some() && !self.is_finished()
    }

    /// Responds to an incoming query. The first query an undecided (⊥)
    /// participant ever receives fixes its color to the querier's color
    /// (§4.6, §9 Open Questions (c)); honest participants are normally
    /// seeded with an initial color before any query arrives.
    pub fn respond_to_query(&mut self, _from: usize, color: bool) -> bool {
        if self.color.is_none() {
            self.color = Some(color);
        }
        self.color.expect("just set above")
    }

    /// Seeds the initial color, used once at protocol reset (§9 Open
    /// Questions (c)).
    pub fn set_initial_color(&mut self, color: bool) {
        self.color = Some(color);
    }

    /// Tallies the responses collected from a sampled peer subset and
    /// applies the Snowball update rule (§4.6 steps 3-4).
    pub fn update(&mut self, responses: &[Option<bool>]) {
        let mut tally = [0u32; 2];
        for r in responses {
            if let Some(c) = r {
                tally[*c as usize] += 1;
            }
        }
        let threshold = (self.k as f64 * self.alpha).ceil() as u32;

        // Deterministic tie-break: false is checked before true, matching
        // the original's dict key iteration order.
        let winner = [false, true].into_iter().find(|&c| tally[c as usize] >= threshold);

        match winner {
            Some(c) => {
                self.d[c as usize] += 1;
                let current = self.color.expect("update called on an undecided participant");
                if self.d[c as usize] > self.d[current as usize] {
                    self.color = Some(c);
                }
                if Some(c) == self.lastcolor {
                    self.count += 1;
                } else {
                    self.count = 0;
                    self.lastcolor = Some(c);
                }
            }
            None => {
                self.count = 0;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_query_fixes_undecided_color() {
        let mut p = Participant::new(0, 0.8, 120, 10);
        assert_eq!(p.color, None);
        assert_eq!(p.respond_to_query(1, true), true);
        assert_eq!(p.color, Some(true));
        // Further queries don't change the answer regardless of the asked color.
        assert_eq!(p.respond_to_query(2, false), true);
    }

    #[test]
    fn update_switches_color_on_higher_conviction() {
        let mut p = Participant::new(0, 0.8, 120, 10);
        p.set_initial_color(false);
        // 10 peers, alpha 0.8 => threshold = 8
        let votes: Vec<Option<bool>> = (0..10).map(|_| Some(true)).collect();
        p.update(&votes);
        assert_eq!(p.color, Some(true));
        assert_eq!(p.count(), 0);
        p.update(&votes);
        assert_eq!(p.count(), 1);
    }

    #[test]
    fn inconclusive_round_resets_count_without_changing_color() {
        let mut p = Participant::new(0, 0.8, 120, 10);
        p.set_initial_color(false);
        let votes: Vec<Option<bool>> = vec![Some(true), Some(false), None, None, None];
        p.update(&votes);
        assert_eq!(p.color, Some(false));
        assert_eq!(p.count(), 0);
    }

    #[test]
    fn finishes_once_streak_crosses_beta() {
        let mut p = Participant::new(0, 0.8, 2, 10);
        p.set_initial_color(true);
        let votes: Vec<Option<bool>> = (0..10).map(|_| Some(true)).collect();
        assert!(!p.is_finished());
        p.update(&votes);
        p.update(&votes);
        p.update(&votes);
        assert!(p.is_finished());
    }
}
