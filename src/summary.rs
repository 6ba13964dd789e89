//! Display values derived from one race snapshot.

use crate::error::RaceError;
use crate::race::{
    corrected_seconds, determine_winner, elapsed_seconds, equalizing_finish_time_for_boat2,
    time_difference_seconds, Boat, RaceComparisonData, RaceTime, Winner,
};
use crate::util::format_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoatSummary {
    pub boat: Boat,
    pub elapsed: u32,
    pub corrected: u32,
}

/// Everything the results panel shows. Recomputed from scratch whenever the
/// snapshot changes; snapshots are immutable so the summary can be cached
/// alongside the value it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceSummary {
    pub race: RaceComparisonData,
    pub boats: [BoatSummary; 2],
    pub winner: Winner,
    pub difference: u32,
    pub equalizing_finish: RaceTime,
}

impl RaceSummary {
    pub fn derive(race: &RaceComparisonData) -> Result<Self, RaceError> {
        let boat_summary = |boat: Boat| -> Result<BoatSummary, RaceError> {
            let data = race.boat(boat);
            Ok(BoatSummary {
                boat,
                elapsed: elapsed_seconds(data),
                corrected: corrected_seconds(data)?,
            })
        };

        Ok(Self {
            race: *race,
            boats: [boat_summary(Boat::One)?, boat_summary(Boat::Two)?],
            winner: determine_winner(race)?,
            difference: time_difference_seconds(race)?,
            equalizing_finish: equalizing_finish_time_for_boat2(race)?,
        })
    }

    pub fn boat(&self, boat: Boat) -> &BoatSummary {
        &self.boats[boat.index()]
    }

    /// One-line verdict, e.g. `Boat 2 wins by 0:20:13`.
    pub fn headline(&self) -> String {
        match self.winner {
            Winner::Tie => "Dead heat on corrected time".to_string(),
            winner => format!("{winner} wins by {}", format_duration(self.difference)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::BoatData;

    fn t(h: u32, m: u32, s: u32) -> RaceTime {
        RaceTime::new(h, m, s).unwrap()
    }

    #[test]
    fn test_derive_two_hour_race() {
        let race = RaceComparisonData::new(
            BoatData::new(t(12, 0, 0), t(14, 0, 0), -39),
            BoatData::new(t(12, 0, 0), t(14, 0, 0), 39),
        );
        let summary = RaceSummary::derive(&race).unwrap();

        assert_eq!(summary.boat(Boat::One).elapsed, 7200);
        assert_eq!(summary.boat(Boat::One).corrected, 9159);
        assert_eq!(summary.boat(Boat::Two).corrected, 7946);
        assert_eq!(summary.winner, Winner::Boat2);
        assert_eq!(summary.equalizing_finish, t(14, 18, 19));
        assert_eq!(summary.headline(), "Boat 2 wins by 0:20:13");
    }

    #[test]
    fn test_tie_headline() {
        let boat = BoatData::new(t(10, 0, 0), t(11, 0, 0), 0);
        let summary = RaceSummary::derive(&RaceComparisonData::new(boat, boat)).unwrap();
        assert_eq!(summary.headline(), "Dead heat on corrected time");
    }

    #[test]
    fn test_invalid_rating_propagates() {
        let boat = BoatData::new(t(10, 0, 0), t(11, 0, 0), -600);
        let race = RaceComparisonData::new(boat, boat.with_rating(0));
        assert_eq!(
            RaceSummary::derive(&race),
            Err(RaceError::InvalidRating { rating: -600 })
        );
    }

    #[test]
    fn test_derive_with_max_rating() {
        let boat = BoatData::new(t(10, 0, 0), t(11, 0, 0), i32::MAX);
        let race = RaceComparisonData::new(boat, boat.with_rating(0));
        let summary = RaceSummary::derive(&race).unwrap();
        assert_eq!(summary.boat(Boat::One).corrected, 0);
        assert_eq!(summary.winner, Winner::Boat1);
    }
}
