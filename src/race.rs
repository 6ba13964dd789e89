//! Race times and handicap arithmetic. Snapshots are copy-on-write.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveTime, Timelike};

use crate::error::RaceError;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Numerator of the time-on-time correction factor.
pub const HANDICAP_NUMERATOR: f64 = 650.0;
/// Base added to the rating in the correction factor's denominator.
pub const HANDICAP_BASE: i32 = 550;

/// Time of day with whole-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RaceTime {
    hour: u32,
    minute: u32,
    second: u32,
}

impl RaceTime {
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, RaceError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(RaceError::InvalidTime {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Seconds since midnight, wrapped into a single day.
    pub fn from_seconds(seconds: u32) -> Self {
        let seconds = seconds % SECONDS_PER_DAY;
        Self {
            hour: seconds / 3600,
            minute: seconds % 3600 / 60,
            second: seconds % 60,
        }
    }

    /// Current local wall-clock time, truncated to whole seconds.
    pub fn now() -> Self {
        Local::now().time().into()
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    pub fn to_seconds(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }

    pub fn with_hour(self, hour: u32) -> Result<Self, RaceError> {
        Self::new(hour, self.minute, self.second)
    }

    pub fn with_minute(self, minute: u32) -> Result<Self, RaceError> {
        Self::new(self.hour, minute, self.second)
    }

    pub fn with_second(self, second: u32) -> Result<Self, RaceError> {
        Self::new(self.hour, self.minute, second)
    }
}

impl From<NaiveTime> for RaceTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            second: time.second().min(59),
        }
    }
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl FromStr for RaceTime {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || RaceError::ParseTime {
            input: s.to_string(),
        };

        let parts = s
            .trim()
            .split(':')
            .map(|part| part.parse::<u32>().map_err(|_| parse_error()))
            .collect::<Result<Vec<u32>, RaceError>>()?;

        match parts.as_slice() {
            [hour, minute] => Self::new(*hour, *minute, 0),
            [hour, minute, second] => Self::new(*hour, *minute, *second),
            _ => Err(parse_error()),
        }
    }
}

/// Which of the two compared boats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Boat {
    #[strum(to_string = "Boat 1")]
    One,
    #[strum(to_string = "Boat 2")]
    Two,
}

impl Boat {
    pub const ALL: [Boat; 2] = [Boat::One, Boat::Two];

    pub fn index(self) -> usize {
        match self {
            Boat::One => 0,
            Boat::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoatData {
    pub start: RaceTime,
    pub finish: RaceTime,
    pub rating: i32,
}

impl BoatData {
    pub fn new(start: RaceTime, finish: RaceTime, rating: i32) -> Self {
        Self {
            start,
            finish,
            rating,
        }
    }

    pub fn with_start(self, start: RaceTime) -> Self {
        Self { start, ..self }
    }

    pub fn with_finish(self, finish: RaceTime) -> Self {
        Self { finish, ..self }
    }

    pub fn with_rating(self, rating: i32) -> Self {
        Self { rating, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RaceComparisonData {
    pub boat1: BoatData,
    pub boat2: BoatData,
}

impl RaceComparisonData {
    pub fn new(boat1: BoatData, boat2: BoatData) -> Self {
        Self { boat1, boat2 }
    }

    pub fn boat(&self, boat: Boat) -> &BoatData {
        match boat {
            Boat::One => &self.boat1,
            Boat::Two => &self.boat2,
        }
    }

    /// New snapshot with `boat` replaced by `update(old)`.
    pub fn with_boat(self, boat: Boat, update: impl FnOnce(BoatData) -> BoatData) -> Self {
        match boat {
            Boat::One => Self {
                boat1: update(self.boat1),
                ..self
            },
            Boat::Two => Self {
                boat2: update(self.boat2),
                ..self
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Winner {
    #[strum(to_string = "Boat 1")]
    Boat1,
    #[strum(to_string = "Boat 2")]
    Boat2,
    Tie,
}

/// Finish minus start. A finish earlier than the start means the race
/// crossed midnight; races are assumed to last less than a day.
pub fn elapsed_seconds(boat: &BoatData) -> u32 {
    let start = boat.start.to_seconds();
    let finish = boat.finish.to_seconds();
    if finish >= start {
        finish - start
    } else {
        finish + SECONDS_PER_DAY - start
    }
}

/// Denominator of the correction factor. Ratings at or below -550 make the
/// formula undefined and are rejected.
fn handicap_divisor(rating: i32) -> Result<f64, RaceError> {
    let divisor = i64::from(HANDICAP_BASE) + i64::from(rating);
    if divisor <= 0 {
        return Err(RaceError::InvalidRating { rating });
    }
    Ok(divisor as f64)
}

/// `round(650 / (550 + rating) * elapsed)`.
///
/// Requires `rating > -550`.
pub fn corrected_seconds(boat: &BoatData) -> Result<u32, RaceError> {
    let divisor = handicap_divisor(boat.rating)?;
    let corrected = HANDICAP_NUMERATOR / divisor * elapsed_seconds(boat) as f64;
    Ok(corrected.round() as u32)
}

/// Smaller corrected time wins.
pub fn determine_winner(race: &RaceComparisonData) -> Result<Winner, RaceError> {
    let boat1 = corrected_seconds(&race.boat1)?;
    let boat2 = corrected_seconds(&race.boat2)?;
    Ok(match boat1.cmp(&boat2) {
        std::cmp::Ordering::Less => Winner::Boat1,
        std::cmp::Ordering::Greater => Winner::Boat2,
        std::cmp::Ordering::Equal => Winner::Tie,
    })
}

pub fn time_difference_seconds(race: &RaceComparisonData) -> Result<u32, RaceError> {
    let boat1 = corrected_seconds(&race.boat1)?;
    let boat2 = corrected_seconds(&race.boat2)?;
    Ok(boat1.abs_diff(boat2))
}

/// Finish time boat 2 would need, keeping its start and rating, for its
/// corrected time to match boat 1's.
///
/// Scales boat 1's elapsed time by the ratio of the two correction
/// divisors, rounded to the nearest second. A target longer than a day
/// wraps onto the clock.
pub fn equalizing_finish_time_for_boat2(race: &RaceComparisonData) -> Result<RaceTime, RaceError> {
    let boat1_divisor = handicap_divisor(race.boat1.rating)?;
    let boat2_divisor = handicap_divisor(race.boat2.rating)?;

    let target_elapsed =
        (elapsed_seconds(&race.boat1) as f64 * boat2_divisor / boat1_divisor).round() as u64;
    let day = u64::from(SECONDS_PER_DAY);
    let finish = (u64::from(race.boat2.start.to_seconds()) + target_elapsed % day) % day;

    Ok(RaceTime::from_seconds(finish as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn t(h: u32, m: u32, s: u32) -> RaceTime {
        RaceTime::new(h, m, s).unwrap()
    }

    fn two_hour_race(rating1: i32, rating2: i32) -> RaceComparisonData {
        RaceComparisonData::new(
            BoatData::new(t(12, 0, 0), t(14, 0, 0), rating1),
            BoatData::new(t(12, 0, 0), t(14, 0, 0), rating2),
        )
    }

    #[test]
    fn test_race_time_rejects_out_of_range() {
        assert_matches!(RaceTime::new(24, 0, 0), Err(RaceError::InvalidTime { .. }));
        assert_matches!(RaceTime::new(0, 60, 0), Err(RaceError::InvalidTime { .. }));
        assert_matches!(RaceTime::new(0, 0, 60), Err(RaceError::InvalidTime { .. }));
        assert!(RaceTime::new(23, 59, 59).is_ok());
    }

    #[test]
    fn test_to_seconds_and_back() {
        let time = t(14, 18, 19);
        assert_eq!(time.to_seconds(), 51_499);
        assert_eq!(RaceTime::from_seconds(51_499), time);
    }

    #[test]
    fn test_from_seconds_wraps_past_midnight() {
        assert_eq!(RaceTime::from_seconds(SECONDS_PER_DAY + 61), t(0, 1, 1));
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(t(9, 5, 3).to_string(), "09:05:03");
        assert_eq!("09:05:03".parse::<RaceTime>().unwrap(), t(9, 5, 3));
        assert_eq!("13:45".parse::<RaceTime>().unwrap(), t(13, 45, 0));
        assert_matches!("13".parse::<RaceTime>(), Err(RaceError::ParseTime { .. }));
        assert_matches!("ab:cd".parse::<RaceTime>(), Err(RaceError::ParseTime { .. }));
        assert_matches!("25:00".parse::<RaceTime>(), Err(RaceError::InvalidTime { .. }));
    }

    #[test]
    fn test_from_naive_time_truncates_fraction() {
        let naive = NaiveTime::from_hms_milli_opt(10, 20, 30, 999).unwrap();
        assert_eq!(RaceTime::from(naive), t(10, 20, 30));
    }

    #[test]
    fn test_elapsed_same_day() {
        let boat = BoatData::new(t(12, 0, 0), t(14, 0, 0), 0);
        assert_eq!(elapsed_seconds(&boat), 7200);
    }

    #[test]
    fn test_elapsed_across_midnight() {
        let boat = BoatData::new(t(22, 0, 0), t(2, 0, 0), 0);
        assert_eq!(elapsed_seconds(&boat), 14_400);
    }

    #[test]
    fn test_corrected_scratch_rating() {
        let boat = BoatData::new(t(12, 0, 0), t(14, 0, 0), 0);
        assert_eq!(corrected_seconds(&boat).unwrap(), 8509);
    }

    #[test]
    fn test_corrected_rejects_degenerate_rating() {
        let boat = BoatData::new(t(12, 0, 0), t(14, 0, 0), -550);
        assert_matches!(
            corrected_seconds(&boat),
            Err(RaceError::InvalidRating { rating: -550 })
        );
        let boat = boat.with_rating(-549);
        assert!(corrected_seconds(&boat).is_ok());
    }

    #[test]
    fn test_winner_lower_corrected_time() {
        let race = two_hour_race(-39, 39);
        assert_eq!(corrected_seconds(&race.boat1).unwrap(), 9159);
        assert_eq!(corrected_seconds(&race.boat2).unwrap(), 7946);
        assert_eq!(determine_winner(&race).unwrap(), Winner::Boat2);
        assert_eq!(time_difference_seconds(&race).unwrap(), 1213);
    }

    #[test]
    fn test_winner_tie() {
        let race = two_hour_race(12, 12);
        assert_eq!(determine_winner(&race).unwrap(), Winner::Tie);
        assert_eq!(time_difference_seconds(&race).unwrap(), 0);
    }

    #[test]
    fn test_equalizing_finish_time() {
        let race = two_hour_race(-39, 39);
        // round(7200 * 589 / 511) = 8299
        assert_eq!(
            equalizing_finish_time_for_boat2(&race).unwrap(),
            t(14, 18, 19)
        );
    }

    #[test]
    fn test_equalizing_uses_boat1_elapsed_not_corrected() {
        let race = two_hour_race(0, 0);
        let race = race.with_boat(Boat::One, |b| b.with_finish(t(13, 30, 0)));
        // same rating: boat 2 needs the same elapsed time
        assert_eq!(
            equalizing_finish_time_for_boat2(&race).unwrap(),
            t(13, 30, 0)
        );
    }

    #[test]
    fn test_equalizing_wraps_past_midnight() {
        let race = RaceComparisonData::new(
            BoatData::new(t(20, 0, 0), t(23, 0, 0), 0),
            BoatData::new(t(22, 0, 0), t(23, 0, 0), 0),
        );
        assert_eq!(
            equalizing_finish_time_for_boat2(&race).unwrap(),
            t(1, 0, 0)
        );
    }

    #[test]
    fn test_equalizing_with_extreme_rating_ratio() {
        // target elapsed is 86399 * 50550 s, far past u32
        let race = RaceComparisonData::new(
            BoatData::new(t(0, 0, 0), t(23, 59, 59), -549),
            BoatData::new(t(12, 0, 0), t(12, 0, 0), 50_000),
        );
        assert_eq!(
            equalizing_finish_time_for_boat2(&race).unwrap(),
            t(21, 57, 30)
        );
    }

    #[test]
    fn test_huge_ratings_do_not_overflow() {
        let race = two_hour_race(i32::MAX, 0);
        assert_eq!(corrected_seconds(&race.boat1).unwrap(), 0);
        assert_eq!(determine_winner(&race).unwrap(), Winner::Boat1);
        assert_eq!(time_difference_seconds(&race).unwrap(), 8509);
        assert!(equalizing_finish_time_for_boat2(&race).is_ok());
        assert_matches!(
            corrected_seconds(&race.boat1.with_rating(i32::MIN)),
            Err(RaceError::InvalidRating { rating: i32::MIN })
        );
    }

    #[test]
    fn test_with_boat_is_copy_on_write() {
        let race = two_hour_race(0, 0);
        let updated = race.with_boat(Boat::Two, |b| b.with_rating(42));
        assert_eq!(race.boat2.rating, 0);
        assert_eq!(updated.boat2.rating, 42);
        assert_eq!(updated.boat1, race.boat1);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Boat::One.to_string(), "Boat 1");
        assert_eq!(Winner::Boat2.to_string(), "Boat 2");
        assert_eq!(Winner::Tie.to_string(), "Tie");
    }
}
