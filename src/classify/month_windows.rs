use crate::types::enso::{CalendarMonth, WindowCode};

/// The three ONI windows averaged for a calendar month: the season ending in the
/// month, the one centred on it and the one starting in it.
///
/// All three are read from the same year's row. Adjacent months share exactly two
/// windows, December and January included.
pub fn month_windows(month: CalendarMonth) -> [WindowCode; 3] {
    use WindowCode::*;
    match month {
        CalendarMonth::January => [NDJ, DJF, JFM],
        CalendarMonth::February => [DJF, JFM, FMA],
        CalendarMonth::March => [JFM, FMA, MAM],
        CalendarMonth::April => [FMA, MAM, AMJ],
        CalendarMonth::May => [MAM, AMJ, MJJ],
        CalendarMonth::June => [AMJ, MJJ, JJA],
        CalendarMonth::July => [MJJ, JJA, JAS],
        CalendarMonth::August => [JJA, JAS, ASO],
        CalendarMonth::September => [JAS, ASO, SON],
        CalendarMonth::October => [ASO, SON, OND],
        CalendarMonth::November => [SON, OND, NDJ],
        CalendarMonth::December => [OND, NDJ, DJF],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_triples_are_distinct() {
        let triples: HashSet<[WindowCode; 3]> =
            CalendarMonth::ALL.into_iter().map(month_windows).collect();
        assert_eq!(triples.len(), 12);
    }

    #[test]
    fn test_adjacent_months_share_two_windows() {
        for (idx, month) in CalendarMonth::ALL.into_iter().enumerate() {
            let next = CalendarMonth::ALL[(idx + 1) % 12];
            let current: HashSet<WindowCode> = month_windows(month).into_iter().collect();
            let following: HashSet<WindowCode> = month_windows(next).into_iter().collect();
            assert_eq!(
                current.intersection(&following).count(),
                2,
                "{} and {}",
                month,
                next
            );
        }
    }

    #[test]
    fn test_every_window_used_three_times() {
        for window in WindowCode::ALL {
            let uses = CalendarMonth::ALL
                .into_iter()
                .filter(|m| month_windows(*m).contains(&window))
                .count();
            assert_eq!(uses, 3, "{}", window);
        }
    }

    #[test]
    fn test_january_and_december() {
        assert_eq!(
            month_windows(CalendarMonth::January),
            [WindowCode::NDJ, WindowCode::DJF, WindowCode::JFM]
        );
        assert_eq!(
            month_windows(CalendarMonth::December),
            [WindowCode::OND, WindowCode::NDJ, WindowCode::DJF]
        );
    }
}
