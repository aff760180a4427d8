//! Station Setup
//!
//! The reference line: 23 stations from Utsunomiya to Ueno with their
//! inter-station running times and daily passenger counts.

use crate::components::{Station, StationTable};

/// (name, ticks to next station, daily passengers)
const REFERENCE_LINE: [(&str, u32, u32); 23] = [
    ("宇都宮", 7, 31241),
    ("雀宮", 6, 4089),
    ("石橋", 4, 4059),
    ("自治医大", 3, 2868),
    ("小金井", 6, 3351),
    ("小山", 5, 18839),
    ("間々田", 3, 3546),
    ("野木", 4, 3606),
    ("古河", 6, 10812),
    ("栗橋", 5, 10451),
    ("東鷲宮", 2, 8118),
    ("久喜", 3, 30225),
    ("新白岡", 2, 6050),
    ("白岡", 4, 11104),
    ("蓮田", 3, 17628),
    ("東大宮", 4, 30234),
    ("土呂", 3, 13881),
    ("大宮", 2, 226249),
    ("さいたま新都心", 5, 49332),
    ("浦和", 10, 84116),
    ("赤羽", 5, 86518),
    ("尾久", 7, 9485),
    ("上野", 10, 147777),
];

/// Builds the reference station table.
pub fn reference_stations() -> StationTable {
    StationTable::new(
        REFERENCE_LINE
            .iter()
            .map(|&(name, travel_time, daily_passengers)| {
                Station::new(name, travel_time, daily_passengers)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_line_shape() {
        let table = reference_stations();
        assert_eq!(table.len(), 23);
        assert_eq!(table.name_at(0), "宇都宮");
        assert_eq!(table.name_at(22), "上野");
        assert_eq!(table.get(17).unwrap().daily_passengers, 226249);
    }

    #[test]
    fn test_reference_boarding() {
        let table = reference_stations();
        // 雀宮 shared across 96 trains
        assert_eq!(table.boarding_at(1, 96), 42);
        // 大宮 is the busiest stop
        assert_eq!(table.boarding_at(17, 96), 2356);
    }
}
