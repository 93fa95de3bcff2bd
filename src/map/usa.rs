//! Built-in map: the fifty states plus the District of Columbia.
//!
//! Columns: abbreviation (canonical id), FIPS code, display name, base
//! capture defense (1-5).

use super::directory::StateInfo;

const USA: [(&str, &str, &str, u32); 51] = [
    ("AK", "02", "Alaska", 1),
    ("AL", "01", "Alabama", 2),
    ("AR", "05", "Arkansas", 2),
    ("AZ", "04", "Arizona", 2),
    ("CA", "06", "California", 4),
    ("CO", "08", "Colorado", 2),
    ("CT", "09", "Connecticut", 3),
    ("DC", "11", "Washington DC", 5),
    ("DE", "10", "Delaware", 2),
    ("FL", "12", "Florida", 2),
    ("GA", "13", "Georgia", 3),
    ("HI", "15", "Hawaii", 1),
    ("IA", "19", "Iowa", 1),
    ("ID", "16", "Idaho", 1),
    ("IL", "17", "Illinois", 3),
    ("IN", "18", "Indiana", 2),
    ("KS", "20", "Kansas", 1),
    ("KY", "21", "Kentucky", 2),
    ("LA", "22", "Louisiana", 2),
    ("MA", "25", "Massachusetts", 3),
    ("MD", "24", "Maryland", 3),
    ("ME", "23", "Maine", 1),
    ("MI", "26", "Michigan", 3),
    ("MN", "27", "Minnesota", 2),
    ("MO", "29", "Missouri", 2),
    ("MS", "28", "Mississippi", 2),
    ("MT", "30", "Montana", 1),
    ("NC", "37", "North Carolina", 3),
    ("ND", "38", "North Dakota", 1),
    ("NE", "31", "Nebraska", 1),
    ("NH", "33", "New Hampshire", 1),
    ("NJ", "34", "New Jersey", 3),
    ("NM", "35", "New Mexico", 2),
    ("NV", "32", "Nevada", 2),
    ("NY", "36", "New York", 5),
    ("OH", "39", "Ohio", 3),
    ("OK", "40", "Oklahoma", 2),
    ("OR", "41", "Oregon", 2),
    ("PA", "42", "Pennsylvania", 3),
    ("RI", "44", "Rhode Island", 1),
    ("SC", "45", "South Carolina", 2),
    ("SD", "46", "South Dakota", 1),
    ("TN", "47", "Tennessee", 2),
    ("TX", "48", "Texas", 4),
    ("UT", "49", "Utah", 2),
    ("VA", "51", "Virginia", 3),
    ("VT", "50", "Vermont", 1),
    ("WA", "53", "Washington", 3),
    ("WI", "55", "Wisconsin", 2),
    ("WV", "54", "West Virginia", 1),
    ("WY", "56", "Wyoming", 1),
];

/// Every built-in state in alphabetical abbreviation order.
#[must_use]
pub fn usa_states() -> Vec<StateInfo> {
    USA.iter()
        .map(|&(abbr, fips, name, defense)| StateInfo::new(abbr, name, defense).with_alias(fips))
        .collect()
}
