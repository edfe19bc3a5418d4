//! Tracker icon → APRS symbol mapping.
//!
//! Every entry uses the primary symbol table (`/`). Icons without a
//! dedicated symbol fall back to the small dot.

use crate::tracker::TrackerIcon;

/// APRS primary symbol table selector
pub const PRIMARY_TABLE: char = '/';

/// Symbol used for icons with no dedicated entry
pub const FALLBACK: Symbol = Symbol {
    table: PRIMARY_TABLE,
    code: ':',
};

/// Two-character APRS symbol: table selector and symbol code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub table: char,
    pub code: char,
}

impl Symbol {
    pub fn as_pair(&self) -> (char, char) {
        (self.table, self.code)
    }
}

/// Look up the APRS symbol for a tracker icon
pub fn for_icon(icon: &TrackerIcon) -> Symbol {
    let code = match icon {
        TrackerIcon::Bike => 'b',
        TrackerIcon::Helicopter => 'X',
        TrackerIcon::Backpack => '"',
        TrackerIcon::Tent => ';',
        TrackerIcon::Antenna => 'r',
        _ => return FALLBACK,
    };
    Symbol {
        table: PRIMARY_TABLE,
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_icons() {
        assert_eq!(for_icon(&TrackerIcon::Bike).as_pair(), ('/', 'b'));
        assert_eq!(for_icon(&TrackerIcon::Helicopter).as_pair(), ('/', 'X'));
        assert_eq!(for_icon(&TrackerIcon::Backpack).as_pair(), ('/', '"'));
        assert_eq!(for_icon(&TrackerIcon::Tent).as_pair(), ('/', ';'));
        assert_eq!(for_icon(&TrackerIcon::Antenna).as_pair(), ('/', 'r'));
    }

    #[test]
    fn test_unlisted_icons_fall_back() {
        assert_eq!(for_icon(&TrackerIcon::Woman).as_pair(), ('/', ':'));
        assert_eq!(for_icon(&TrackerIcon::Car).as_pair(), ('/', ':'));
        assert_eq!(
            for_icon(&TrackerIcon::Other("submarine".into())).as_pair(),
            ('/', ':')
        );
    }

    #[test]
    fn test_table_is_always_primary() {
        for icon in [
            TrackerIcon::Bike,
            TrackerIcon::Helicopter,
            TrackerIcon::Dog,
            TrackerIcon::Other(String::new()),
        ] {
            assert_eq!(for_icon(&icon).table, PRIMARY_TABLE);
        }
    }
}
