//! Hardware (MAC) addresses in canonical form.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// The string is not a valid 48-bit hardware address.
#[derive(Debug, thiserror::Error)]
#[error("'{mac}' is not a valid MAC address")]
pub struct InvalidMacAddress {
    pub mac: String,
}

/// A 48-bit hardware address.
///
/// Addresses are parsed from colon, dash or dot delimited forms as well as from 12 bare
/// hex digits, in any case. Two addresses are equal iff their bytes are equal, so comparing
/// parsed values is comparing normalised forms.
/// The canonical text form is upper case and colon delimited: `AA:BB:CC:DD:EE:FF`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

impl FromStr for MacAddress {
    type Err = InvalidMacAddress;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMacAddress {
            mac: value.to_string(),
        };
        let digits: String = value
            .trim()
            .chars()
            .filter(|c| !is_delimiter(*c))
            .collect();
        if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        // Delimiters, when present, must split the address into equal sized groups.
        let groups: Vec<&str> = value.trim().split(is_delimiter).collect();
        if groups.len() > 1 {
            let size = groups[0].len();
            if !matches!((groups.len(), size), (6, 2) | (3, 4)) {
                return Err(invalid());
            }
            if groups.iter().any(|group| group.len() != size) {
                return Err(invalid());
            }
        }

        let mut octets = [0u8; 6];
        for (index, octet) in octets.iter_mut().enumerate() {
            let pair = &digits[index * 2..index * 2 + 2];
            *octet = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(MacAddress(octets))
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ':' | '-' | '.')
}

impl TryFrom<String> for MacAddress {
    type Error = InvalidMacAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(value: MacAddress) -> Self {
        value.to_string()
    }
}
