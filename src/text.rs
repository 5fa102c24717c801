//! Integer <-> decimal text helpers
//!
//! Buffers follow the C convention used by the LCD: text ends at the first
//! NUL byte, or at the end of the slice if there is none.

use heapless::String;

/// Longest decimal rendering of an `i32` (`-2147483648`)
pub const MAX_I32_DIGITS: usize = 11;

/// Errors when rendering a number into a caller buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// Buffer cannot hold sign, digits and the NUL terminator
    BufferTooSmall {
        /// bytes the value needs, terminator included
        needed: usize,
    },
}

/// Errors when parsing decimal text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Text does not start with a decimal digit
    InvalidDigit,
    /// Value does not fit in the target integer
    OutOfRange,
}

/// Reverse the first `length` bytes of `buf` in place
///
/// `length` is clamped to the buffer size.
pub fn reverse_string(buf: &mut [u8], length: usize) {
    let length = length.min(buf.len());
    buf[..length].reverse();
}

/// Count bytes before the NUL terminator
pub fn string_length(text: &[u8]) -> usize {
    text.iter().position(|&b| b == 0).unwrap_or(text.len())
}

/// Number of characters `n` takes in decimal, sign included
pub fn digit_count(n: i32) -> usize {
    let mut magnitude = n.unsigned_abs();
    let mut count = usize::from(n < 0);

    loop {
        count += 1;
        magnitude /= 10;
        if magnitude == 0 {
            break count;
        }
    }
}

/// Render `n` as NUL-terminated decimal text into `buf`
///
/// Returns the written text, terminator excluded.
pub fn int_to_string(n: i32, buf: &mut [u8]) -> Result<&str, FormatError> {
    let needed = digit_count(n) + 1;
    if buf.len() < needed {
        return Err(FormatError::BufferTooSmall { needed });
    }

    // digits come out least significant first
    let mut magnitude = n.unsigned_abs();
    let mut len = 0;
    loop {
        buf[len] = b'0' + (magnitude % 10) as u8;
        len += 1;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }

    if n < 0 {
        buf[len] = b'-';
        len += 1;
    }

    reverse_string(buf, len);
    buf[len] = 0;

    let text = &buf[..len];
    debug_assert!(text.iter().all(|&b| b == b'-' || b.is_ascii_digit()));

    // SAFETY: only ASCII digits and '-' were written to `text`
    Ok(unsafe { core::str::from_utf8_unchecked(text) })
}

/// Render `n` into an owned fixed-capacity string
pub fn format_int(n: i32) -> String<{ MAX_I32_DIGITS + 1 }> {
    let mut buf = [0u8; MAX_I32_DIGITS + 1];
    let mut out = String::new();

    let pushed = int_to_string(n, &mut buf).map(|text| out.push_str(text));
    debug_assert!(matches!(pushed, Ok(Ok(()))), "capacity covers every i32");

    out
}

/// Parse the leading run of decimal digits of `text`
///
/// Parsing stops at the first non-digit byte (or NUL). Unlike
/// [`simple_atoi`] an empty digit run is [`ParseError::InvalidDigit`] and
/// overflow is [`ParseError::OutOfRange`].
pub fn parse_unsigned(text: &[u8]) -> Result<u16, ParseError> {
    let digits = text.iter().take_while(|b| b.is_ascii_digit());

    let mut value: u16 = 0;
    let mut seen = false;
    for &digit in digits {
        seen = true;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u16::from(digit - b'0')))
            .ok_or(ParseError::OutOfRange)?;
    }

    match seen {
        true => Ok(value),
        false => Err(ParseError::InvalidDigit),
    }
}

/// Lenient `atoi`: garbage reads as `0`, overflow wraps
pub fn simple_atoi(text: &[u8]) -> u16 {
    text.iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u16, |acc, &digit| {
            acc.wrapping_mul(10).wrapping_add(u16::from(digit - b'0'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_and_negative() {
        let mut buf = [0xAAu8; 8];
        assert_eq!(int_to_string(0, &mut buf), Ok("0"));
        assert_eq!(&buf[..2], b"0\0");

        assert_eq!(int_to_string(-42, &mut buf), Ok("-42"));
        assert_eq!(&buf[..4], b"-42\0");
    }

    #[test]
    fn extremes_fit_in_twelve_bytes() {
        let mut buf = [0u8; MAX_I32_DIGITS + 1];
        assert_eq!(int_to_string(i32::MIN, &mut buf), Ok("-2147483648"));
        assert_eq!(int_to_string(i32::MAX, &mut buf), Ok("2147483647"));
        assert_eq!(format_int(i32::MIN).as_str(), "-2147483648");
        assert_eq!(format_int(27).as_str(), "27");
    }

    #[test]
    fn small_buffer_is_reported() {
        let mut buf = [0u8; 3];
        assert_eq!(
            int_to_string(-42, &mut buf),
            Err(FormatError::BufferTooSmall { needed: 4 })
        );
        assert_eq!(int_to_string(42, &mut buf), Ok("42"));
    }

    #[test]
    fn lengths() {
        assert_eq!(string_length(b""), 0);
        assert_eq!(string_length(b"\0abc"), 0);
        assert_eq!(string_length(b"123"), 3);
        assert_eq!(string_length(b"123\0456"), 3);

        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(-100), 4);
    }

    #[test]
    fn parse_stops_at_first_non_digit() {
        assert_eq!(parse_unsigned(b"45abc"), Ok(45));
        assert_eq!(parse_unsigned(b"007\0"), Ok(7));
        assert_eq!(parse_unsigned(b""), Err(ParseError::InvalidDigit));
        assert_eq!(parse_unsigned(b"abc"), Err(ParseError::InvalidDigit));
        assert_eq!(parse_unsigned(b"-5"), Err(ParseError::InvalidDigit));
        assert_eq!(parse_unsigned(b"65535"), Ok(u16::MAX));
        assert_eq!(parse_unsigned(b"65536"), Err(ParseError::OutOfRange));
    }

    #[test]
    fn atoi_keeps_silent_failure() {
        assert_eq!(simple_atoi(b"45abc"), 45);
        assert_eq!(simple_atoi(b""), 0);
        assert_eq!(simple_atoi(b"xyz"), 0);
        assert_eq!(simple_atoi(b"65536"), 0);
    }

    #[test]
    fn reverse_clamps_length() {
        let mut buf = *b"abc";
        reverse_string(&mut buf, 10);
        assert_eq!(&buf, b"cba");
        reverse_string(&mut buf, 2);
        assert_eq!(&buf, b"bca");
    }

    proptest! {
        #[test]
        fn parse_recovers_non_negative_values(n in 0i32..=i32::from(u16::MAX)) {
            let mut buf = [0u8; MAX_I32_DIGITS + 1];
            int_to_string(n, &mut buf).unwrap();
            prop_assert_eq!(i32::from(parse_unsigned(&buf).unwrap()), n);
            prop_assert_eq!(i32::from(simple_atoi(&buf)), n);
        }

        // the parser knows nothing about '-', so negatives come back as 0
        #[test]
        fn negative_values_do_not_round_trip(n in i32::MIN..0) {
            let mut buf = [0u8; MAX_I32_DIGITS + 1];
            int_to_string(n, &mut buf).unwrap();
            prop_assert_eq!(simple_atoi(&buf), 0);
            prop_assert_eq!(parse_unsigned(&buf), Err(ParseError::InvalidDigit));
        }

        #[test]
        fn formatting_matches_core_fmt(n in any::<i32>()) {
            let mut buf = [0u8; MAX_I32_DIGITS + 1];
            let text = int_to_string(n, &mut buf).unwrap();
            let mut expected: String<12> = String::new();
            core::fmt::write(&mut expected, format_args!("{}", n)).unwrap();
            prop_assert_eq!(text, expected.as_str());
            prop_assert_eq!(string_length(&buf), digit_count(n));
        }

        #[test]
        fn owned_and_buffer_renderings_agree(n in any::<i32>()) {
            let mut buf = [0xFFu8; MAX_I32_DIGITS + 1];
            let text = int_to_string(n, &mut buf).unwrap();
            let owned = format_int(n);
            prop_assert_eq!(owned.as_str(), text);
            prop_assert_eq!(owned.len(), digit_count(n));
            prop_assert_eq!(buf[digit_count(n)], 0);
        }

        #[test]
        fn reverse_twice_is_identity(mut data in proptest::collection::vec(any::<u8>(), 0..32), len in 0usize..40) {
            let original = data.clone();
            reverse_string(&mut data, len);
            reverse_string(&mut data, len);
            prop_assert_eq!(data, original);
        }
    }
}
